//! Shorthand queries for each declaration kind.
//!
//! The singular finders return the unique match by name and fail with
//! `NotFound` or `Ambiguous`; the plural finders return every match,
//! optionally filtered by name. Operator finders take the operator symbol
//! instead of a name. Everything uses the engine's configured recursion.

use cppdecl_foundation::{DeclId, Result};
use cppdecl_model::{DeclCategory, DeclTree};

use crate::engine::QueryEngine;
use crate::group::DeclGroup;
use crate::matchers::{DeclarationMatcher, OperatorMatcher};

fn by_name(category: DeclCategory, name: Option<&str>) -> DeclarationMatcher {
    let matcher = DeclarationMatcher::new().with_category(category);
    match name {
        Some(name) => matcher.with_name(name),
        None => matcher,
    }
}

fn by_symbol(category: DeclCategory, symbol: Option<&str>) -> OperatorMatcher {
    let matcher = OperatorMatcher::new(DeclarationMatcher::new().with_category(category));
    match symbol {
        Some(symbol) => matcher.with_symbol(symbol),
        None => matcher,
    }
}

impl QueryEngine {
    fn single_of(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        category: DeclCategory,
        name: &str,
    ) -> Result<DeclId> {
        self.find_single(tree, scope, &by_name(category, Some(name)))
    }

    fn all_of(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        category: DeclCategory,
        name: Option<&str>,
    ) -> Result<DeclGroup> {
        self.find(tree, scope, &by_name(category, name))
    }

    /// The namespace called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn namespace(&self, tree: &DeclTree, scope: DeclId, name: &str) -> Result<DeclId> {
        self.single_of(tree, scope, DeclCategory::Namespace, name)
    }

    /// Every namespace, optionally only those called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn namespaces(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        name: Option<&str>,
    ) -> Result<DeclGroup> {
        self.all_of(tree, scope, DeclCategory::Namespace, name)
    }

    /// The class called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn class(&self, tree: &DeclTree, scope: DeclId, name: &str) -> Result<DeclId> {
        self.single_of(tree, scope, DeclCategory::Class, name)
    }

    /// Every class, optionally only those called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn classes(&self, tree: &DeclTree, scope: DeclId, name: Option<&str>) -> Result<DeclGroup> {
        self.all_of(tree, scope, DeclCategory::Class, name)
    }

    /// The forward class declaration called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn class_declaration(&self, tree: &DeclTree, scope: DeclId, name: &str) -> Result<DeclId> {
        self.single_of(tree, scope, DeclCategory::ClassDeclaration, name)
    }

    /// Every forward class declaration, optionally only those called
    /// `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn class_declarations(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        name: Option<&str>,
    ) -> Result<DeclGroup> {
        self.all_of(tree, scope, DeclCategory::ClassDeclaration, name)
    }

    /// The enumeration called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn enumeration(&self, tree: &DeclTree, scope: DeclId, name: &str) -> Result<DeclId> {
        self.single_of(tree, scope, DeclCategory::Enumeration, name)
    }

    /// Every enumeration, optionally only those called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn enumerations(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        name: Option<&str>,
    ) -> Result<DeclGroup> {
        self.all_of(tree, scope, DeclCategory::Enumeration, name)
    }

    /// The typedef called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn typedef(&self, tree: &DeclTree, scope: DeclId, name: &str) -> Result<DeclId> {
        self.single_of(tree, scope, DeclCategory::Typedef, name)
    }

    /// Every typedef, optionally only those called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn typedefs(&self, tree: &DeclTree, scope: DeclId, name: Option<&str>) -> Result<DeclGroup> {
        self.all_of(tree, scope, DeclCategory::Typedef, name)
    }

    /// The variable called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn variable(&self, tree: &DeclTree, scope: DeclId, name: &str) -> Result<DeclId> {
        self.single_of(tree, scope, DeclCategory::Variable, name)
    }

    /// Every variable, optionally only those called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn variables(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        name: Option<&str>,
    ) -> Result<DeclGroup> {
        self.all_of(tree, scope, DeclCategory::Variable, name)
    }

    /// The callable of any kind called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn calldef(&self, tree: &DeclTree, scope: DeclId, name: &str) -> Result<DeclId> {
        self.single_of(tree, scope, DeclCategory::Calldef, name)
    }

    /// Every callable, optionally only those called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn calldefs(&self, tree: &DeclTree, scope: DeclId, name: Option<&str>) -> Result<DeclGroup> {
        self.all_of(tree, scope, DeclCategory::Calldef, name)
    }

    /// The free function called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn free_function(&self, tree: &DeclTree, scope: DeclId, name: &str) -> Result<DeclId> {
        self.single_of(tree, scope, DeclCategory::FreeFunction, name)
    }

    /// Every free function, optionally only those called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn free_functions(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        name: Option<&str>,
    ) -> Result<DeclGroup> {
        self.all_of(tree, scope, DeclCategory::FreeFunction, name)
    }

    /// The free operator with `symbol`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn free_operator(&self, tree: &DeclTree, scope: DeclId, symbol: &str) -> Result<DeclId> {
        self.find_single(tree, scope, &by_symbol(DeclCategory::FreeOperator, Some(symbol)))
    }

    /// Every free operator, optionally only those with `symbol`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn free_operators(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        symbol: Option<&str>,
    ) -> Result<DeclGroup> {
        self.find(tree, scope, &by_symbol(DeclCategory::FreeOperator, symbol))
    }

    /// The member function called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn member_function(&self, tree: &DeclTree, scope: DeclId, name: &str) -> Result<DeclId> {
        self.single_of(tree, scope, DeclCategory::MemberFunction, name)
    }

    /// Every member function, optionally only those called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn member_functions(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        name: Option<&str>,
    ) -> Result<DeclGroup> {
        self.all_of(tree, scope, DeclCategory::MemberFunction, name)
    }

    /// The member operator with `symbol`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn member_operator(&self, tree: &DeclTree, scope: DeclId, symbol: &str) -> Result<DeclId> {
        self.find_single(tree, scope, &by_symbol(DeclCategory::MemberOperator, Some(symbol)))
    }

    /// Every member operator, optionally only those with `symbol`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn member_operators(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        symbol: Option<&str>,
    ) -> Result<DeclGroup> {
        self.find(tree, scope, &by_symbol(DeclCategory::MemberOperator, symbol))
    }

    /// The constructor called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn constructor(&self, tree: &DeclTree, scope: DeclId, name: &str) -> Result<DeclId> {
        self.single_of(tree, scope, DeclCategory::Constructor, name)
    }

    /// Every constructor, optionally only those called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn constructors(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        name: Option<&str>,
    ) -> Result<DeclGroup> {
        self.all_of(tree, scope, DeclCategory::Constructor, name)
    }

    /// The destructor called `name` (including the `~`).
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn destructor(&self, tree: &DeclTree, scope: DeclId, name: &str) -> Result<DeclId> {
        self.single_of(tree, scope, DeclCategory::Destructor, name)
    }

    /// Every destructor, optionally only those called `name`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn destructors(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        name: Option<&str>,
    ) -> Result<DeclGroup> {
        self.all_of(tree, scope, DeclCategory::Destructor, name)
    }

    /// The casting operator converting to `symbol`, e.g. `int`.
    ///
    /// # Errors
    ///
    /// `NotFound`, `Ambiguous`, or a bad scope handle.
    pub fn casting_operator(&self, tree: &DeclTree, scope: DeclId, symbol: &str) -> Result<DeclId> {
        self.find_single(tree, scope, &by_symbol(DeclCategory::CastingOperator, Some(symbol)))
    }

    /// Every casting operator, optionally only those converting to
    /// `symbol`.
    ///
    /// # Errors
    ///
    /// `NotFound` on empty results unless allowed, or a bad scope handle.
    pub fn casting_operators(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        symbol: Option<&str>,
    ) -> Result<DeclGroup> {
        self.find(tree, scope, &by_symbol(DeclCategory::CastingOperator, symbol))
    }
}
