//! Visitor over declaration kinds.
//!
//! Dispatch is an exhaustive match on [`DeclData`], so every kind has a
//! `visit_*` method and no kind can be missed.
//!
//! # Example
//!
//! ```
//! use cppdecl_model::{DeclTree, Declaration, Type};
//! use cppdecl_model::decl::VariableData;
//! use cppdecl_model::visitor::{DeclVisitor, walk_declaration};
//! use cppdecl_foundation::DeclId;
//!
//! struct VariableCounter(usize);
//!
//! impl DeclVisitor for VariableCounter {
//!     fn visit_variable(&mut self, _tree: &DeclTree, _id: DeclId, _data: &VariableData) {
//!         self.0 += 1;
//!     }
//! }
//!
//! let mut tree = DeclTree::new();
//! let class = tree.insert(tree.root(), Declaration::class("C")).unwrap();
//! tree.insert(class, Declaration::variable("a", Type::int())).unwrap();
//! tree.insert(tree.root(), Declaration::variable("b", Type::int())).unwrap();
//!
//! let mut counter = VariableCounter(0);
//! walk_declaration(&mut counter, &tree, tree.root()).unwrap();
//! assert_eq!(counter.0, 2);
//! ```

use cppdecl_foundation::{DeclId, Result};

use crate::decl::{
    CalldefData, ClassData, DeclData, EnumData, NamespaceData, TypedefData, VariableData,
};
use crate::tree::DeclTree;

/// Trait for read-only declaration visitors.
///
/// Implement the `visit_*` methods of interest; the defaults do nothing.
/// Use [`walk_declaration`] to traverse a subtree.
#[allow(unused_variables)]
pub trait DeclVisitor {
    /// Called before the kind-specific method and before children.
    fn enter_declaration(&mut self, tree: &DeclTree, id: DeclId) {}

    /// Called after children.
    fn leave_declaration(&mut self, tree: &DeclTree, id: DeclId) {}

    /// Visit a namespace.
    fn visit_namespace(&mut self, tree: &DeclTree, id: DeclId, data: &NamespaceData) {}

    /// Visit a class.
    fn visit_class(&mut self, tree: &DeclTree, id: DeclId, data: &ClassData) {}

    /// Visit a forward class declaration.
    fn visit_class_declaration(&mut self, tree: &DeclTree, id: DeclId) {}

    /// Visit an enumeration.
    fn visit_enumeration(&mut self, tree: &DeclTree, id: DeclId, data: &EnumData) {}

    /// Visit a typedef.
    fn visit_typedef(&mut self, tree: &DeclTree, id: DeclId, data: &TypedefData) {}

    /// Visit a variable.
    fn visit_variable(&mut self, tree: &DeclTree, id: DeclId, data: &VariableData) {}

    /// Visit any callable.
    fn visit_calldef(&mut self, tree: &DeclTree, id: DeclId, data: &CalldefData) {}
}

/// Calls the kind-specific method for one declaration, without recursing.
///
/// # Errors
///
/// Fails for stale or unknown handles.
pub fn apply_visitor<V: DeclVisitor + ?Sized>(
    visitor: &mut V,
    tree: &DeclTree,
    id: DeclId,
) -> Result<()> {
    match tree.decl(id)?.data() {
        DeclData::Namespace(data) => visitor.visit_namespace(tree, id, data),
        DeclData::Class(data) => visitor.visit_class(tree, id, data),
        DeclData::ClassDeclaration => visitor.visit_class_declaration(tree, id),
        DeclData::Enumeration(data) => visitor.visit_enumeration(tree, id, data),
        DeclData::Typedef(data) => visitor.visit_typedef(tree, id, data),
        DeclData::Variable(data) => visitor.visit_variable(tree, id, data),
        DeclData::Calldef(data) => visitor.visit_calldef(tree, id, data),
    }
    Ok(())
}

/// Walks a subtree in pre-order, calling enter, visit, children, leave.
///
/// # Errors
///
/// Fails for stale or unknown handles.
pub fn walk_declaration<V: DeclVisitor + ?Sized>(
    visitor: &mut V,
    tree: &DeclTree,
    id: DeclId,
) -> Result<()> {
    visitor.enter_declaration(tree, id);
    apply_visitor(visitor, tree, id)?;
    for child in tree.children(id)? {
        walk_declaration(visitor, tree, child)?;
    }
    visitor.leave_declaration(tree, id);
    Ok(())
}
