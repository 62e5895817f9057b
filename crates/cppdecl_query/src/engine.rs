//! Query execution over declaration scopes.
//!
//! This module provides:
//! - [`QueryEngine`] - Runs matchers over a scope, optionally through
//!   optimizer indices
//! - [`QueryOptions`] - Per-query overrides of the engine configuration
//!
//! # Example
//!
//! ```
//! use cppdecl_model::{DeclTree, Declaration, Type};
//! use cppdecl_query::{DeclarationMatcher, QueryEngine};
//!
//! let mut tree = DeclTree::new();
//! let ns = tree.insert(tree.root(), Declaration::namespace("app")).unwrap();
//! let var = tree.insert(ns, Declaration::variable("count", Type::int())).unwrap();
//!
//! let mut engine = QueryEngine::new();
//! engine.init_optimizer(&tree, tree.root()).unwrap();
//!
//! let found = engine
//!     .find_single(&tree, tree.root(), &DeclarationMatcher::named("::app::count"))
//!     .unwrap();
//! assert_eq!(found, var);
//! ```

use cppdecl_foundation::{DeclId, Error, ErrorContext, QueryConfig, Result};
use cppdecl_model::DeclTree;
use im::HashMap;
use tracing::{debug, trace};

use crate::group::DeclGroup;
use crate::matchers::Matcher;
use crate::optimizer::{self, ScopeIndex};

/// Per-query overrides. Unset fields fall back to the engine's
/// [`QueryConfig`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct QueryOptions {
    /// Whether to descend into nested scopes.
    pub recursive: Option<bool>,
    /// Whether a plural query may return an empty group.
    pub allow_empty: Option<bool>,
}

impl QueryOptions {
    /// Options that defer entirely to the engine configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set recursion.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = Some(recursive);
        self
    }

    /// Builder method to allow empty plural results.
    #[must_use]
    pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = Some(allow_empty);
        self
    }
}

/// Finds declarations inside scopes.
///
/// Without optimizer indices every query flattens the scope and tests each
/// declaration. After [`init_optimizer`](Self::init_optimizer) the engine
/// first narrows the candidates to the bucket for the matcher's category
/// and name hints. Indices invalidated by later edits are ignored until
/// they are rebuilt.
#[derive(Clone, Debug, Default)]
pub struct QueryEngine {
    config: QueryConfig,
    indices: HashMap<DeclId, ScopeIndex>,
}

impl QueryEngine {
    /// Creates an engine with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with a custom configuration.
    #[must_use]
    pub fn with_config(config: QueryConfig) -> Self {
        Self {
            config,
            indices: HashMap::new(),
        }
    }

    /// The engine configuration.
    #[must_use]
    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    /// Mutable access to the engine configuration.
    pub fn config_mut(&mut self) -> &mut QueryConfig {
        &mut self.config
    }

    // -------------------------------------------------------------------------
    // Optimizer
    // -------------------------------------------------------------------------

    /// Builds indices for `scope` and every scope nested in it,
    /// replacing older ones.
    ///
    /// # Errors
    ///
    /// Fails for stale handles.
    pub fn init_optimizer(&mut self, tree: &DeclTree, scope: DeclId) -> Result<()> {
        tree.validate(scope)?;
        let built = optimizer::build(tree, scope, &mut self.indices)?;
        debug!(
            scope = %tree.full_name(scope)?,
            scopes = built,
            declarations = self.indices.get(&scope).map_or(0, |i| i.range(true).len()),
            revision = tree.revision(),
            "query optimizer initialized"
        );
        Ok(())
    }

    /// Drops every index.
    pub fn clear_optimizer(&mut self) {
        self.indices = HashMap::new();
    }

    /// Returns true if `scope` has an index that is still valid for `tree`.
    #[must_use]
    pub fn is_optimized(&self, tree: &DeclTree, scope: DeclId) -> bool {
        self.indices
            .get(&scope)
            .is_some_and(|index| index.is_fresh(tree))
    }

    /// The index of `scope`, fresh or not.
    #[must_use]
    pub fn scope_index(&self, scope: DeclId) -> Option<&ScopeIndex> {
        self.indices.get(&scope)
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Finds the unique declaration in `scope` matching `matcher`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Ambiguous` when zero or several
    /// declarations match, and fails for stale handles.
    pub fn find_single(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        matcher: &dyn Matcher,
    ) -> Result<DeclId> {
        self.find_single_with(tree, scope, matcher, QueryOptions::default())
    }

    /// [`find_single`](Self::find_single) with per-query options.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `Ambiguous` when zero or several
    /// declarations match, and fails for stale handles.
    pub fn find_single_with(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        matcher: &dyn Matcher,
        options: QueryOptions,
    ) -> Result<DeclId> {
        let recursive = options.recursive.unwrap_or(self.config.recursive);
        let found = self.run(tree, scope, matcher, recursive)?;
        match found.as_slice() {
            [single] => Ok(*single),
            [] => Err(Error::not_found(matcher.describe())
                .with_context(context(tree, scope, recursive, "find_single"))),
            many => Err(Error::ambiguous(matcher.describe(), many.len())
                .with_context(context(tree, scope, recursive, "find_single"))),
        }
    }

    /// Finds every declaration in `scope` matching `matcher`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing matches and empty results are not
    /// allowed, and fails for stale handles.
    pub fn find(&self, tree: &DeclTree, scope: DeclId, matcher: &dyn Matcher) -> Result<DeclGroup> {
        self.find_with(tree, scope, matcher, QueryOptions::default())
    }

    /// [`find`](Self::find) with per-query options.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when nothing matches and empty results are not
    /// allowed, and fails for stale handles.
    pub fn find_with(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        matcher: &dyn Matcher,
        options: QueryOptions,
    ) -> Result<DeclGroup> {
        let recursive = options.recursive.unwrap_or(self.config.recursive);
        let allow_empty = options.allow_empty.unwrap_or(self.config.allow_empty);
        let found = self.run(tree, scope, matcher, recursive)?;
        if found.is_empty() && !allow_empty {
            return Err(Error::not_found(matcher.describe())
                .with_context(context(tree, scope, recursive, "find")));
        }
        Ok(DeclGroup::new(found))
    }

    fn run(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        matcher: &dyn Matcher,
        recursive: bool,
    ) -> Result<Vec<DeclId>> {
        let candidates = self.candidates(tree, scope, matcher, recursive)?;
        let found: Vec<DeclId> = candidates
            .into_iter()
            .filter(|id| matcher.matches(tree, *id))
            .collect();
        trace!(%scope, recursive, found = found.len(), "query executed");
        Ok(found)
    }

    fn candidates(
        &self,
        tree: &DeclTree,
        scope: DeclId,
        matcher: &dyn Matcher,
        recursive: bool,
    ) -> Result<Vec<DeclId>> {
        tree.validate(scope)?;
        if self.config.optimize {
            if let Some(index) = self.indices.get(&scope) {
                if index.is_fresh(tree) {
                    let bucket = index
                        .range(recursive)
                        .select(matcher.kind_hint(), matcher.name_hint());
                    trace!(
                        %scope,
                        category = ?matcher.kind_hint(),
                        name = ?matcher.name_hint(),
                        candidates = bucket.len(),
                        "optimized range selected"
                    );
                    return Ok(bucket.into_iter().collect());
                }
                debug!(
                    %scope,
                    built_tree = index.tree_identity(),
                    current_tree = tree.identity(),
                    built = index.revision(),
                    current = tree.revision(),
                    "optimizer index is stale, scanning"
                );
            }
        }
        if recursive {
            let mut all = tree.subtree(scope)?;
            all.remove(0);
            Ok(all)
        } else {
            tree.children(scope)
        }
    }
}

fn context(tree: &DeclTree, scope: DeclId, recursive: bool, frame: &str) -> ErrorContext {
    let scope = tree
        .full_name(scope)
        .unwrap_or_else(|_| scope.to_string());
    ErrorContext::new()
        .with_scope(scope)
        .with_recursive(recursive)
        .with_frame(frame)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::matchers::DeclarationMatcher;
    use cppdecl_model::{AccessType, DeclCategory, Declaration, Type};
    use proptest::prelude::*;

    #[derive(Clone, Debug)]
    enum Shape {
        Namespace(usize, Vec<Shape>),
        Class(usize, Vec<usize>),
        Variable(usize),
    }

    const NAMES: [&str; 4] = ["a", "b", "c", "d"];

    fn shape() -> impl Strategy<Value = Shape> {
        let leaf = prop_oneof![
            (0..NAMES.len()).prop_map(Shape::Variable),
            (0..NAMES.len(), prop::collection::vec(0..NAMES.len(), 0..4))
                .prop_map(|(n, members)| Shape::Class(n, members)),
        ];
        leaf.prop_recursive(4, 40, 5, |inner| {
            (0..NAMES.len(), prop::collection::vec(inner, 1..5))
                .prop_map(|(n, children)| Shape::Namespace(n, children))
        })
    }

    fn grow(tree: &mut DeclTree, parent: DeclId, shape: &Shape) {
        match shape {
            Shape::Namespace(n, children) => {
                let ns = tree.insert(parent, Declaration::namespace(NAMES[*n])).unwrap();
                for child in children {
                    grow(tree, ns, child);
                }
            }
            Shape::Class(n, members) => {
                let class = tree.insert(parent, Declaration::class(NAMES[*n])).unwrap();
                for m in members {
                    tree.insert_member(
                        class,
                        Declaration::variable(NAMES[*m], Type::int()),
                        AccessType::Public,
                    )
                    .unwrap();
                }
            }
            Shape::Variable(n) => {
                tree.insert(parent, Declaration::variable(NAMES[*n], Type::int()))
                    .unwrap();
            }
        }
    }

    fn category() -> impl Strategy<Value = Option<DeclCategory>> {
        prop_oneof![
            Just(None),
            Just(Some(DeclCategory::Namespace)),
            Just(Some(DeclCategory::Class)),
            Just(Some(DeclCategory::Variable)),
            Just(Some(DeclCategory::Scope)),
        ]
    }

    proptest! {
        #[test]
        fn optimized_and_scan_agree(
            shapes in prop::collection::vec(shape(), 1..4),
            category in category(),
            name in prop::option::of(0..NAMES.len()),
            recursive in any::<bool>(),
        ) {
            let mut tree = DeclTree::new();
            let root = tree.root();
            for s in &shapes {
                grow(&mut tree, root, s);
            }

            let mut matcher = DeclarationMatcher::new();
            if let Some(category) = category {
                matcher = matcher.with_category(category);
            }
            if let Some(n) = name {
                matcher = matcher.with_name(NAMES[n]);
            }

            let plain = QueryEngine::new();
            let mut optimized = QueryEngine::new();
            optimized.init_optimizer(&tree, tree.root()).unwrap();
            let options = QueryOptions::new()
                .with_recursive(recursive)
                .with_allow_empty(true);

            for scope in tree.subtree(tree.root()).unwrap() {
                if !tree.decl(scope).unwrap().is_scope() {
                    continue;
                }
                let mut expected = plain.find_with(&tree, scope, &matcher, options).unwrap().into_vec();
                let mut actual = optimized.find_with(&tree, scope, &matcher, options).unwrap().into_vec();
                expected.sort();
                actual.sort();
                prop_assert_eq!(expected, actual);
            }
        }
    }
}
