//! Declaration queries for cppdecl.
//!
//! This crate provides:
//! - [`Matcher`] and its implementations - Composable declaration predicates
//! - [`QueryEngine`] - Single and plural lookups inside a scope, with
//!   per-kind shorthand finders
//! - [`ScopeIndex`] - Optimizer indices keyed by category and name
//! - [`DeclGroup`] - Batch access to plural results
//! - Free helpers over handle lists ([`make_flatten`], [`declaration_files`], ...)

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod engine;
mod finders;
pub mod group;
pub mod helpers;
pub mod matchers;
pub mod optimizer;

pub use engine::{QueryEngine, QueryOptions};
pub use group::DeclGroup;
pub use helpers::{
    declaration_files, find_all_declarations, find_declaration, find_first_declaration,
    make_flatten,
};
pub use matchers::{
    AccessTypeMatcher, AndMatcher, CalldefMatcher, CustomMatcher, DeclarationMatcher, Matcher,
    MatcherExt, NotMatcher, OperatorMatcher, OrMatcher, RegexMatcher, TypeCriterion,
    VariableMatcher, VirtualityTypeMatcher,
};
pub use optimizer::{DeclIndex, ScopeIndex};
