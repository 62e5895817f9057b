//! Declaration tree and type model for cppdecl.
//!
//! This crate provides:
//! - [`DeclTree`] - Arena of declarations with parent links and hierarchy edges
//! - [`Declaration`] - One named entity: namespace, class, enum, typedef,
//!   variable or callable
//! - [`Type`] - Type expressions with decl-string rendering
//! - [`DeclCache`] - Per-declaration memoization of derived values
//! - Naming, dependency, symbol correlation, and visitor support

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cache;
pub mod decl;
pub mod dependencies;
pub mod naming;
pub mod printer;
#[cfg(feature = "serde")]
pub mod snapshot;
pub mod symbols;
pub mod tree;
pub mod types;
pub mod visitor;

pub use cache::{CacheSlot, DeclCache, memoize};
pub use decl::{
    AccessType, Argument, CalldefData, CalldefKind, ClassData, ClassKey, DeclCategory, DeclData,
    DeclKind, Declaration, EnumData, HierarchyInfo, NamespaceData, TypeQualifiers, TypedefData,
    VariableData, Virtuality,
};
pub use dependencies::{DependOn, DependencyHint, DependencyInfo};
pub use naming::full_name_from_path;
pub use printer::{PrintConfig, print_declarations, print_declarations_with_config};
pub use symbols::{
    CorrelationReport, Demangler, ExportedSymbol, SymbolHint, apply_demangler, correlate_symbols,
    format_decl, normalize_undecorated,
};
pub use tree::DeclTree;
pub use types::{CallableKind, CallableType, FundamentalKind, Modifier, POINTER_SIZE, Type};
pub use visitor::{DeclVisitor, apply_visitor, walk_declaration};
