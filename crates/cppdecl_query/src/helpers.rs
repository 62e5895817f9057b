//! Free functions over lists of declaration handles.

use std::collections::BTreeSet;

use cppdecl_foundation::{DeclId, Result};
use cppdecl_model::DeclTree;

use crate::matchers::Matcher;

/// Each declaration followed by all of its nested declarations, in
/// pre-order.
///
/// # Errors
///
/// Fails for stale handles.
pub fn make_flatten(tree: &DeclTree, decls: &[DeclId]) -> Result<Vec<DeclId>> {
    let mut flat = Vec::new();
    for id in decls {
        flat.extend(tree.subtree(*id)?);
    }
    Ok(flat)
}

/// Every declaration in `decls` (and below, if `recursive`) matching
/// `matcher`. Stale handles are skipped.
#[must_use]
pub fn find_all_declarations(
    tree: &DeclTree,
    decls: &[DeclId],
    matcher: &dyn Matcher,
    recursive: bool,
) -> Vec<DeclId> {
    let candidates = if recursive {
        decls
            .iter()
            .filter_map(|id| tree.subtree(*id).ok())
            .flatten()
            .collect()
    } else {
        decls.to_vec()
    };
    candidates
        .into_iter()
        .filter(|id| matcher.matches(tree, *id))
        .collect()
}

/// The single match, or `None` when there are zero or several.
#[must_use]
pub fn find_declaration(
    tree: &DeclTree,
    decls: &[DeclId],
    matcher: &dyn Matcher,
    recursive: bool,
) -> Option<DeclId> {
    match find_all_declarations(tree, decls, matcher, recursive).as_slice() {
        [single] => Some(*single),
        _ => None,
    }
}

/// The first match in pre-order.
#[must_use]
pub fn find_first_declaration(
    tree: &DeclTree,
    decls: &[DeclId],
    matcher: &dyn Matcher,
    recursive: bool,
) -> Option<DeclId> {
    if recursive {
        decls
            .iter()
            .filter_map(|id| tree.subtree(*id).ok())
            .flatten()
            .find(|id| matcher.matches(tree, *id))
    } else {
        decls
            .iter()
            .copied()
            .find(|id| matcher.matches(tree, *id))
    }
}

/// The normalized files that declare anything in `decls` or below.
///
/// # Errors
///
/// Fails for stale handles.
pub fn declaration_files(tree: &DeclTree, decls: &[DeclId]) -> Result<BTreeSet<String>> {
    let mut files = BTreeSet::new();
    for id in make_flatten(tree, decls)? {
        if let Some(location) = &tree.decl(id)?.location {
            files.insert(location.normalized_file());
        }
    }
    Ok(files)
}
