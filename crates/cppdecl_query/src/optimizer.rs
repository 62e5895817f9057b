//! Hash indices that accelerate queries over a scope.
//!
//! Each indexed scope keeps two [`DeclIndex`]es: one over its whole
//! subtree and one over its direct children. Indices are built bottom-up
//! from persistent vectors and maps, so a parent's recursive index shares
//! structure with its child scopes' indices instead of copying them.
//!
//! An index records the identity and revision of the tree it was built
//! from. Any edit bumps the revision, and a different tree (or a reloaded
//! snapshot) has a different identity; either way the index is no longer
//! consulted.

use cppdecl_foundation::{DeclId, Result};
use cppdecl_model::{DeclCategory, DeclTree};
use im::{HashMap, Vector};
use tracing::trace;

/// Declarations of one range, bucketed by category and name.
#[derive(Clone, Debug, Default)]
pub struct DeclIndex {
    all: Vector<DeclId>,
    by_category: HashMap<DeclCategory, Vector<DeclId>>,
    by_name: HashMap<DeclCategory, HashMap<String, Vector<DeclId>>>,
}

impl DeclIndex {
    /// Every indexed declaration in pre-order.
    #[must_use]
    pub fn all(&self) -> &Vector<DeclId> {
        &self.all
    }

    /// Number of indexed declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.all.len()
    }

    /// Returns true if nothing is indexed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Selects the narrowest bucket for a category and unqualified name.
    ///
    /// A name without a category is looked up under
    /// [`DeclCategory::Any`].
    #[must_use]
    pub fn select(&self, category: Option<DeclCategory>, name: Option<&str>) -> Vector<DeclId> {
        match (category, name) {
            (category, Some(name)) => self
                .by_name
                .get(&category.unwrap_or(DeclCategory::Any))
                .and_then(|names| names.get(name))
                .cloned()
                .unwrap_or_default(),
            (Some(category), None) => self
                .by_category
                .get(&category)
                .cloned()
                .unwrap_or_default(),
            (None, None) => self.all.clone(),
        }
    }

    fn push(&mut self, tree: &DeclTree, id: DeclId) -> Result<()> {
        let decl = tree.decl(id)?;
        let partial = tree.partial_name(id)?;
        let mut keys = vec![decl.name().to_string()];
        if partial != decl.name() {
            keys.push(partial);
        }

        self.all.push_back(id);
        for category in decl.kind().categories() {
            self.by_category
                .entry(*category)
                .or_insert_with(Vector::new)
                .push_back(id);
            let names = self.by_name.entry(*category).or_insert_with(HashMap::new);
            for key in &keys {
                names
                    .entry(key.clone())
                    .or_insert_with(Vector::new)
                    .push_back(id);
            }
        }
        Ok(())
    }

    fn append(&mut self, other: &DeclIndex) {
        self.all.append(other.all.clone());
        for (category, ids) in &other.by_category {
            self.by_category
                .entry(*category)
                .or_insert_with(Vector::new)
                .append(ids.clone());
        }
        for (category, names) in &other.by_name {
            let mine = self.by_name.entry(*category).or_insert_with(HashMap::new);
            for (name, ids) in names {
                mine.entry(name.clone())
                    .or_insert_with(Vector::new)
                    .append(ids.clone());
            }
        }
    }
}

/// The indices of one scope.
#[derive(Clone, Debug)]
pub struct ScopeIndex {
    tree: u64,
    revision: u64,
    recursive: DeclIndex,
    direct: DeclIndex,
}

impl ScopeIndex {
    /// The tree revision this index was built at.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Identity of the tree this index was built from.
    #[must_use]
    pub fn tree_identity(&self) -> u64 {
        self.tree
    }

    /// Returns true if `tree` is the tree this index was built from and it
    /// has not been edited since.
    #[must_use]
    pub fn is_fresh(&self, tree: &DeclTree) -> bool {
        self.tree == tree.identity() && self.revision == tree.revision()
    }

    /// The index over the scope's whole subtree, or only its children.
    #[must_use]
    pub fn range(&self, recursive: bool) -> &DeclIndex {
        if recursive {
            &self.recursive
        } else {
            &self.direct
        }
    }
}

/// Builds indices for `scope` and every scope nested in it, inserting
/// them into `indices`. Returns the number of scopes indexed.
pub(crate) fn build(
    tree: &DeclTree,
    scope: DeclId,
    indices: &mut HashMap<DeclId, ScopeIndex>,
) -> Result<usize> {
    let mut direct = DeclIndex::default();
    let mut recursive = DeclIndex::default();
    let mut built = 1;

    for child in tree.children(scope)? {
        direct.push(tree, child)?;
        recursive.push(tree, child)?;
        if tree.decl(child)?.is_scope() {
            built += build(tree, child, indices)?;
            if let Some(nested) = indices.get(&child) {
                recursive.append(&nested.recursive);
            }
        }
    }

    trace!(
        %scope,
        direct = direct.len(),
        recursive = recursive.len(),
        "scope index built"
    );
    indices.insert(
        scope,
        ScopeIndex {
            tree: tree.identity(),
            revision: tree.revision(),
            recursive,
            direct,
        },
    );
    Ok(built)
}
