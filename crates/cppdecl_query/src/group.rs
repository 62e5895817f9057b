//! Batch access to the results of a plural query.

use cppdecl_foundation::{DeclId, Result};
use cppdecl_model::{DeclTree, Declaration};

use crate::matchers::Matcher;

/// An ordered group of declarations returned by a plural query.
///
/// The group only holds handles. Reads and writes go through the tree, so
/// every batch operation takes the tree explicitly.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DeclGroup {
    ids: Vec<DeclId>,
}

impl DeclGroup {
    /// Creates a group from handles.
    #[must_use]
    pub fn new(ids: Vec<DeclId>) -> Self {
        Self { ids }
    }

    /// Number of declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns true if the group is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// The handles in query order.
    #[must_use]
    pub fn ids(&self) -> &[DeclId] {
        &self.ids
    }

    /// The first handle.
    #[must_use]
    pub fn first(&self) -> Option<DeclId> {
        self.ids.first().copied()
    }

    /// Returns true if the group holds `id`.
    #[must_use]
    pub fn contains(&self, id: DeclId) -> bool {
        self.ids.contains(&id)
    }

    /// Iterates over the handles.
    pub fn iter(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.ids.iter().copied()
    }

    /// Consumes the group, returning its handles.
    #[must_use]
    pub fn into_vec(self) -> Vec<DeclId> {
        self.ids
    }

    /// The subgroup matching `matcher`, order preserved.
    #[must_use]
    pub fn filter(&self, tree: &DeclTree, matcher: &dyn Matcher) -> DeclGroup {
        self.iter().filter(|id| matcher.matches(tree, *id)).collect()
    }

    /// Calls `f` for every declaration.
    ///
    /// # Errors
    ///
    /// Fails on the first stale handle.
    pub fn for_each(
        &self,
        tree: &DeclTree,
        mut f: impl FnMut(DeclId, &Declaration),
    ) -> Result<()> {
        for id in &self.ids {
            f(*id, tree.decl(*id)?);
        }
        Ok(())
    }

    /// Calls `f` with mutable access to every declaration.
    ///
    /// # Errors
    ///
    /// Fails on the first stale handle; earlier declarations stay edited.
    pub fn for_each_mut(
        &self,
        tree: &mut DeclTree,
        mut f: impl FnMut(&mut Declaration),
    ) -> Result<()> {
        for id in &self.ids {
            f(tree.decl_mut(*id)?);
        }
        Ok(())
    }

    /// Sets the attribute string of every declaration.
    ///
    /// # Errors
    ///
    /// Fails on the first stale handle.
    pub fn set_attributes(&self, tree: &mut DeclTree, attributes: &str) -> Result<()> {
        self.for_each_mut(tree, |decl| decl.attributes = Some(attributes.to_string()))
    }

    /// Marks or unmarks every declaration as compiler-generated.
    ///
    /// # Errors
    ///
    /// Fails on the first stale handle.
    pub fn set_artificial(&self, tree: &mut DeclTree, artificial: bool) -> Result<()> {
        self.for_each_mut(tree, |decl| decl.is_artificial = artificial)
    }

    /// Fully qualified names of every declaration.
    ///
    /// # Errors
    ///
    /// Fails on the first stale handle.
    pub fn full_names(&self, tree: &DeclTree) -> Result<Vec<String>> {
        self.iter().map(|id| tree.full_name(id)).collect()
    }
}

impl FromIterator<DeclId> for DeclGroup {
    fn from_iter<I: IntoIterator<Item = DeclId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for DeclGroup {
    type Item = DeclId;
    type IntoIter = std::vec::IntoIter<DeclId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl<'a> IntoIterator for &'a DeclGroup {
    type Item = DeclId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, DeclId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}
