//! Arena-backed declaration tree with generational handles.
//!
//! The `DeclTree` owns every declaration. Parents own ordered child
//! lists; children hold a plain parent handle. Base/derived links between
//! classes are non-owning handles stored on both ends.

// Arena indices are u32 by construction
#![allow(clippy::cast_possible_truncation)]

use std::sync::atomic::{AtomicU64, Ordering};

use cppdecl_foundation::{DeclId, Error, ModelConfig, Result};
use tracing::{debug, trace};

use crate::decl::{AccessType, DeclData, Declaration, HierarchyInfo};

static NEXT_TREE_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// Hands out a process-unique tree identity.
pub(crate) fn next_identity() -> u64 {
    NEXT_TREE_IDENTITY.fetch_add(1, Ordering::Relaxed)
}

/// The declaration tree.
///
/// Slots are allocated from a free list when available. A slot's
/// generation is odd while it holds a live declaration and even while it
/// is free, so handles to destroyed declarations are reported as stale.
#[derive(Debug)]
pub struct DeclTree {
    pub(crate) generations: Vec<u32>,
    pub(crate) nodes: Vec<Option<Declaration>>,
    pub(crate) free_list: Vec<u32>,
    pub(crate) live_count: usize,
    pub(crate) root: DeclId,
    pub(crate) config: ModelConfig,
    pub(crate) revision: u64,
    pub(crate) identity: u64,
}

impl Default for DeclTree {
    fn default() -> Self {
        Self::new()
    }
}

impl DeclTree {
    /// Creates a tree holding only the global namespace `::`.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(ModelConfig::default())
    }

    /// Creates a tree with the given configuration.
    #[must_use]
    pub fn with_config(config: ModelConfig) -> Self {
        let mut tree = Self {
            generations: Vec::new(),
            nodes: Vec::new(),
            free_list: Vec::new(),
            live_count: 0,
            root: DeclId::new(0, 1),
            config,
            revision: 0,
            identity: next_identity(),
        };
        tree.root = tree.allocate(Declaration::namespace("::"));
        tree
    }

    /// The global namespace.
    #[must_use]
    pub fn root(&self) -> DeclId {
        self.root
    }

    /// The tree configuration.
    #[must_use]
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Whether derived values are memoized.
    #[must_use]
    pub fn cache_enabled(&self) -> bool {
        self.config.cache_enabled
    }

    /// Turns memoization on or off. Turning it off clears every cache.
    pub fn set_cache_enabled(&mut self, enabled: bool) {
        if self.config.cache_enabled == enabled {
            return;
        }
        self.config.cache_enabled = enabled;
        if !enabled {
            self.reset_caches();
        }
        debug!(enabled, declarations = self.live_count, "declaration cache toggled");
    }

    /// Clears the caches of every declaration.
    pub fn reset_caches(&self) {
        for decl in self.nodes.iter().flatten() {
            decl.cache.reset();
        }
    }

    /// Counter bumped by every edit: attach, remove, rename, destroy,
    /// access change and any mutable borrow through [`Self::decl_mut`].
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Process-unique identity of this tree instance. Two trees never
    /// share one, even at the same revision; a loaded snapshot gets a
    /// fresh one.
    #[must_use]
    pub fn identity(&self) -> u64 {
        self.identity
    }

    /// Number of live declarations, detached ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Always false: the global namespace is never destroyed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Iterates over every live declaration handle.
    pub fn iter(&self) -> impl Iterator<Item = DeclId> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_some())
            .map(|(idx, _)| DeclId::new(idx as u32, self.generations[idx]))
    }

    // -------------------------------------------------------------------------
    // Handle validation and access
    // -------------------------------------------------------------------------

    /// Checks if a handle refers to a live declaration.
    #[must_use]
    pub fn exists(&self, id: DeclId) -> bool {
        self.generations
            .get(id.slot())
            .is_some_and(|generation| *generation == id.generation && generation % 2 == 1)
    }

    /// Validates that a handle refers to a live declaration.
    ///
    /// # Errors
    ///
    /// `StaleDeclaration` if the slot was reused or freed since the handle
    /// was issued, `DeclarationNotFound` if the slot never existed.
    pub fn validate(&self, id: DeclId) -> Result<()> {
        let Some(current) = self.generations.get(id.slot()) else {
            return Err(Error::declaration_not_found(id));
        };
        if *current != id.generation {
            return Err(Error::stale_declaration(id));
        }
        if current % 2 == 0 {
            return Err(Error::declaration_not_found(id));
        }
        Ok(())
    }

    /// Returns the declaration, or `None` for bad handles.
    #[must_use]
    pub fn get(&self, id: DeclId) -> Option<&Declaration> {
        if !self.exists(id) {
            return None;
        }
        self.nodes.get(id.slot())?.as_ref()
    }

    /// Returns the declaration.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn decl(&self, id: DeclId) -> Result<&Declaration> {
        self.validate(id)?;
        self.nodes
            .get(id.slot())
            .and_then(Option::as_ref)
            .ok_or_else(|| Error::declaration_not_found(id))
    }

    /// Returns the declaration mutably.
    ///
    /// Counts as an edit and bumps the revision.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn decl_mut(&mut self, id: DeclId) -> Result<&mut Declaration> {
        self.validate(id)?;
        self.revision += 1;
        self.nodes
            .get_mut(id.slot())
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::declaration_not_found(id))
    }

    /// The parent of a declaration.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn parent(&self, id: DeclId) -> Result<Option<DeclId>> {
        Ok(self.decl(id)?.parent)
    }

    /// Direct children of a scope; empty for other declarations.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn children(&self, id: DeclId) -> Result<Vec<DeclId>> {
        Ok(self.decl(id)?.children())
    }

    /// Ancestors of a declaration, nearest first.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn ancestors(&self, id: DeclId) -> Result<Vec<DeclId>> {
        let mut result = Vec::new();
        let mut current = self.decl(id)?.parent;
        while let Some(parent) = current {
            result.push(parent);
            current = self.decl(parent)?.parent;
        }
        Ok(result)
    }

    /// The declaration and all its descendants, in pre-order.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn subtree(&self, id: DeclId) -> Result<Vec<DeclId>> {
        let mut result = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let decl = self.decl(current)?;
            result.push(current);
            let children = decl.children();
            stack.extend(children.into_iter().rev());
        }
        Ok(result)
    }

    // -------------------------------------------------------------------------
    // Structural edits
    // -------------------------------------------------------------------------

    fn allocate(&mut self, decl: Declaration) -> DeclId {
        self.live_count += 1;
        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            self.generations[idx] += 1;
            self.nodes[idx] = Some(decl);
            DeclId::new(index, self.generations[idx])
        } else {
            let index = self.generations.len() as u32;
            self.generations.push(1);
            self.nodes.push(Some(decl));
            DeclId::new(index, 1)
        }
    }

    /// Adds a declaration that has no parent yet.
    ///
    /// Nested children listed inside `decl` are ignored; children are
    /// added through [`insert`](Self::insert) or [`attach`](Self::attach).
    pub fn create_detached(&mut self, mut decl: Declaration) -> DeclId {
        decl.parent = None;
        clear_children(&mut decl.data);
        self.allocate(decl)
    }

    /// Adds a declaration under a scope.
    ///
    /// Class members get the class key's default access (`private` for
    /// `class`, `public` otherwise); use
    /// [`insert_member`](Self::insert_member) to pick one.
    ///
    /// # Errors
    ///
    /// Fails if `parent` is not a live namespace or class.
    pub fn insert(&mut self, parent: DeclId, decl: Declaration) -> Result<DeclId> {
        self.ensure_scope(parent)?;
        let id = self.create_detached(decl);
        self.attach(parent, id, None)?;
        Ok(id)
    }

    /// Adds a member to a class with the given access.
    ///
    /// # Errors
    ///
    /// Fails if `class` is not a live class.
    pub fn insert_member(
        &mut self,
        class: DeclId,
        decl: Declaration,
        access: AccessType,
    ) -> Result<DeclId> {
        if self.decl(class)?.as_class().is_none() {
            return Err(Error::precondition(format!(
                "{class} is not a class; members need a class parent"
            )));
        }
        let id = self.create_detached(decl);
        self.attach(class, id, Some(access))?;
        Ok(id)
    }

    /// Re-parents a detached declaration under a scope.
    ///
    /// # Errors
    ///
    /// Fails if `child` already has a parent or is the root, if `parent`
    /// is not a scope, or if `parent` lies inside `child`'s subtree.
    pub fn attach(
        &mut self,
        parent: DeclId,
        child: DeclId,
        access: Option<AccessType>,
    ) -> Result<()> {
        self.ensure_scope(parent)?;
        if child == self.root {
            return Err(Error::precondition("the global namespace cannot be attached"));
        }
        if self.decl(child)?.parent.is_some() {
            return Err(Error::precondition(format!(
                "{child} already has a parent; remove it first"
            )));
        }
        if parent == child || self.ancestors(parent)?.contains(&child) {
            return Err(Error::precondition(format!(
                "attaching {child} under {parent} would create a cycle"
            )));
        }

        match &mut self.decl_mut(parent)?.data {
            DeclData::Namespace(ns) => ns.children.push(child),
            DeclData::Class(class) => {
                let access = access.unwrap_or_else(|| class.class_key.default_access());
                class.members_mut(access).push(child);
            }
            _ => return Err(Error::internal("scope check passed for a non-scope")),
        }
        self.decl_mut(child)?.parent = Some(parent);
        self.reset_subtree_caches(child)?;
        self.revision += 1;
        trace!(%parent, %child, "declaration attached");
        Ok(())
    }

    /// Detaches a declaration from its parent.
    ///
    /// The declaration stays alive as a detached subtree and can be
    /// re-attached. Caches of the detached subtree are reset.
    ///
    /// # Errors
    ///
    /// Fails if the declaration has no parent.
    pub fn remove_declaration(&mut self, id: DeclId) -> Result<()> {
        let Some(parent) = self.decl(id)?.parent else {
            return Err(Error::precondition(format!("{id} has no parent to be removed from")));
        };
        match &mut self.decl_mut(parent)?.data {
            DeclData::Namespace(ns) => ns.children.retain(|c| *c != id),
            DeclData::Class(class) => {
                for access in AccessType::ALL {
                    class.members_mut(access).retain(|c| *c != id);
                }
            }
            _ => {}
        }
        self.decl_mut(id)?.parent = None;
        self.reset_subtree_caches(id)?;
        self.revision += 1;
        trace!(%parent, child = %id, "declaration removed");
        Ok(())
    }

    /// Frees a detached subtree.
    ///
    /// Base/derived links held by surviving classes that point into the
    /// subtree are purged.
    ///
    /// # Errors
    ///
    /// Fails if the declaration is the root or still attached.
    pub fn destroy(&mut self, id: DeclId) -> Result<()> {
        if id == self.root {
            return Err(Error::precondition("the global namespace cannot be destroyed"));
        }
        if self.decl(id)?.parent.is_some() {
            return Err(Error::precondition(format!(
                "{id} is still attached; remove it before destroying"
            )));
        }
        let doomed = self.subtree(id)?;
        for victim in &doomed {
            let idx = victim.slot();
            self.nodes[idx] = None;
            self.generations[idx] += 1;
            self.free_list.push(victim.index);
            self.live_count -= 1;
        }
        for decl in self.nodes.iter_mut().flatten() {
            if let DeclData::Class(class) = &mut decl.data {
                class.bases.retain(|h| !doomed.contains(&h.related_class));
                class.derived.retain(|h| !doomed.contains(&h.related_class));
            }
        }
        self.revision += 1;
        debug!(root = %id, destroyed = doomed.len(), "subtree destroyed");
        Ok(())
    }

    /// Renames a declaration.
    ///
    /// Name-derived caches of the declaration and of its whole subtree
    /// are reset.
    ///
    /// # Errors
    ///
    /// Fails for stale or unknown handles.
    pub fn rename(&mut self, id: DeclId, name: impl Into<String>) -> Result<()> {
        self.decl_mut(id)?.name = name.into();
        self.reset_subtree_caches(id)?;
        self.revision += 1;
        Ok(())
    }

    /// Moves a class member to another access bucket.
    ///
    /// # Errors
    ///
    /// Fails if the declaration is not a class member.
    pub fn set_access(&mut self, member: DeclId, access: AccessType) -> Result<()> {
        let parent = self.decl(member)?.parent;
        let Some(class) = parent.and_then(|p| self.get(p)).and_then(Declaration::as_class)
        else {
            return Err(Error::precondition(format!("{member} is not a class member")));
        };
        if class.access_of(member) == Some(access) {
            return Ok(());
        }
        let Some(DeclData::Class(class)) = parent
            .and_then(|p| self.nodes.get_mut(p.slot()))
            .and_then(Option::as_mut)
            .map(|d| &mut d.data)
        else {
            return Err(Error::internal("class parent vanished"));
        };
        for bucket in AccessType::ALL {
            class.members_mut(bucket).retain(|c| *c != member);
        }
        class.members_mut(access).push(member);
        self.decl(member)?.cache.reset_access_type();
        self.revision += 1;
        Ok(())
    }

    /// Records that `derived` inherits from `base`.
    ///
    /// # Errors
    ///
    /// Fails unless both handles are live classes.
    pub fn add_base(
        &mut self,
        derived: DeclId,
        base: DeclId,
        access: AccessType,
        is_virtual: bool,
    ) -> Result<()> {
        for id in [derived, base] {
            if self.decl(id)?.as_class().is_none() {
                return Err(Error::precondition(format!(
                    "{id} is not a class; inheritance links join classes"
                )));
            }
        }
        if let Some(class) = self.decl_mut(derived)?.as_class_mut() {
            class.bases.push(HierarchyInfo {
                related_class: base,
                access,
                is_virtual,
            });
        }
        if let Some(class) = self.decl_mut(base)?.as_class_mut() {
            class.derived.push(HierarchyInfo {
                related_class: derived,
                access,
                is_virtual,
            });
        }
        self.revision += 1;
        Ok(())
    }

    fn ensure_scope(&self, id: DeclId) -> Result<()> {
        if self.decl(id)?.is_scope() {
            Ok(())
        } else {
            Err(Error::precondition(format!(
                "{id} is not a namespace or class"
            )))
        }
    }

    fn reset_subtree_caches(&self, id: DeclId) -> Result<()> {
        for member in self.subtree(id)? {
            self.decl(member)?.cache.reset();
        }
        Ok(())
    }
}

fn clear_children(data: &mut DeclData) {
    match data {
        DeclData::Namespace(ns) => ns.children.clear(),
        DeclData::Class(class) => {
            for access in AccessType::ALL {
                class.members_mut(access).clear();
            }
            class.bases.clear();
            class.derived.clear();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Type;

    fn sample() -> (DeclTree, DeclId, DeclId, DeclId) {
        let mut tree = DeclTree::new();
        let ns = tree.insert(tree.root(), Declaration::namespace("app")).unwrap();
        let class = tree.insert(ns, Declaration::class("Widget")).unwrap();
        let field = tree
            .insert_member(class, Declaration::variable("size", Type::int()), AccessType::Public)
            .unwrap();
        (tree, ns, class, field)
    }

    #[test]
    fn new_tree_has_global_namespace() {
        let tree = DeclTree::new();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.decl(tree.root()).unwrap().name(), "::");
        assert!(tree.parent(tree.root()).unwrap().is_none());
    }

    #[test]
    fn insert_links_parent_and_child() {
        let (tree, ns, class, field) = sample();
        assert_eq!(tree.parent(class).unwrap(), Some(ns));
        assert_eq!(tree.children(ns).unwrap(), vec![class]);
        assert_eq!(
            tree.decl(class).unwrap().as_class().unwrap().access_of(field),
            Some(AccessType::Public)
        );
        assert_eq!(tree.ancestors(field).unwrap(), vec![class, ns, tree.root()]);
    }

    #[test]
    fn insert_into_class_uses_default_access() {
        let (mut tree, ns, class, _) = sample();
        let hidden = tree.insert(class, Declaration::variable("x", Type::int())).unwrap();
        let data = tree.decl(class).unwrap().as_class().unwrap();
        assert_eq!(data.access_of(hidden), Some(AccessType::Private));

        let point = tree.insert(ns, Declaration::struct_("Point")).unwrap();
        let y = tree.insert(point, Declaration::variable("y", Type::int())).unwrap();
        let data = tree.decl(point).unwrap().as_class().unwrap();
        assert_eq!(data.access_of(y), Some(AccessType::Public));
    }

    #[test]
    fn insert_under_non_scope_fails() {
        let (mut tree, _, _, field) = sample();
        let err = tree.insert(field, Declaration::class("X")).unwrap_err();
        assert!(matches!(
            err.kind,
            cppdecl_foundation::ErrorKind::PreconditionViolation(_)
        ));
    }

    #[test]
    fn subtree_is_pre_order() {
        let (mut tree, ns, class, field) = sample();
        let other = tree.insert(ns, Declaration::class("Other")).unwrap();
        assert_eq!(
            tree.subtree(tree.root()).unwrap(),
            vec![tree.root(), ns, class, field, other]
        );
    }

    #[test]
    fn remove_and_reattach() {
        let (mut tree, ns, class, _) = sample();
        let revision = tree.revision();
        tree.remove_declaration(class).unwrap();
        assert!(tree.children(ns).unwrap().is_empty());
        assert!(tree.parent(class).unwrap().is_none());
        assert!(tree.revision() > revision);

        tree.attach(tree.root(), class, None).unwrap();
        assert_eq!(tree.parent(class).unwrap(), Some(tree.root()));
    }

    #[test]
    fn attach_rejects_cycles() {
        let (mut tree, ns, class, _) = sample();
        tree.remove_declaration(ns).unwrap();
        assert!(tree.attach(class, ns, None).is_err());
    }

    #[test]
    fn destroy_makes_handles_stale() {
        let (mut tree, ns, class, field) = sample();
        tree.remove_declaration(class).unwrap();
        tree.destroy(class).unwrap();
        assert!(matches!(
            tree.decl(class).unwrap_err().kind,
            cppdecl_foundation::ErrorKind::StaleDeclaration(_)
        ));
        assert!(!tree.exists(field));
        assert_eq!(tree.len(), 2);

        // Slot reuse bumps the generation
        let reused = tree.insert(ns, Declaration::class("New")).unwrap();
        assert_ne!(reused, class);
        assert!(tree.get(class).is_none());
    }

    #[test]
    fn destroy_requires_detached() {
        let (mut tree, _, class, _) = sample();
        assert!(tree.destroy(class).is_err());
        assert!(tree.destroy(tree.root()).is_err());
    }

    #[test]
    fn destroy_purges_hierarchy_links() {
        let (mut tree, ns, class, _) = sample();
        let base = tree.insert(ns, Declaration::class("Base")).unwrap();
        tree.add_base(class, base, AccessType::Public, false).unwrap();
        assert_eq!(tree.decl(base).unwrap().as_class().unwrap().derived().len(), 1);

        tree.remove_declaration(class).unwrap();
        tree.destroy(class).unwrap();
        assert!(tree.decl(base).unwrap().as_class().unwrap().derived().is_empty());
    }

    #[test]
    fn set_access_moves_bucket() {
        let (mut tree, _, class, field) = sample();
        tree.set_access(field, AccessType::Protected).unwrap();
        let data = tree.decl(class).unwrap().as_class().unwrap();
        assert_eq!(data.access_of(field), Some(AccessType::Protected));
        assert!(data.members(AccessType::Public).is_empty());
    }

    #[test]
    fn add_base_requires_classes() {
        let (mut tree, ns, class, _) = sample();
        assert!(tree.add_base(class, ns, AccessType::Public, false).is_err());
    }

    #[test]
    fn mutable_borrow_bumps_revision() {
        let (mut tree, _, _, field) = sample();
        let revision = tree.revision();
        tree.decl_mut(field).unwrap().is_artificial = true;
        assert!(tree.revision() > revision);
    }

    #[test]
    fn each_tree_gets_its_own_identity() {
        let first = DeclTree::new();
        let second = DeclTree::new();
        assert_ne!(first.identity(), second.identity());
    }

    #[test]
    fn unknown_handle_is_not_found() {
        let tree = DeclTree::new();
        let err = tree.decl(DeclId::new(99, 1)).unwrap_err();
        assert!(matches!(
            err.kind,
            cppdecl_foundation::ErrorKind::DeclarationNotFound(_)
        ));
    }
}
