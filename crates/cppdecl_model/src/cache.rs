//! Per-declaration memo slots.
//!
//! Every declaration carries a [`DeclCache`]. Values are only read or
//! written while the owning tree has caching enabled; disabling caching
//! clears every slot.

use std::cell::RefCell;
use std::fmt;

use cppdecl_foundation::ContainerKind;

use crate::decl::AccessType;
use crate::types::Type;

/// A single memoized value.
pub struct CacheSlot<T>(RefCell<Option<T>>);

impl<T> Default for CacheSlot<T> {
    fn default() -> Self {
        Self(RefCell::new(None))
    }
}

impl<T: Clone> CacheSlot<T> {
    /// Returns the stored value, if any.
    #[must_use]
    pub fn get(&self) -> Option<T> {
        self.0.borrow().clone()
    }

    /// Stores a value.
    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = Some(value);
    }

    /// Forgets the stored value.
    pub fn clear(&self) {
        self.0.borrow_mut().take();
    }

    /// Returns true if a value is stored.
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.0.borrow().is_some()
    }
}

impl<T: fmt::Debug> fmt::Debug for CacheSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.try_borrow() {
            Ok(value) => value.fmt(f),
            Err(_) => f.write_str("<borrowed>"),
        }
    }
}

/// Memoized derived values of one declaration.
#[derive(Debug, Default)]
pub struct DeclCache {
    pub(crate) full_name: CacheSlot<String>,
    pub(crate) full_partial_name: CacheSlot<String>,
    pub(crate) declaration_path: CacheSlot<Vec<String>>,
    pub(crate) partial_declaration_path: CacheSlot<Vec<String>>,
    pub(crate) partial_name: CacheSlot<String>,
    pub(crate) demangled_name: CacheSlot<String>,
    pub(crate) access_type: CacheSlot<Option<AccessType>>,
    container_traits: CacheSlot<Option<ContainerKind>>,
    container_element_type: CacheSlot<Type>,
    container_key_type: CacheSlot<Type>,
}

impl Clone for DeclCache {
    /// Clones start cold.
    fn clone(&self) -> Self {
        Self::default()
    }
}

impl DeclCache {
    /// Memoized container recognition (`None` inside means "not a
    /// container").
    #[must_use]
    pub fn container_traits(&self) -> &CacheSlot<Option<ContainerKind>> {
        &self.container_traits
    }

    /// Memoized container element type.
    #[must_use]
    pub fn container_element_type(&self) -> &CacheSlot<Type> {
        &self.container_element_type
    }

    /// Memoized container key type.
    #[must_use]
    pub fn container_key_type(&self) -> &CacheSlot<Type> {
        &self.container_key_type
    }

    /// Clears the slots derived from names and tree position.
    pub fn reset_name_based(&self) {
        self.full_name.clear();
        self.full_partial_name.clear();
        self.declaration_path.clear();
        self.partial_declaration_path.clear();
        self.partial_name.clear();
        self.demangled_name.clear();
        self.container_traits.clear();
    }

    /// Clears the access type slot.
    pub fn reset_access_type(&self) {
        self.access_type.clear();
    }

    /// Clears every slot.
    pub fn reset(&self) {
        self.reset_name_based();
        self.reset_access_type();
        self.container_element_type.clear();
        self.container_key_type.clear();
    }

    /// Returns true if no slot holds a value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.full_name.is_set()
            || self.full_partial_name.is_set()
            || self.declaration_path.is_set()
            || self.partial_declaration_path.is_set()
            || self.partial_name.is_set()
            || self.demangled_name.is_set()
            || self.access_type.is_set()
            || self.container_traits.is_set()
            || self.container_element_type.is_set()
            || self.container_key_type.is_set())
    }
}

/// Reads `slot` or computes, stores and returns a fresh value.
///
/// With `enabled == false` the slot is bypassed entirely.
///
/// # Errors
///
/// Propagates the error of `compute`; nothing is stored then.
pub fn memoize<T: Clone, E>(
    slot: &CacheSlot<T>,
    enabled: bool,
    compute: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    if !enabled {
        return compute();
    }
    if let Some(value) = slot.get() {
        return Ok(value);
    }
    let value = compute()?;
    slot.set(value.clone());
    Ok(value)
}
