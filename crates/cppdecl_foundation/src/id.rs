//! Declaration handles with generational indices.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable handle to a declaration node in a declaration tree.
///
/// The generation counter increments when a slot is reused after the node
/// that occupied it was destroyed, so handles to destroyed declarations are
/// detected instead of silently aliasing a new node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DeclId {
    /// Index into the node arena.
    pub index: u32,
    /// Generation counter for stale handle detection.
    pub generation: u32,
}

impl DeclId {
    /// Creates a handle with the given index and generation.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns the arena slot this handle points at.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Decl({})", self.index)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decl_id_equality() {
        let a = DeclId::new(1, 1);
        let b = DeclId::new(1, 1);
        let c = DeclId::new(1, 3);
        let d = DeclId::new(2, 1);

        assert_eq!(a, b);
        assert_ne!(a, c); // Different generation
        assert_ne!(a, d); // Different index
    }

    #[test]
    fn decl_id_formats() {
        let id = DeclId::new(42, 3);
        assert_eq!(format!("{id:?}"), "DeclId(42v3)");
        assert_eq!(format!("{id}"), "Decl(42)");
        assert_eq!(id.slot(), 42);
    }
}
