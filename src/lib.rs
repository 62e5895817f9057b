//! cppdecl - Queryable model of parsed C++ declarations
//!
//! This crate re-exports all layers of the cppdecl system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: cppdecl_traits     - Type, class, convertibility and container traits
//! Layer 2: cppdecl_query      - Matchers, finders, optimizer index
//! Layer 1: cppdecl_model      - Declaration tree, types, naming, caches, snapshots
//! Layer 0: cppdecl_foundation - Handles, errors, config, template-name parsing
//! ```

pub use cppdecl_foundation as foundation;
pub use cppdecl_model as model;
pub use cppdecl_query as query;
pub use cppdecl_traits as traits;
