//! Integration tests for Layer 0: Foundation
//!
//! Tests for handles, errors, template-name parsing and container names.

mod containers;
mod errors;
mod pattern;
