//! Integration tests for Layer 3: Traits
//!
//! Tests for convertibility, class traits and container traits on trees
//! shaped like real headers.

mod classes;
mod containers;
mod convertibility;
