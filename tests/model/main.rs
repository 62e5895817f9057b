//! Integration tests for Layer 1: Model
//!
//! Tests for the declaration tree, qualified names and their caches,
//! structural edits, and dependency edges.

mod dependencies;
mod edits;
mod naming;
