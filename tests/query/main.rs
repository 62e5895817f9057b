//! Integration tests for Layer 2: Query
//!
//! Tests for matchers, single and plural lookups, and the optimizer index.

mod lookups;
mod matchers;
mod optimizer;
