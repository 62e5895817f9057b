//! Configuration for declaration trees and query engines.

/// Configuration owned by a declaration tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelConfig {
    /// Whether derived per-declaration values (names, paths, container
    /// decomposition) are memoized.
    ///
    /// Turn this off during bulk restructuring; every access recomputes
    /// until it is turned back on.
    pub cache_enabled: bool,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
        }
    }
}

impl ModelConfig {
    /// Creates a configuration with caching disabled.
    #[must_use]
    pub fn uncached() -> Self {
        Self {
            cache_enabled: false,
        }
    }

    /// Builder method to set the cache switch.
    #[must_use]
    pub fn with_cache_enabled(mut self, enabled: bool) -> Self {
        self.cache_enabled = enabled;
        self
    }
}

/// Configuration owned by a query engine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryConfig {
    /// Whether queries descend into nested scopes when the caller does
    /// not say otherwise.
    pub recursive: bool,
    /// Whether plural queries may return an empty group when the caller
    /// does not say otherwise.
    pub allow_empty: bool,
    /// Whether queries may use built optimizer indices.
    pub optimize: bool,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            recursive: true,
            allow_empty: false,
            optimize: true,
        }
    }
}

impl QueryConfig {
    /// Builder method to set the default recursion.
    #[must_use]
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Builder method to set whether empty plural results are allowed.
    #[must_use]
    pub fn with_allow_empty(mut self, allow_empty: bool) -> Self {
        self.allow_empty = allow_empty;
        self
    }

    /// Builder method to enable/disable use of optimizer indices.
    #[must_use]
    pub fn with_optimize(mut self, optimize: bool) -> Self {
        self.optimize = optimize;
        self
    }
}
