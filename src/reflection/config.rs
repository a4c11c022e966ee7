//! Configuration for building and caching type metadata.

use crate::metadata::typesystem::MAX_RECURSION_DEPTH;

/// Configuration of a [`crate::MetadataCache`]
///
/// The defaults cache every record for the lifetime of the cache and allow generic
/// resolution to recurse up to [`MAX_RECURSION_DEPTH`] levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectorConfig {
    /// Retain built records; when disabled every request builds a fresh record
    pub cache_enabled: bool,

    /// Maximum nesting depth while resolving generic signatures (default: 64)
    /// Deeper signatures degrade to the top type
    pub max_resolution_depth: usize,
}

impl Default for ReflectorConfig {
    fn default() -> Self {
        Self {
            cache_enabled: true,
            max_resolution_depth: MAX_RECURSION_DEPTH,
        }
    }
}

impl ReflectorConfig {
    /// Creates a configuration that never retains records
    ///
    /// Every lookup reflects the type again. Mostly useful for tests and tooling that
    /// registers types while inspecting them.
    #[must_use]
    pub fn uncached() -> Self {
        Self {
            cache_enabled: false,
            ..Self::default()
        }
    }

    /// Overrides the generic resolution depth limit
    ///
    /// ## Arguments
    /// * 'depth' - The new limit
    #[must_use]
    pub fn with_max_resolution_depth(mut self, depth: usize) -> Self {
        self.max_resolution_depth = depth;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presets() {
        let default = ReflectorConfig::default();
        assert!(default.cache_enabled);
        assert_eq!(default.max_resolution_depth, MAX_RECURSION_DEPTH);

        let uncached = ReflectorConfig::uncached();
        assert!(!uncached.cache_enabled);
        assert_eq!(uncached.max_resolution_depth, default.max_resolution_depth);

        let shallow = ReflectorConfig::default().with_max_resolution_depth(4);
        assert_eq!(shallow.max_resolution_depth, 4);
        assert!(shallow.cache_enabled);
    }
}
