//! Shared store of reflected type metadata.
//!
//! # Concurrency
//!
//! Lookups are lock-free reads of a `SkipMap`. A missing record is built outside of any
//! lock and published with a single `get_or_insert`: when several threads race on the same
//! type they may build redundantly, but the first published record wins and every caller
//! receives that same `Arc`.

use std::{any::type_name, sync::Arc};

use crossbeam_skiplist::SkipMap;
use rayon::prelude::*;

use crate::{
    metadata::{
        token::Token,
        typesystem::{TypeRc, TypeRegistry},
    },
    reflection::{ReflectorConfig, TypeMetadata},
    Error, Result,
};

/// Reference to a `TypeMetadata`
pub type TypeMetadataRc = Arc<TypeMetadata>;

/// Builds and retains one [`TypeMetadata`] per registered type.
///
/// The cache is an explicit service: create one per [`TypeRegistry`] and hand it to the
/// components that need to read or write object state. Records are built on first use and
/// kept for the lifetime of the cache.
///
/// # Examples
///
/// ```rust
/// use ormscope::{MetadataCache, TypeBuilder, TypeRegistry};
/// use ormscope::metadata::typesystem::PrimitiveKind;
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Counter {
///     count: i32,
/// }
///
/// let registry = Arc::new(TypeRegistry::new());
/// let counter = registry.define(
///     TypeBuilder::<Counter>::class("demo", "Counter")
///         .field("count", PrimitiveKind::I32, |c| &c.count, |c| &mut c.count)
///         .default_constructor(Counter::default),
/// )?;
///
/// let cache = MetadataCache::new(registry);
/// let first = cache.metadata(&counter);
/// let second = cache.metadata_by_name("demo.Counter")?;
///
/// assert!(Arc::ptr_eq(&first, &second));
/// assert!(first.has_setter("count"));
/// # Ok::<(), ormscope::Error>(())
/// ```
pub struct MetadataCache {
    registry: Arc<TypeRegistry>,
    config: ReflectorConfig,
    records: SkipMap<Token, TypeMetadataRc>,
}

impl MetadataCache {
    /// Create a new cache over `registry` with the default configuration
    ///
    /// ## Arguments
    /// * 'registry' - The registry all reflected types live in
    #[must_use]
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self::with_config(registry, ReflectorConfig::default())
    }

    /// Create a new cache over `registry`
    ///
    /// ## Arguments
    /// * 'registry' - The registry all reflected types live in
    /// * 'config'   - The configuration to use
    #[must_use]
    pub fn with_config(registry: Arc<TypeRegistry>, config: ReflectorConfig) -> Self {
        MetadataCache {
            registry,
            config,
            records: SkipMap::new(),
        }
    }

    /// The metadata of `ty`, built on first request
    ///
    /// Tokens are only unique within one registry. A type that was not registered in this
    /// cache's registry is reflected into a fresh record that is never cached.
    ///
    /// ## Arguments
    /// * 'ty' - The type to reflect
    pub fn metadata(&self, ty: &TypeRc) -> TypeMetadataRc {
        if !self.config.cache_enabled {
            return Arc::new(TypeMetadata::build(ty, &self.registry, &self.config));
        }

        if !self.owns(ty) {
            log::warn!(
                "Type {} ({}) belongs to another registry, building an uncached record",
                ty.fullname(),
                ty.token
            );
            return Arc::new(TypeMetadata::build(ty, &self.registry, &self.config));
        }

        if let Some(entry) = self.records.get(&ty.token) {
            return entry.value().clone();
        }

        let built = Arc::new(TypeMetadata::build(ty, &self.registry, &self.config));
        self.records.get_or_insert(ty.token, built).value().clone()
    }

    /// The metadata of the type bound to the Rust type `T`
    ///
    /// # Errors
    /// Returns [`Error::TypeNotFound`] if no class is bound to `T`.
    pub fn metadata_of<T: 'static>(&self) -> Result<TypeMetadataRc> {
        let ty = self
            .registry
            .get_by_rust_type::<T>()
            .ok_or_else(|| Error::TypeNotFound(type_name::<T>().to_string()))?;
        Ok(self.metadata(&ty))
    }

    /// The metadata of the type registered as `fullname`
    ///
    /// # Errors
    /// Returns [`Error::TypeNotFound`] if no type has that name.
    pub fn metadata_by_name(&self, fullname: &str) -> Result<TypeMetadataRc> {
        let ty = self
            .registry
            .get_by_fullname(fullname)
            .ok_or_else(|| Error::TypeNotFound(fullname.to_string()))?;
        Ok(self.metadata(&ty))
    }

    /// Build the metadata of all `types` in parallel
    ///
    /// Has no lasting effect when caching is disabled.
    ///
    /// ## Arguments
    /// * 'types' - The types to reflect
    pub fn preload(&self, types: &[TypeRc]) {
        types.par_iter().for_each(|ty| {
            self.metadata(ty);
        });
    }

    /// True if a record for `ty` has been published
    #[must_use]
    pub fn is_cached(&self, ty: &TypeRc) -> bool {
        self.owns(ty) && self.records.contains_key(&ty.token)
    }

    fn owns(&self, ty: &TypeRc) -> bool {
        self.registry
            .get(&ty.token)
            .is_some_and(|registered| Arc::ptr_eq(&registered, ty))
    }

    /// Count of cached records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no record has been cached yet
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The registry this cache reflects on
    #[must_use]
    pub fn registry(&self) -> &Arc<TypeRegistry> {
        &self.registry
    }

    /// The active configuration
    #[must_use]
    pub fn config(&self) -> &ReflectorConfig {
        &self.config
    }
}
