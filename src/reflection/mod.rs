//! Reflection over registered types.
//!
//! This module turns the declared schema of a type into its property surface: which
//! properties can be read or written, through which accessor, and with which resolved type.
//!
//! # Build Pipeline
//!
//! 1. The member enumerator collects accessor-shaped methods and fields along the type's
//!    hierarchy
//! 2. The conflict resolver reduces them to one [`Invoker`] per property and direction
//! 3. Generic member types are resolved against the reflected type
//! 4. The result is frozen into a [`TypeMetadata`] and published by the [`MetadataCache`]
//!
//! # Key Components
//!
//! - [`MetadataCache`] - Shared, lazily filled store of records
//! - [`TypeMetadata`] - The immutable per-type record
//! - [`Invoker`] - Uniform call surface for property accessors
//! - [`ReflectorConfig`] - Cache and resolution settings
//! - [`namer`] - Accessor naming conventions

mod cache;
mod config;
mod conflicts;
mod enumerator;
mod invoker;
mod record;

pub mod namer;

use strum::Display;

pub use cache::{MetadataCache, TypeMetadataRc};
pub use config::ReflectorConfig;
pub use invoker::{AmbiguousInvoker, FieldAccess, FieldInvoker, Invoker, MethodInvoker};
pub use record::TypeMetadata;

/// Direction of a property accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "lowercase")]
pub enum AccessorKind {
    /// Reads the property
    Getter,
    /// Writes the property
    Setter,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessor_kind_display() {
        assert_eq!(AccessorKind::Getter.to_string(), "getter");
        assert_eq!(AccessorKind::Setter.to_string(), "setter");
    }
}
