//! # ormscope Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the ormscope library. Import this module to get quick access to everything needed
//! to declare types and reflect on them.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all ormscope operations
pub use crate::Error;

/// The result type used throughout ormscope
pub use crate::Result;

/// Configuration of the metadata cache
pub use crate::ReflectorConfig;

// ================================================================================================
// Type System
// ================================================================================================

/// Type identities
pub use crate::metadata::token::Token;

/// Core type system components
pub use crate::metadata::typesystem::{
    GenericParam, PrimitiveKind, SuperType, TypeBuilder, TypeFlavor, TypeInfo, TypeRc,
    TypeRegistry, TypeResolver, TypeSignature, Upcast,
};

/// Declared members
pub use crate::metadata::member::{
    Constructor, ConstructorRc, Field, FieldModifiers, FieldRc, Method, MethodModifiers,
    MethodRc, Value,
};

// ================================================================================================
// Reflection
// ================================================================================================

/// Metadata cache and per-type records
pub use crate::reflection::{MetadataCache, TypeMetadata, TypeMetadataRc};

/// Property accessors
pub use crate::reflection::{
    AccessorKind, AmbiguousInvoker, FieldAccess, FieldInvoker, Invoker, MethodInvoker,
};

/// Accessor naming conventions
pub use crate::reflection::namer;
