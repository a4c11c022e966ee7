//! Schema layer describing the types the reflection cache works on.
//!
//! Types are declared explicitly, then registered into a concurrent
//! [`typesystem::TypeRegistry`]. Everything the reflection layer discovers about a type is read
//! from here.
//!
//! # Key Components
//!
//! - [`token`] - Compact type identities used as cache keys
//! - [`typesystem`] - Type descriptors, signatures, registry, builder and generic resolver
//! - [`member`] - Declared methods, fields and constructors with their backing Rust code
//!
//! # Examples
//!
//! ```rust
//! use ormscope::metadata::typesystem::{PrimitiveKind, TypeBuilder, TypeRegistry};
//!
//! struct Point {
//!     x: i32,
//! }
//!
//! let registry = TypeRegistry::new();
//! let point = registry.define(
//!     TypeBuilder::<Point>::class("geo", "Point")
//!         .field("x", PrimitiveKind::I32, |p| &p.x, |p| &mut p.x),
//! )?;
//!
//! assert_eq!(point.token.table(), 0x02);
//! assert_eq!(point.fields[0].name, "x");
//! # Ok::<(), ormscope::Error>(())
//! ```

/// Implementation of declared members (methods, fields, constructors)
pub mod member;
/// Implementation of type identities
pub mod token;
/// Implementation of the declarative type system
pub mod typesystem;
