// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![allow(clippy::too_many_arguments)]

//! # ormscope
//!
//! Type-metadata reflection cache for object mapping layers.
//!
//! A result-set mapper needs to know, for every domain type it fills, which properties exist,
//! how to read and write each of them and of which type they are. `ormscope` derives that
//! property surface once per type from an explicitly declared schema, caches it, and exposes
//! uniform invokers for reading and writing property values on live objects.
//!
//! ## Features
//!
//! - **Accessor conventions** - `getX`, `isX` and `setX` methods become properties, public
//!   fields fill the gaps
//! - **Conflict resolution** - Covariant overrides, overloaded setters and duplicate boolean
//!   getters are resolved deterministically, undecidable cases fail lazily on use
//! - **Generic resolution** - Member types declared through type variables are resolved
//!   against the concrete type being reflected
//! - **Concurrent caching** - One immutable record per type, shared through `Arc` and safe to
//!   read from many threads
//!
//! ## Quick Start
//!
//! ```rust
//! use ormscope::prelude::*;
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct User {
//!     user_name: String,
//! }
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry.define(
//!     TypeBuilder::<User>::class("app", "User")
//!         .getter("getUserName", PrimitiveKind::String, |u: &User| u.user_name.clone())
//!         .setter("setUserName", PrimitiveKind::String, |u: &mut User, v: String| u.user_name = v)
//!         .default_constructor(User::default),
//! )?;
//!
//! let cache = MetadataCache::new(registry);
//! let metadata = cache.metadata_of::<User>()?;
//!
//! let mut user = User::default();
//! metadata.set_value(&mut user, "userName", Box::new("ada".to_string()))?;
//! let name = metadata.get_value(&mut user, "userName")?;
//! assert_eq!(name.downcast_ref::<String>().map(String::as_str), Some("ada"));
//! # Ok::<(), ormscope::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`metadata`] - Declared types, members, signatures and the type registry
//! - [`reflection`] - Property discovery, conflict resolution, invokers and the cache
//!
//! ## Testing
//!
//! ```bash
//! cargo test
//! cargo bench
//! ```
#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use ormscope::prelude::*;
///
/// let registry = TypeRegistry::new();
/// assert_eq!(registry.object().fullname(), "object");
/// ```
pub mod prelude;

/// Declarative type system the reflection layer works on
///
/// Types, their members and their generic signatures are declared through
/// [`metadata::typesystem::TypeBuilder`] and stored in a [`metadata::typesystem::TypeRegistry`].
///
/// # Key Components
///
/// - [`metadata::typesystem`] - Type descriptors, registry and generic resolution
/// - [`metadata::member`] - Methods, fields and constructors backed by Rust closures
/// - [`metadata::token`] - Compact type identities
pub mod metadata;

/// Property reflection and the metadata cache
///
/// # Key Components
///
/// - [`MetadataCache`] - Builds and shares one record per type
/// - [`TypeMetadata`] - The per-type property surface
/// - [`Invoker`] - Reads or writes one property
pub mod reflection;

/// `ormscope` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `ormscope` Error type
///
/// # Examples
///
/// ```rust
/// use ormscope::{Error, MetadataCache, TypeRegistry};
/// use std::sync::Arc;
///
/// let cache = MetadataCache::new(Arc::new(TypeRegistry::new()));
/// match cache.metadata_by_name("app.Missing") {
///     Err(Error::TypeNotFound(name)) => assert_eq!(name, "app.Missing"),
///     _ => unreachable!(),
/// }
/// ```
pub use error::Error;

/// Registry and builder for declaring reflectable types
pub use metadata::typesystem::{TypeBuilder, TypeRegistry};

/// Dynamically typed property value
pub use metadata::member::Value;

/// Reflection entry points
pub use reflection::{
    AccessorKind, Invoker, MetadataCache, ReflectorConfig, TypeMetadata, TypeMetadataRc,
};
