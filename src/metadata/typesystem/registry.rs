//! Central type registry for declared types.
//!
//! This module provides the `TypeRegistry`, a thread-safe registry for every type the
//! reflection cache can reflect on. Types enter the registry through
//! [`TypeRegistry::define`], array types are synthesized on demand while resolving generic
//! signatures.
//!
//! # Registry Architecture
//!
//! - **Token-based lookup**: Primary storage indexed by [`Token`]
//! - **Name-based lookup**: Secondary index by full name (`namespace.name`)
//! - **Rust type lookup**: Secondary index by the bound [`TypeId`]
//!
//! # Thread Safety
//!
//! - Lock-free data structures for primary storage (`SkipMap`)
//! - Concurrent hash maps for indices (`DashMap`)
//! - Atomic operations for token generation
//!
//! # Examples
//!
//! ```rust
//! use ormscope::metadata::typesystem::{PrimitiveKind, TypeBuilder, TypeRegistry};
//!
//! struct Account {
//!     balance: i64,
//! }
//!
//! let registry = TypeRegistry::new();
//! registry.define(
//!     TypeBuilder::<Account>::class("bank", "Account")
//!         .field("balance", PrimitiveKind::I64, |a| &a.balance, |a| &mut a.balance),
//! )?;
//!
//! let account = registry.get_by_rust_type::<Account>().unwrap();
//! assert_eq!(account.fullname(), "bank.Account");
//! assert!(registry.get_by_fullname("bank.Account").is_some());
//! # Ok::<(), ormscope::Error>(())
//! ```

use std::{
    any::{Any, TypeId},
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use crossbeam_skiplist::SkipMap;
use dashmap::{mapref::entry::Entry, DashMap};
use strum::IntoEnumIterator;

use crate::{
    metadata::{
        token::{Token, TABLE_PRIMITIVE, TABLE_TYPE_DEF, TABLE_TYPE_SPEC},
        typesystem::{PrimitiveKind, TypeBuilder, TypeFlavor, TypeInfo, TypeRc},
    },
    Error::TypeInsert,
    Result,
};

/// Thread-safe registry of all known types.
///
/// Every registry starts out with the built-in [`PrimitiveKind`] types. Declared types
/// receive `0x02` tokens in registration order, synthesized array types `0x1B` tokens.
///
/// # Concurrency Design
///
/// - Lock-free primary storage using `SkipMap`
/// - Concurrent secondary indices using `DashMap`
/// - Atomic token generation for thread-safe registration
///
/// Registration holds the shard of the full name index for the duration of a single
/// insert, so two threads defining the same full name cannot both succeed.
pub struct TypeRegistry {
    /// Primary type storage indexed by tokens
    types: SkipMap<Token, TypeRc>,
    /// Row counter for declared types
    next_row: AtomicU32,
    /// Row counter for synthesized array types
    next_array_row: AtomicU32,
    /// Built-in primitives, indexed by `PrimitiveKind`
    primitives: Vec<TypeRc>,
    /// Secondary index: types indexed by full name (namespace.name)
    types_by_fullname: DashMap<String, Token>,
    /// Secondary index: types indexed by their bound Rust type
    types_by_rust_type: DashMap<TypeId, Token>,
    /// Synthesized array types, keyed by the element token
    arrays: DashMap<Token, TypeRc>,
}

impl TypeRegistry {
    /// Create a new type registry with initialized primitive types.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use ormscope::metadata::typesystem::{PrimitiveKind, TypeRegistry};
    ///
    /// let registry = TypeRegistry::new();
    /// assert!(registry.get_by_fullname("string").is_some());
    /// assert_eq!(registry.primitive(PrimitiveKind::I32).name, "i32");
    /// ```
    #[must_use]
    pub fn new() -> Self {
        let primitives: Vec<TypeRc> = PrimitiveKind::iter()
            .map(|kind| {
                Arc::new(TypeInfo::new(
                    Token::from_parts(TABLE_PRIMITIVE, kind as u32 + 1),
                    TypeFlavor::Primitive(kind),
                    String::new(),
                    kind.to_string(),
                    None,
                ))
            })
            .collect();

        let registry = TypeRegistry {
            types: SkipMap::new(),
            next_row: AtomicU32::new(1),
            next_array_row: AtomicU32::new(1),
            primitives,
            types_by_fullname: DashMap::new(),
            types_by_rust_type: DashMap::new(),
            arrays: DashMap::new(),
        };

        for primitive in &registry.primitives {
            registry.types.insert(primitive.token, primitive.clone());
            registry
                .types_by_fullname
                .insert(primitive.fullname(), primitive.token);
        }

        registry
    }

    /// Get the next available token for a declared type
    fn next_token(&self) -> Token {
        let row = self.next_row.fetch_add(1, Ordering::Relaxed);
        debug_assert!(row <= 0x00FF_FFFF, "We ran out of rows for declared types");

        Token::from_parts(TABLE_TYPE_DEF, row)
    }

    /// Register a new type described by `builder`
    ///
    /// ## Arguments
    /// * 'builder' - The declaration of the type
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeInsert`] if the full name, or the Rust type bound by the
    /// builder, is already registered.
    pub fn define<T: Any>(&self, builder: TypeBuilder<T>) -> Result<TypeRc> {
        let fullname = builder.fullname();
        let name_slot = match self.types_by_fullname.entry(fullname.clone()) {
            Entry::Occupied(_) => return Err(TypeInsert(fullname)),
            Entry::Vacant(slot) => slot,
        };

        let type_slot = match builder.rust_type() {
            Some(type_id) => match self.types_by_rust_type.entry(type_id) {
                Entry::Occupied(existing) => {
                    return Err(TypeInsert(format!(
                        "{} - Rust type already bound to {}",
                        fullname,
                        existing.get()
                    )))
                }
                Entry::Vacant(slot) => Some(slot),
            },
            None => None,
        };

        // Both indices are filled only once the type is reachable by token
        let token = self.next_token();
        let new_type = Arc::new(builder.build(token));
        self.types.insert(token, new_type.clone());
        if let Some(slot) = type_slot {
            slot.insert(token);
        }
        name_slot.insert(token);

        log::debug!("Registered type {} as {}", fullname, token);
        Ok(new_type)
    }

    /// Look up a type by its token.
    ///
    /// # Arguments
    /// * `token` - The token to look up
    pub fn get(&self, token: &Token) -> Option<TypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Look up a type by its full name (namespace.name)
    ///
    /// ## Arguments
    /// * 'fullname' - The full name, e.g. `zoo.Pet`, `i32` or `zoo.Pet[]`
    pub fn get_by_fullname(&self, fullname: &str) -> Option<TypeRc> {
        let token = *self.types_by_fullname.get(fullname)?;
        self.get(&token)
    }

    /// Look up the type bound to a Rust type
    ///
    /// ## Arguments
    /// * 'type_id' - The `TypeId` of the Rust type
    pub fn get_by_type_id(&self, type_id: TypeId) -> Option<TypeRc> {
        let token = *self.types_by_rust_type.get(&type_id)?;
        self.get(&token)
    }

    /// Look up the type bound to the Rust type `T`
    pub fn get_by_rust_type<T: Any>(&self) -> Option<TypeRc> {
        self.get_by_type_id(TypeId::of::<T>())
    }

    /// Get a built-in primitive type
    ///
    /// ## Arguments
    /// * 'kind' - The kind of primitive to look up
    #[must_use]
    pub fn primitive(&self, kind: PrimitiveKind) -> TypeRc {
        self.primitives[kind as usize].clone()
    }

    /// The universal top type
    #[must_use]
    pub fn object(&self) -> TypeRc {
        self.primitive(PrimitiveKind::Object)
    }

    /// Get the array type of `element`, creating and registering it on first use
    ///
    /// ## Arguments
    /// * 'element' - The component type
    pub fn get_or_create_array(&self, element: &TypeRc) -> TypeRc {
        if let Some(existing) = self.arrays.get(&element.token) {
            return existing.value().clone();
        }

        self.arrays
            .entry(element.token)
            .or_insert_with(|| {
                let token = Token::from_parts(
                    TABLE_TYPE_SPEC,
                    self.next_array_row.fetch_add(1, Ordering::Relaxed),
                );
                let array = Arc::new(TypeInfo::new_array(token, element.clone(), self.object()));

                self.types.insert(token, array.clone());
                self.types_by_fullname
                    .entry(array.fullname())
                    .or_insert(token);

                log::debug!("Synthesized array type {} as {}", array.fullname(), token);
                array
            })
            .value()
            .clone()
    }

    /// Count of types in the registry
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Returns an iterator over all types in the registry
    pub fn iter(&self) -> crossbeam_skiplist::map::Iter<'_, Token, TypeRc> {
        self.types.iter()
    }

    /// Get all declared types (neither primitives nor arrays)
    pub fn declared_types(&self) -> Vec<TypeRc> {
        self.types
            .iter()
            .filter(|entry| entry.key().table() == TABLE_TYPE_DEF)
            .map(|entry| entry.value().clone())
            .collect()
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
