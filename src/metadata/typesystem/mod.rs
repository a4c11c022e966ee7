//! Declarative type system backing the reflection cache.
//!
//! Rust offers no structural runtime reflection, so every type that should be mapped has to
//! be described up front. This module provides that description layer: type descriptors,
//! declared type signatures, a concurrent registry and the resolver that turns declared
//! (possibly generic) signatures into concrete registered types.
//!
//! # Key Components
//!
//! - [`TypeInfo`]: A registered type with its hierarchy and declared members
//! - [`TypeRegistry`]: Central registry for all known types
//! - [`TypeResolver`]: Resolves declared signatures to concrete types
//! - [`TypeBuilder`]: Builder pattern for declaring types and binding Rust accessors
//! - [`PrimitiveKind`]: Built-in primitive types (i32, string, object, etc.)
//!
//! # Examples
//!
//! ```rust
//! use ormscope::metadata::typesystem::{PrimitiveKind, TypeBuilder, TypeRegistry};
//!
//! #[derive(Default)]
//! struct Pet {
//!     name: String,
//! }
//!
//! let registry = TypeRegistry::new();
//! let pet = registry.define(
//!     TypeBuilder::<Pet>::class("zoo", "Pet")
//!         .getter("getName", PrimitiveKind::String, |p: &Pet| p.name.clone())
//!         .default_constructor(Pet::default),
//! )?;
//!
//! assert_eq!(pet.fullname(), "zoo.Pet");
//! assert!(registry.object().is_assignable_from(&pet));
//! # Ok::<(), ormscope::Error>(())
//! ```

mod base;
mod builder;
mod registry;
mod resolver;

use std::{
    any::{type_name, Any, TypeId},
    sync::Arc,
};

pub use base::{PrimitiveKind, TypeFlavor, TypeSignature};
pub use builder::TypeBuilder;
pub use registry::TypeRegistry;
pub use resolver::{TypeResolver, MAX_RECURSION_DEPTH};

use crate::metadata::{
    member::{ConstructorRc, FieldRc, MethodRc},
    token::Token,
};

/// Reference to a `TypeInfo`
pub type TypeRc = Arc<TypeInfo>;
/// Reference to an `Upcast` projection
pub type UpcastRc = Arc<dyn Upcast>;

/// Projects an instance of a derived Rust type onto the embedded value of its base type.
///
/// Rust has no inheritance; a derived type usually embeds its base. Members declared on the
/// base are registered against the base's Rust type, so invoking them on a derived instance
/// requires this projection.
pub trait Upcast: Send + Sync {
    /// Name of the derived Rust type this projection accepts
    fn derived_type_name(&self) -> &'static str;

    /// Project a shared reference, `None` if `target` is not of the derived type
    fn upcast<'a>(&self, target: &'a dyn Any) -> Option<&'a dyn Any>;

    /// Project an exclusive reference, `None` if `target` is not of the derived type
    fn upcast_mut<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any>;
}

/// An `Upcast` through plain accessor functions
pub(crate) struct Embedded<T, B> {
    pub(crate) get: fn(&T) -> &B,
    pub(crate) get_mut: fn(&mut T) -> &mut B,
}

impl<T: Any, B: Any> Upcast for Embedded<T, B> {
    fn derived_type_name(&self) -> &'static str {
        type_name::<T>()
    }

    fn upcast<'a>(&self, target: &'a dyn Any) -> Option<&'a dyn Any> {
        target
            .downcast_ref::<T>()
            .map(|derived| (self.get)(derived) as &dyn Any)
    }

    fn upcast_mut<'a>(&self, target: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        target
            .downcast_mut::<T>()
            .map(|derived| (self.get_mut)(derived) as &mut dyn Any)
    }
}

/// A supertype reference, optionally parameterized (`extends Base<String>`)
#[derive(Clone)]
pub struct SuperType {
    /// The referenced base class or interface
    pub ty: TypeRc,
    /// Generic arguments, empty for a raw reference
    pub args: Vec<TypeSignature>,
    /// Projection from the derived instance to the base value, identity if `None`
    pub upcast: Option<UpcastRc>,
}

impl SuperType {
    /// The signature of this supertype reference
    #[must_use]
    pub fn signature(&self) -> TypeSignature {
        if self.args.is_empty() {
            TypeSignature::Class(self.ty.fullname())
        } else {
            TypeSignature::GenericInst {
                raw: self.ty.fullname(),
                args: self.args.clone(),
            }
        }
    }
}

/// A generic type parameter declared by a type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    /// Parameter name, e.g. `T`
    pub name: String,
    /// Declared bounds, the first one is used as erasure
    pub bounds: Vec<TypeSignature>,
}

/// Represents a registered type: its identity, hierarchy and declared members.
///
/// A `TypeInfo` is immutable once registered. Member signatures reference other types by
/// full name; supertypes are held directly.
pub struct TypeInfo {
    /// Token
    pub token: Token,
    /// The `TypeFlavor`
    pub flavor: TypeFlavor,
    /// Namespace (empty for primitives)
    pub namespace: String,
    /// Name
    pub name: String,
    /// The Rust type bound to this type, if any
    pub rust_type: Option<TypeId>,
    /// This types base aka 'extends'
    base: Option<SuperType>,
    /// All interfaces this type implements
    pub interfaces: Vec<SuperType>,
    /// All generic parameters this type declares
    pub generic_params: Vec<GenericParam>,
    /// Element type for arrays
    element: Option<TypeRc>,
    /// All methods this type declares
    pub methods: Vec<MethodRc>,
    /// All fields this type declares
    pub fields: Vec<FieldRc>,
    /// All constructors this type declares
    pub constructors: Vec<ConstructorRc>,
}

impl TypeInfo {
    /// Create a new instance of a `TypeInfo` without members
    pub(crate) fn new(
        token: Token,
        flavor: TypeFlavor,
        namespace: String,
        name: String,
        base: Option<SuperType>,
    ) -> Self {
        TypeInfo {
            token,
            flavor,
            namespace,
            name,
            rust_type: None,
            base,
            interfaces: Vec::new(),
            generic_params: Vec::new(),
            element: None,
            methods: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
        }
    }

    /// Create a new array type of `element`
    pub(crate) fn new_array(token: Token, element: TypeRc, object: TypeRc) -> Self {
        let mut array = TypeInfo::new(
            token,
            TypeFlavor::Array,
            element.namespace.clone(),
            format!("{}[]", element.name),
            Some(SuperType {
                ty: object,
                args: Vec::new(),
                upcast: None,
            }),
        );
        array.element = Some(element);
        array
    }

    /// Access the base type of this type, if it exists
    #[must_use]
    pub fn base(&self) -> Option<&SuperType> {
        self.base.as_ref()
    }

    /// Access the element type, for arrays
    #[must_use]
    pub fn element(&self) -> Option<&TypeRc> {
        self.element.as_ref()
    }

    /// Returns the full name (Namespace.Name) of the entity
    #[must_use]
    pub fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// True for the universal top type
    #[must_use]
    pub fn is_object(&self) -> bool {
        self.flavor == TypeFlavor::Primitive(PrimitiveKind::Object)
    }

    /// The signature referring to this type
    #[must_use]
    pub fn signature(&self) -> TypeSignature {
        match (&self.flavor, &self.element) {
            (TypeFlavor::Primitive(kind), _) => TypeSignature::Primitive(*kind),
            (TypeFlavor::Array, Some(element)) => TypeSignature::array(element.signature()),
            _ => TypeSignature::Class(self.fullname()),
        }
    }

    /// Look up a declared generic parameter by name
    #[must_use]
    pub fn generic_param(&self, name: &str) -> Option<(usize, &GenericParam)> {
        self.generic_params
            .iter()
            .enumerate()
            .find(|(_, param)| param.name == name)
    }

    /// Determines if values of `other` can be used where `self` is expected
    ///
    /// ## Arguments
    /// * 'other' - The potentially more specific type
    #[must_use]
    pub fn is_assignable_from(&self, other: &TypeInfo) -> bool {
        if self.token == other.token {
            return true;
        }

        if self.is_object() {
            return other.flavor.is_reference_type();
        }

        if let (Some(mine), Some(theirs)) = (&self.element, &other.element) {
            return mine.flavor.is_reference_type()
                && theirs.flavor.is_reference_type()
                && mine.is_assignable_from(theirs);
        }

        other.supertypes().any(|parent| self.is_assignable_from(parent))
    }

    /// Iterates the direct supertypes: base first, then interfaces
    fn supertypes(&self) -> impl Iterator<Item = &TypeInfo> {
        self.base
            .iter()
            .chain(self.interfaces.iter())
            .map(|parent| parent.ty.as_ref())
    }
}

impl std::fmt::Debug for TypeInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeInfo")
            .field("token", &self.token)
            .field("flavor", &self.flavor)
            .field("fullname", &self.fullname())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Base {
        id: i64,
    }

    #[derive(Default)]
    struct Derived {
        base: Base,
    }

    #[test]
    fn test_embedded_upcast() {
        let upcast = Embedded::<Derived, Base> {
            get: |d| &d.base,
            get_mut: |d| &mut d.base,
        };

        let mut derived = Derived::default();
        let base = upcast.upcast_mut(&mut derived).unwrap();
        base.downcast_mut::<Base>().unwrap().id = 9;
        assert_eq!(derived.base.id, 9);

        let other = 1_u32;
        assert!(upcast.upcast(&other).is_none());
        assert!(upcast.derived_type_name().ends_with("Derived"));
    }

    #[test]
    fn test_assignability() {
        let registry = TypeRegistry::new();
        let object = registry.object();
        let string = registry.primitive(PrimitiveKind::String);
        let int = registry.primitive(PrimitiveKind::I32);

        assert!(object.is_assignable_from(&string));
        assert!(!object.is_assignable_from(&int));
        assert!(!string.is_assignable_from(&object));
        assert!(int.is_assignable_from(&int));

        let named = registry
            .define(TypeBuilder::interface("zoo", "Named"))
            .unwrap();
        let animal = registry
            .define(TypeBuilder::<()>::abstract_class("zoo", "Animal").implements(&named, vec![]))
            .unwrap();
        let dog = registry
            .define(TypeBuilder::<()>::abstract_class("zoo", "Dog").extends(&animal, vec![]))
            .unwrap();

        assert!(animal.is_assignable_from(&dog));
        assert!(named.is_assignable_from(&dog));
        assert!(!dog.is_assignable_from(&animal));
        assert!(object.is_assignable_from(&named));

        let dogs = registry.get_or_create_array(&dog);
        let animals = registry.get_or_create_array(&animal);
        let ints = registry.get_or_create_array(&int);
        assert!(animals.is_assignable_from(&dogs));
        assert!(!dogs.is_assignable_from(&animals));
        assert!(object.is_assignable_from(&ints));
        assert!(!animals.is_assignable_from(&ints));
    }

    #[test]
    fn test_signature_of_type() {
        let registry = TypeRegistry::new();
        let int = registry.primitive(PrimitiveKind::I32);
        let ints = registry.get_or_create_array(&int);

        assert_eq!(int.signature(), TypeSignature::Primitive(PrimitiveKind::I32));
        assert_eq!(ints.signature(), TypeSignature::array(PrimitiveKind::I32));
        assert_eq!(ints.fullname(), "i32[]");
        assert_eq!(ints.element().map(|e| e.token), Some(int.token));
    }
}
