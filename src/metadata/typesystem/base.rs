use std::fmt;

use strum::{Display, EnumCount, EnumIter};

/// The built-in primitive types every [`crate::TypeRegistry`] starts out with.
///
/// `Object` is the universal top type: every reference type is assignable to it, and it is
/// the fallback whenever a declared type cannot be resolved to something more specific.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter, EnumCount, Display)]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
    Void,
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    String,
    Object,
}

/// Represents the fundamental category of a registered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFlavor {
    /// One of the built-in primitives
    Primitive(PrimitiveKind),
    /// A concrete or abstract class
    Class,
    /// An interface, only contributes declarations
    Interface,
    /// An array type synthesized by the registry, see [`crate::TypeRegistry::get_or_create_array`]
    Array,
}

impl TypeFlavor {
    /// Check if this is a primitive type
    #[must_use]
    pub fn is_primitive(&self) -> bool {
        matches!(self, TypeFlavor::Primitive(_))
    }

    /// Check if this is a reference type
    #[must_use]
    pub fn is_reference_type(&self) -> bool {
        match self {
            TypeFlavor::Primitive(kind) => {
                matches!(kind, PrimitiveKind::String | PrimitiveKind::Object)
            }
            TypeFlavor::Class | TypeFlavor::Interface | TypeFlavor::Array => true,
        }
    }

    /// Check if this is the boolean primitive
    #[must_use]
    pub fn is_bool(&self) -> bool {
        matches!(self, TypeFlavor::Primitive(PrimitiveKind::Bool))
    }
}

/// The declared shape of a member's value type.
///
/// Signatures reference other types by full name, which allows members to refer to the
/// type that declares them. They are resolved against a [`crate::TypeRegistry`] by the
/// [`crate::metadata::typesystem::TypeResolver`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeSignature {
    /// A built-in primitive
    Primitive(PrimitiveKind),
    /// A registered, non-generic type referenced by full name
    Class(String),
    /// A parameterized type, e.g. `List<String>`
    GenericInst {
        /// Full name of the generic type definition
        raw: String,
        /// The type arguments
        args: Vec<TypeSignature>,
    },
    /// An array of the component signature
    Array(Box<TypeSignature>),
    /// A type variable declared by a generic type
    Var(String),
    /// A wildcard argument with optional bounds
    Wildcard {
        /// Upper bounds (`? extends X`)
        upper: Vec<TypeSignature>,
        /// Lower bounds (`? super X`)
        lower: Vec<TypeSignature>,
    },
}

impl TypeSignature {
    /// Signature referencing a registered type by full name
    pub fn class(fullname: impl Into<String>) -> Self {
        TypeSignature::Class(fullname.into())
    }

    /// Signature of a parameterized type
    pub fn generic(raw: impl Into<String>, args: Vec<TypeSignature>) -> Self {
        TypeSignature::GenericInst {
            raw: raw.into(),
            args,
        }
    }

    /// Signature of an array of `component`
    pub fn array(component: impl Into<TypeSignature>) -> Self {
        TypeSignature::Array(Box::new(component.into()))
    }

    /// Signature of a type variable
    pub fn var(name: impl Into<String>) -> Self {
        TypeSignature::Var(name.into())
    }

    /// An unbounded wildcard (`?`)
    #[must_use]
    pub fn wildcard() -> Self {
        TypeSignature::Wildcard {
            upper: Vec::new(),
            lower: Vec::new(),
        }
    }

    /// Returns true if no part of this signature depends on a type variable or wildcard
    #[must_use]
    pub fn is_concrete(&self) -> bool {
        match self {
            TypeSignature::Primitive(_) | TypeSignature::Class(_) => true,
            TypeSignature::GenericInst { args, .. } => args.iter().all(TypeSignature::is_concrete),
            TypeSignature::Array(component) => component.is_concrete(),
            TypeSignature::Var(_) | TypeSignature::Wildcard { .. } => false,
        }
    }
}

impl From<PrimitiveKind> for TypeSignature {
    fn from(kind: PrimitiveKind) -> Self {
        TypeSignature::Primitive(kind)
    }
}

impl fmt::Display for TypeSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSignature::Primitive(kind) => write!(f, "{kind}"),
            TypeSignature::Class(name) | TypeSignature::Var(name) => write!(f, "{name}"),
            TypeSignature::GenericInst { raw, args } => {
                write!(f, "{raw}<")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")
            }
            TypeSignature::Array(component) => write!(f, "{component}[]"),
            TypeSignature::Wildcard { upper, lower } => {
                write!(f, "?")?;
                if let Some(bound) = upper.first() {
                    write!(f, " extends {bound}")?;
                }
                if let Some(bound) = lower.first() {
                    write!(f, " super {bound}")?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use strum::{EnumCount, IntoEnumIterator};

    use super::*;

    #[test]
    fn test_primitive_kind_names() {
        assert_eq!(PrimitiveKind::Bool.to_string(), "bool");
        assert_eq!(PrimitiveKind::I32.to_string(), "i32");
        assert_eq!(PrimitiveKind::Object.to_string(), "object");
        assert_eq!(PrimitiveKind::iter().count(), PrimitiveKind::COUNT);
    }

    #[test]
    fn test_type_flavor_categories() {
        assert!(TypeFlavor::Primitive(PrimitiveKind::Bool).is_bool());
        assert!(TypeFlavor::Primitive(PrimitiveKind::String).is_reference_type());
        assert!(TypeFlavor::Class.is_reference_type());
        assert!(TypeFlavor::Array.is_reference_type());
        assert!(!TypeFlavor::Primitive(PrimitiveKind::Void).is_reference_type());
        assert!(!TypeFlavor::Primitive(PrimitiveKind::I32).is_reference_type());
        assert!(!TypeFlavor::Interface.is_primitive());
    }

    #[test]
    fn test_signature_concreteness() {
        assert!(TypeSignature::from(PrimitiveKind::I64).is_concrete());
        assert!(TypeSignature::class("zoo.Pet").is_concrete());
        assert!(!TypeSignature::var("T").is_concrete());
        assert!(!TypeSignature::array(TypeSignature::var("T")).is_concrete());
        assert!(!TypeSignature::generic("util.List", vec![TypeSignature::wildcard()]).is_concrete());
        assert!(TypeSignature::generic("util.List", vec![PrimitiveKind::String.into()]).is_concrete());
    }

    #[test]
    fn test_signature_display() {
        let sig = TypeSignature::generic(
            "util.Map",
            vec![
                PrimitiveKind::String.into(),
                TypeSignature::array(TypeSignature::var("T")),
            ],
        );
        assert_eq!(sig.to_string(), "util.Map<string, T[]>");

        let bounded = TypeSignature::Wildcard {
            upper: vec![TypeSignature::class("zoo.Pet")],
            lower: Vec::new(),
        };
        assert_eq!(bounded.to_string(), "? extends zoo.Pet");
    }
}
