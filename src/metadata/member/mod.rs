//! Declared members of registered types.
//!
//! Types in this crate are described explicitly through a
//! [`crate::metadata::typesystem::TypeBuilder`] instead of being discovered at runtime. Each
//! declared method, field and constructor carries its declared signature together with the
//! code needed to actually perform the call or the storage access.
//!
//! # Key Types
//! - [`Method`]: a declared method with its body
//! - [`Field`]: a declared field with direct access to its storage
//! - [`Constructor`]: a declared constructor
//! - [`Value`]: the boxed value passed into and out of invocations

mod types;

use std::{
    any::{type_name, Any},
    sync::Arc,
};

pub use types::{FieldModifiers, MethodModifiers};

use crate::{metadata::typesystem::TypeSignature, Error, Result};

/// A boxed value passed into or returned from an invocation
pub type Value = Box<dyn Any + Send + Sync>;
/// The code behind a declared method: receiver plus arguments in, optional value out
pub type MethodBody = Arc<dyn Fn(&mut dyn Any, Vec<Value>) -> Result<Option<Value>> + Send + Sync>;
/// The code behind a declared constructor
pub type ConstructorBody = Arc<dyn Fn(Vec<Value>) -> Result<Value> + Send + Sync>;
/// Reference to a `Method`
pub type MethodRc = Arc<Method>;
/// Reference to a `Field`
pub type FieldRc = Arc<Field>;
/// Reference to a `Constructor`
pub type ConstructorRc = Arc<Constructor>;

/// Fails with an `Invocation` error unless exactly `expected` arguments were passed
pub(crate) fn expect_arity(member: &str, args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(invocation_error!(
            "'{}' expects {} argument(s), got {}",
            member,
            expected,
            args.len()
        ))
    }
}

/// Unboxes a value into `V`
pub(crate) fn unbox<V: Any>(value: Value) -> Result<V> {
    value
        .downcast::<V>()
        .map(|boxed| *boxed)
        .map_err(|_| Error::ArgumentMismatch {
            expected: type_name::<V>(),
        })
}

/// A declared method
pub struct Method {
    /// Method name
    pub name: String,
    /// Declared parameter types
    pub params: Vec<TypeSignature>,
    /// Declared return type
    pub return_type: TypeSignature,
    /// Modifiers
    pub flags: MethodModifiers,
    body: Option<MethodBody>,
}

impl Method {
    /// Create a new method declaration
    pub fn new(
        name: impl Into<String>,
        params: Vec<TypeSignature>,
        return_type: TypeSignature,
        flags: MethodModifiers,
        body: Option<MethodBody>,
    ) -> Self {
        let flags = if body.is_none() {
            flags | MethodModifiers::ABSTRACT
        } else {
            flags
        };

        Method {
            name: name.into(),
            params,
            return_type,
            flags,
            body,
        }
    }

    /// True for compiler-generated bridge methods
    #[must_use]
    pub fn is_bridge(&self) -> bool {
        self.flags.contains(MethodModifiers::BRIDGE)
    }

    /// True if the method has no body
    #[must_use]
    pub fn is_abstract(&self) -> bool {
        self.body.is_none()
    }

    /// Run the method body against `target`
    ///
    /// ## Arguments
    /// * 'target' - The receiver, already projected to the declaring type
    /// * 'args'   - The arguments
    ///
    /// # Errors
    /// Returns an error if the method is abstract or the body fails.
    pub fn invoke(&self, target: &mut dyn Any, args: Vec<Value>) -> Result<Option<Value>> {
        match &self.body {
            Some(body) => body(target, args),
            None => Err(invocation_error!(
                "Cannot invoke abstract method '{}'",
                self.name
            )),
        }
    }
}

/// Direct access to the storage behind a declared field
pub trait FieldStorage: Send + Sync {
    /// Read a copy of the stored value
    ///
    /// # Errors
    /// Returns an error if `target` is not an instance of the owning type.
    fn read(&self, target: &dyn Any) -> Result<Value>;

    /// Replace the stored value
    ///
    /// # Errors
    /// Returns an error if `target` or `value` have the wrong type, or the storage is
    /// read-only.
    fn write(&self, target: &mut dyn Any, value: Value) -> Result<()>;
}

/// An instance field, projected out of its owner
pub(crate) struct InstanceSlot<T, V> {
    pub(crate) get: fn(&T) -> &V,
    pub(crate) get_mut: fn(&mut T) -> &mut V,
}

impl<T, V> FieldStorage for InstanceSlot<T, V>
where
    T: Any,
    V: Any + Clone + Send + Sync,
{
    fn read(&self, target: &dyn Any) -> Result<Value> {
        let owner = target.downcast_ref::<T>().ok_or(Error::TargetMismatch {
            expected: type_name::<T>(),
        })?;
        Ok(Box::new((self.get)(owner).clone()))
    }

    fn write(&self, target: &mut dyn Any, value: Value) -> Result<()> {
        let value = unbox::<V>(value)?;
        let owner = target.downcast_mut::<T>().ok_or(Error::TargetMismatch {
            expected: type_name::<T>(),
        })?;
        *(self.get_mut)(owner) = value;
        Ok(())
    }
}

/// A type-level constant, never writable
pub(crate) struct ConstantSlot<V> {
    pub(crate) value: V,
}

impl<V> FieldStorage for ConstantSlot<V>
where
    V: Any + Clone + Send + Sync,
{
    fn read(&self, _target: &dyn Any) -> Result<Value> {
        Ok(Box::new(self.value.clone()))
    }

    fn write(&self, _target: &mut dyn Any, _value: Value) -> Result<()> {
        Err(invocation_error!("Cannot write to a constant field"))
    }
}

/// A type-level field backed by accessor functions
pub(crate) struct StaticSlot<V> {
    pub(crate) get: fn() -> V,
    pub(crate) set: fn(V),
}

impl<V> FieldStorage for StaticSlot<V>
where
    V: Any + Send + Sync,
{
    fn read(&self, _target: &dyn Any) -> Result<Value> {
        Ok(Box::new((self.get)()))
    }

    fn write(&self, _target: &mut dyn Any, value: Value) -> Result<()> {
        (self.set)(unbox::<V>(value)?);
        Ok(())
    }
}

/// A declared field
pub struct Field {
    /// Field name
    pub name: String,
    /// Declared type
    pub signature: TypeSignature,
    /// Modifiers
    pub flags: FieldModifiers,
    storage: Arc<dyn FieldStorage>,
}

impl Field {
    /// Create a new field declaration
    pub fn new(
        name: impl Into<String>,
        signature: TypeSignature,
        flags: FieldModifiers,
        storage: Arc<dyn FieldStorage>,
    ) -> Self {
        Field {
            name: name.into(),
            signature,
            flags,
            storage,
        }
    }

    /// True for `STATIC` + `FINAL` fields
    #[must_use]
    pub fn is_constant(&self) -> bool {
        self.flags.is_constant()
    }

    /// True for generated fields
    #[must_use]
    pub fn is_synthetic(&self) -> bool {
        self.flags.contains(FieldModifiers::SYNTHETIC)
    }

    /// Read the field from `target`
    ///
    /// # Errors
    /// Returns an error if `target` is not an instance of the owning type.
    pub fn read(&self, target: &dyn Any) -> Result<Value> {
        self.storage.read(target)
    }

    /// Write `value` into the field of `target`
    ///
    /// # Errors
    /// Returns an error if the types do not match or the field is a constant.
    pub fn write(&self, target: &mut dyn Any, value: Value) -> Result<()> {
        self.storage.write(target, value)
    }
}

/// A declared constructor
pub struct Constructor {
    /// Declared parameter types
    pub params: Vec<TypeSignature>,
    body: ConstructorBody,
}

impl Constructor {
    /// Create a new constructor declaration
    pub fn new(params: Vec<TypeSignature>, body: ConstructorBody) -> Self {
        Constructor { params, body }
    }

    /// True for the zero-argument constructor
    #[must_use]
    pub fn is_default(&self) -> bool {
        self.params.is_empty()
    }

    /// Create a new boxed instance
    ///
    /// # Errors
    /// Returns an error on an arity mismatch or when the body fails.
    pub fn new_instance(&self, args: Vec<Value>) -> Result<Value> {
        expect_arity("<init>", &args, self.params.len())?;
        (self.body)(args)
    }

    /// Create a new instance and unbox it into `T`
    ///
    /// # Errors
    /// Returns an error if construction fails or the instance is not a `T`.
    pub fn instantiate<T: Any>(&self, args: Vec<Value>) -> Result<T> {
        self.new_instance(args)?
            .downcast::<T>()
            .map(|boxed| *boxed)
            .map_err(|_| Error::TargetMismatch {
                expected: type_name::<T>(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::PrimitiveKind;

    #[derive(Clone, Default)]
    struct Counter {
        count: i32,
    }

    #[test]
    fn test_instance_slot_roundtrip() {
        let field = Field::new(
            "count",
            PrimitiveKind::I32.into(),
            FieldModifiers::empty(),
            Arc::new(InstanceSlot::<Counter, i32> {
                get: |c| &c.count,
                get_mut: |c| &mut c.count,
            }),
        );

        let mut counter = Counter { count: 3 };
        field.write(&mut counter, Box::new(7_i32)).unwrap();
        assert_eq!(counter.count, 7);

        let value = field.read(&counter).unwrap();
        assert_eq!(*value.downcast::<i32>().unwrap(), 7);
    }

    #[test]
    fn test_instance_slot_mismatch() {
        let field = Field::new(
            "count",
            PrimitiveKind::I32.into(),
            FieldModifiers::empty(),
            Arc::new(InstanceSlot::<Counter, i32> {
                get: |c| &c.count,
                get_mut: |c| &mut c.count,
            }),
        );

        let mut counter = Counter::default();
        assert!(matches!(
            field.write(&mut counter, Box::new("seven".to_string())),
            Err(Error::ArgumentMismatch { .. })
        ));

        let mut wrong = 5_u8;
        assert!(matches!(
            field.read(&wrong),
            Err(Error::TargetMismatch { .. })
        ));
        assert!(field.write(&mut wrong, Box::new(1_i32)).is_err());
    }

    #[test]
    fn test_constant_slot_is_read_only() {
        let field = Field::new(
            "MAX",
            PrimitiveKind::I32.into(),
            FieldModifiers::STATIC | FieldModifiers::FINAL,
            Arc::new(ConstantSlot { value: 42_i32 }),
        );

        assert!(field.is_constant());
        let mut counter = Counter::default();
        assert_eq!(*field.read(&counter).unwrap().downcast::<i32>().unwrap(), 42);
        assert!(matches!(
            field.write(&mut counter, Box::new(1_i32)),
            Err(Error::Invocation { .. })
        ));
    }

    #[test]
    fn test_abstract_method_fails() {
        let method = Method::new(
            "getName",
            vec![],
            PrimitiveKind::String.into(),
            MethodModifiers::empty(),
            None,
        );

        assert!(method.is_abstract());
        assert!(method.flags.contains(MethodModifiers::ABSTRACT));

        let mut counter = Counter::default();
        assert!(matches!(
            method.invoke(&mut counter, vec![]),
            Err(Error::Invocation { .. })
        ));
    }

    #[test]
    fn test_constructor_arity() {
        let ctor = Constructor::new(
            vec![],
            Arc::new(|_: Vec<Value>| -> Result<Value> {
                Ok(Box::new(Counter { count: 1 }) as Value)
            }),
        );
        assert!(ctor.is_default());
        assert!(ctor.new_instance(vec![Box::new(1_i32) as Value]).is_err());
        assert_eq!(ctor.instantiate::<Counter>(vec![]).unwrap().count, 1);
        assert!(matches!(
            ctor.instantiate::<u8>(vec![]),
            Err(Error::TargetMismatch { .. })
        ));
    }
}
