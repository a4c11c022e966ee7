//! Uniform call surface over property accessors.
//!
//! Every readable and writable property of a [`crate::TypeMetadata`] is backed by an
//! [`Invoker`], decided once while the record is built:
//!
//! - [`Invoker::Method`]: calls a declared accessor method
//! - [`Invoker::Field`]: reads or writes field storage directly
//! - [`Invoker::Ambiguous`]: carries the diagnostic of an unresolvable accessor conflict and
//!   fails on every call
//!
//! # Examples
//!
//! ```rust
//! use ormscope::{MetadataCache, TypeBuilder, TypeRegistry};
//! use ormscope::metadata::typesystem::PrimitiveKind;
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Tag {
//!     label: String,
//! }
//!
//! let registry = Arc::new(TypeRegistry::new());
//! registry.define(
//!     TypeBuilder::<Tag>::class("blog", "Tag")
//!         .field("label", PrimitiveKind::String, |t| &t.label, |t| &mut t.label),
//! )?;
//!
//! let cache = MetadataCache::new(registry);
//! let metadata = cache.metadata_of::<Tag>()?;
//!
//! let mut tag = Tag::default();
//! metadata.set_invoker("label")?.set(&mut tag, Box::new("rust".to_string()))?;
//! let label = metadata.get_invoker("label")?.get(&mut tag)?;
//! assert_eq!(*label.downcast::<String>().unwrap(), "rust");
//! # Ok::<(), ormscope::Error>(())
//! ```

use std::any::Any;

use crate::{
    metadata::{
        member::{expect_arity, FieldRc, MethodRc, Value},
        typesystem::{TypeRc, UpcastRc},
    },
    Error, Result,
};

/// Chain of upcasts from the reflected type to the class level a member is declared on
#[derive(Clone, Default)]
pub(crate) struct Projection {
    steps: Vec<UpcastRc>,
}

impl Projection {
    pub(crate) fn identity() -> Self {
        Projection::default()
    }

    /// Extend by one inheritance level, a missing upcast keeps the receiver as is
    pub(crate) fn then(&self, step: Option<&UpcastRc>) -> Self {
        let mut steps = self.steps.clone();
        steps.extend(step.cloned());
        Projection { steps }
    }

    pub(crate) fn apply<'a>(&self, target: &'a dyn Any) -> Result<&'a dyn Any> {
        self.steps.iter().try_fold(target, |current, step| {
            step.upcast(current).ok_or(Error::TargetMismatch {
                expected: step.derived_type_name(),
            })
        })
    }

    pub(crate) fn apply_mut<'a>(&self, target: &'a mut dyn Any) -> Result<&'a mut dyn Any> {
        self.steps.iter().try_fold(target, |current, step| {
            let expected = step.derived_type_name();
            step.upcast_mut(current)
                .ok_or(Error::TargetMismatch { expected })
        })
    }
}

/// Invokes a declared accessor method
#[derive(Clone)]
pub struct MethodInvoker {
    method: MethodRc,
    projection: Projection,
    value_type: TypeRc,
}

impl MethodInvoker {
    pub(crate) fn new(method: MethodRc, projection: Projection, value_type: TypeRc) -> Self {
        MethodInvoker {
            method,
            projection,
            value_type,
        }
    }

    /// The method invoked
    #[must_use]
    pub fn method(&self) -> &MethodRc {
        &self.method
    }

    fn invoke(&self, target: &mut dyn Any, args: Vec<Value>) -> Result<Option<Value>> {
        let receiver = self.projection.apply_mut(target)?;
        self.method.invoke(receiver, args)
    }
}

/// Direction of a field-backed accessor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldAccess {
    /// Reads a copy of the field value
    Get,
    /// Replaces the field value
    Set,
}

/// Reads or writes a field directly
#[derive(Clone)]
pub struct FieldInvoker {
    field: FieldRc,
    access: FieldAccess,
    projection: Projection,
    value_type: TypeRc,
}

impl FieldInvoker {
    pub(crate) fn new(
        field: FieldRc,
        access: FieldAccess,
        projection: Projection,
        value_type: TypeRc,
    ) -> Self {
        FieldInvoker {
            field,
            access,
            projection,
            value_type,
        }
    }

    /// The field accessed
    #[must_use]
    pub fn field(&self) -> &FieldRc {
        &self.field
    }

    /// The access direction
    #[must_use]
    pub fn access(&self) -> FieldAccess {
        self.access
    }

    fn invoke(&self, target: &mut dyn Any, mut args: Vec<Value>) -> Result<Option<Value>> {
        match self.access {
            FieldAccess::Get => {
                expect_arity(&self.field.name, &args, 0)?;
                let owner = self.projection.apply(target)?;
                Ok(Some(self.field.read(owner)?))
            }
            FieldAccess::Set => {
                expect_arity(&self.field.name, &args, 1)?;
                let owner = self.projection.apply_mut(target)?;
                self.field.write(owner, args.remove(0))?;
                Ok(None)
            }
        }
    }
}

/// An accessor that could not be decided while reflecting
#[derive(Debug, Clone)]
pub struct AmbiguousInvoker {
    message: String,
    value_type: TypeRc,
}

impl AmbiguousInvoker {
    pub(crate) fn new(message: String, value_type: TypeRc) -> Self {
        AmbiguousInvoker {
            message,
            value_type,
        }
    }

    /// The diagnostic reported on every invocation
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// The accessor behind one direction of one property
#[derive(Clone)]
pub enum Invoker {
    /// Backed by an accessor method
    Method(MethodInvoker),
    /// Backed by direct field access
    Field(FieldInvoker),
    /// Always fails with [`Error::AmbiguousAccessor`]
    Ambiguous(AmbiguousInvoker),
}

impl Invoker {
    /// Invoke the accessor on `target`
    ///
    /// ## Arguments
    /// * 'target' - An instance of the reflected type
    /// * 'args'   - No arguments for getters, the new value for setters
    ///
    /// # Errors
    /// - [`Error::AmbiguousAccessor`] for ambiguous accessors
    /// - [`Error::TargetMismatch`] if `target` has the wrong Rust type
    /// - [`Error::ArgumentMismatch`] if a value has the wrong Rust type
    /// - [`Error::Invocation`] on arity errors, abstract methods or read-only storage
    pub fn invoke(&self, target: &mut dyn Any, args: Vec<Value>) -> Result<Option<Value>> {
        match self {
            Invoker::Method(invoker) => invoker.invoke(target, args),
            Invoker::Field(invoker) => invoker.invoke(target, args),
            Invoker::Ambiguous(invoker) => Err(Error::AmbiguousAccessor(invoker.message.clone())),
        }
    }

    /// Invoke as a getter
    ///
    /// # Errors
    /// See [`Invoker::invoke`]; also fails if the accessor produced no value.
    pub fn get(&self, target: &mut dyn Any) -> Result<Value> {
        self.invoke(target, Vec::new())?
            .ok_or_else(|| invocation_error!("Accessor returned no value"))
    }

    /// Invoke as a setter
    ///
    /// # Errors
    /// See [`Invoker::invoke`].
    pub fn set(&self, target: &mut dyn Any, value: Value) -> Result<()> {
        self.invoke(target, vec![value]).map(|_| ())
    }

    /// The resolved property type
    #[must_use]
    pub fn value_type(&self) -> &TypeRc {
        match self {
            Invoker::Method(invoker) => &invoker.value_type,
            Invoker::Field(invoker) => &invoker.value_type,
            Invoker::Ambiguous(invoker) => &invoker.value_type,
        }
    }

    /// True if invoking always fails
    #[must_use]
    pub fn is_ambiguous(&self) -> bool {
        matches!(self, Invoker::Ambiguous(_))
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Invoker::Method(invoker) => write!(
                f,
                "Method({} -> {})",
                invoker.method.name,
                invoker.value_type.fullname()
            ),
            Invoker::Field(invoker) => write!(
                f,
                "Field({:?} {} -> {})",
                invoker.access,
                invoker.field.name,
                invoker.value_type.fullname()
            ),
            Invoker::Ambiguous(invoker) => write!(f, "Ambiguous({})", invoker.message),
        }
    }
}
