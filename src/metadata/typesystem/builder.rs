//! Builder for type declarations.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for declaring a
//! type: its hierarchy, generic parameters and members, together with the Rust code that
//! backs each member. A finished builder is handed to [`TypeRegistry::define`].
//!
//! Accessors are bound through typed closures; the builder erases them into
//! [`crate::metadata::member::MethodBody`] values that downcast receiver and arguments at
//! invocation time.
//!
//! # Example
//!
//! ```rust
//! use ormscope::metadata::typesystem::{PrimitiveKind, TypeBuilder, TypeRegistry};
//!
//! #[derive(Default)]
//! struct User {
//!     user_name: String,
//!     active: bool,
//! }
//!
//! let registry = TypeRegistry::new();
//! let user = registry.define(
//!     TypeBuilder::<User>::class("app", "User")
//!         .getter("getUserName", PrimitiveKind::String, |u: &User| u.user_name.clone())
//!         .setter("setUserName", PrimitiveKind::String, |u: &mut User, v: String| u.user_name = v)
//!         .field("active", PrimitiveKind::Bool, |u| &u.active, |u| &mut u.active)
//!         .default_constructor(User::default),
//! )?;
//!
//! assert_eq!(user.methods.len(), 2);
//! assert_eq!(user.fields.len(), 1);
//! # Ok::<(), ormscope::Error>(())
//! ```

use std::{
    any::{type_name, Any, TypeId},
    marker::PhantomData,
    sync::Arc,
};

use crate::{
    metadata::{
        member::{
            expect_arity, unbox, ConstantSlot, Constructor, ConstructorBody, Field, FieldModifiers,
            InstanceSlot, Method, MethodBody, MethodModifiers, StaticSlot, Value,
        },
        token::Token,
        typesystem::{
            Embedded, GenericParam, PrimitiveKind, SuperType, TypeFlavor, TypeInfo, TypeRc,
            TypeRegistry, TypeSignature,
        },
    },
    Error, Result,
};

/// Provides a fluent API for declaring a type and binding its members to the Rust type `T`
///
/// `T` is the Rust type instances of the declared type are represented by. Only
/// [`TypeBuilder::class`] binds `T` in the registry; abstract classes and interfaces use it
/// solely to type their member bodies.
pub struct TypeBuilder<T> {
    namespace: String,
    name: String,
    flavor: TypeFlavor,
    bind_rust_type: bool,
    base: Option<SuperType>,
    interfaces: Vec<SuperType>,
    generic_params: Vec<GenericParam>,
    methods: Vec<Method>,
    fields: Vec<Field>,
    constructors: Vec<Constructor>,
    _marker: PhantomData<fn() -> T>,
}

impl TypeBuilder<()> {
    /// Start declaring an interface
    ///
    /// Interfaces only contribute declarations, see [`TypeBuilder::abstract_method`].
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace of the interface
    /// * 'name'      - Name of the interface
    pub fn interface(namespace: &str, name: &str) -> Self {
        TypeBuilder::start(namespace, name, TypeFlavor::Interface, false)
    }
}

impl<T: Any> TypeBuilder<T> {
    fn start(namespace: &str, name: &str, flavor: TypeFlavor, bind_rust_type: bool) -> Self {
        TypeBuilder {
            namespace: namespace.to_string(),
            name: name.to_string(),
            flavor,
            bind_rust_type,
            base: None,
            interfaces: Vec::new(),
            generic_params: Vec::new(),
            methods: Vec::new(),
            fields: Vec::new(),
            constructors: Vec::new(),
            _marker: PhantomData,
        }
    }

    /// Start declaring a class represented by the Rust type `T`
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace of the class
    /// * 'name'      - Name of the class
    pub fn class(namespace: &str, name: &str) -> Self {
        TypeBuilder::start(namespace, name, TypeFlavor::Class, true)
    }

    /// Start declaring a class without binding `T` to it
    ///
    /// Used for bases whose members operate on a value embedded in derived types.
    ///
    /// ## Arguments
    /// * 'namespace' - Namespace of the class
    /// * 'name'      - Name of the class
    pub fn abstract_class(namespace: &str, name: &str) -> Self {
        TypeBuilder::start(namespace, name, TypeFlavor::Class, false)
    }

    /// Extend `base`, members of `base` receive the instance unchanged
    ///
    /// ## Arguments
    /// * 'base' - The base class
    /// * 'args' - Generic arguments for a generic base, empty for a raw reference
    #[must_use]
    pub fn extends(mut self, base: &TypeRc, args: Vec<TypeSignature>) -> Self {
        self.base = Some(SuperType {
            ty: base.clone(),
            args,
            upcast: None,
        });
        self
    }

    /// Extend `base`, whose instance data lives embedded in `T` as a `B`
    ///
    /// ## Arguments
    /// * 'base'    - The base class
    /// * 'args'    - Generic arguments for a generic base, empty for a raw reference
    /// * 'get'     - Projects `T` to its embedded `B`
    /// * 'get_mut' - Projects `T` mutably to its embedded `B`
    #[must_use]
    pub fn embeds<B: Any>(
        mut self,
        base: &TypeRc,
        args: Vec<TypeSignature>,
        get: fn(&T) -> &B,
        get_mut: fn(&mut T) -> &mut B,
    ) -> Self {
        self.base = Some(SuperType {
            ty: base.clone(),
            args,
            upcast: Some(Arc::new(Embedded { get, get_mut })),
        });
        self
    }

    /// Implement an interface
    ///
    /// ## Arguments
    /// * 'interface' - The interface
    /// * 'args'      - Generic arguments for a generic interface
    #[must_use]
    pub fn implements(mut self, interface: &TypeRc, args: Vec<TypeSignature>) -> Self {
        self.interfaces.push(SuperType {
            ty: interface.clone(),
            args,
            upcast: None,
        });
        self
    }

    /// Declare a generic type parameter
    ///
    /// ## Arguments
    /// * 'name'   - Name of the parameter
    /// * 'bounds' - Upper bounds, the first one is the erasure of the parameter
    #[must_use]
    pub fn generic_param(mut self, name: &str, bounds: Vec<TypeSignature>) -> Self {
        self.generic_params.push(GenericParam {
            name: name.to_string(),
            bounds,
        });
        self
    }

    /// Declare a zero-argument method returning a value computed from `&T`
    ///
    /// ## Arguments
    /// * 'name'    - Method name, e.g. `getName`
    /// * 'returns' - Declared return type
    /// * 'f'       - The method body
    #[must_use]
    pub fn getter<V, F>(mut self, name: &str, returns: impl Into<TypeSignature>, f: F) -> Self
    where
        V: Any + Send + Sync,
        F: Fn(&T) -> V + Send + Sync + 'static,
    {
        let member = name.to_string();
        let body: MethodBody = Arc::new(
            move |target: &mut dyn Any, args: Vec<Value>| -> Result<Option<Value>> {
                expect_arity(&member, &args, 0)?;
                let owner = target.downcast_ref::<T>().ok_or(Error::TargetMismatch {
                    expected: type_name::<T>(),
                })?;
                Ok(Some(Box::new(f(owner)) as Value))
            },
        );

        self.methods.push(Method::new(
            name,
            Vec::new(),
            returns.into(),
            MethodModifiers::empty(),
            Some(body),
        ));
        self
    }

    /// Declare a one-argument method that mutates `T`
    ///
    /// ## Arguments
    /// * 'name'  - Method name, e.g. `setName`
    /// * 'param' - Declared parameter type
    /// * 'f'     - The method body
    #[must_use]
    pub fn setter<V, F>(mut self, name: &str, param: impl Into<TypeSignature>, f: F) -> Self
    where
        V: Any,
        F: Fn(&mut T, V) + Send + Sync + 'static,
    {
        let member = name.to_string();
        let body: MethodBody = Arc::new(
            move |target: &mut dyn Any, mut args: Vec<Value>| -> Result<Option<Value>> {
                expect_arity(&member, &args, 1)?;
                let value = unbox::<V>(args.remove(0))?;
                let owner = target.downcast_mut::<T>().ok_or(Error::TargetMismatch {
                    expected: type_name::<T>(),
                })?;
                f(owner, value);
                Ok(None)
            },
        );

        self.methods.push(Method::new(
            name,
            vec![param.into()],
            PrimitiveKind::Void.into(),
            MethodModifiers::empty(),
            Some(body),
        ));
        self
    }

    /// Declare a method with an already erased body
    ///
    /// ## Arguments
    /// * 'name'    - Method name
    /// * 'params'  - Declared parameter types
    /// * 'returns' - Declared return type
    /// * 'flags'   - Modifiers
    /// * 'body'    - The method body
    #[must_use]
    pub fn method_raw(
        mut self,
        name: &str,
        params: Vec<TypeSignature>,
        returns: impl Into<TypeSignature>,
        flags: MethodModifiers,
        body: MethodBody,
    ) -> Self {
        self.methods
            .push(Method::new(name, params, returns.into(), flags, Some(body)));
        self
    }

    /// Declare a method without a body
    #[must_use]
    pub fn abstract_method(
        mut self,
        name: &str,
        params: Vec<TypeSignature>,
        returns: impl Into<TypeSignature>,
    ) -> Self {
        self.methods.push(Method::new(
            name,
            params,
            returns.into(),
            MethodModifiers::ABSTRACT,
            None,
        ));
        self
    }

    /// Declare a compiler-generated bridge method
    ///
    /// Bridges restate an overridden method with its erased signature. They never become
    /// accessors.
    #[must_use]
    pub fn bridge_method(
        mut self,
        name: &str,
        params: Vec<TypeSignature>,
        returns: impl Into<TypeSignature>,
    ) -> Self {
        self.methods.push(Method::new(
            name,
            params,
            returns.into(),
            MethodModifiers::BRIDGE | MethodModifiers::SYNTHETIC,
            None,
        ));
        self
    }

    /// Declare an instance field stored in `T`
    ///
    /// ## Arguments
    /// * 'name'      - Field name
    /// * 'signature' - Declared field type
    /// * 'get'       - Projects `T` to the field
    /// * 'get_mut'   - Projects `T` mutably to the field
    #[must_use]
    pub fn field<V>(
        self,
        name: &str,
        signature: impl Into<TypeSignature>,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self
    where
        V: Any + Clone + Send + Sync,
    {
        self.field_with(name, signature, FieldModifiers::empty(), get, get_mut)
    }

    /// Declare an instance field with explicit modifiers, e.g. `SYNTHETIC`
    #[must_use]
    pub fn field_with<V>(
        mut self,
        name: &str,
        signature: impl Into<TypeSignature>,
        flags: FieldModifiers,
        get: fn(&T) -> &V,
        get_mut: fn(&mut T) -> &mut V,
    ) -> Self
    where
        V: Any + Clone + Send + Sync,
    {
        self.fields.push(Field::new(
            name,
            signature.into(),
            flags,
            Arc::new(InstanceSlot { get, get_mut }),
        ));
        self
    }

    /// Declare a `STATIC` + `FINAL` constant
    #[must_use]
    pub fn constant<V>(mut self, name: &str, signature: impl Into<TypeSignature>, value: V) -> Self
    where
        V: Any + Clone + Send + Sync,
    {
        self.fields.push(Field::new(
            name,
            signature.into(),
            FieldModifiers::STATIC | FieldModifiers::FINAL,
            Arc::new(ConstantSlot { value }),
        ));
        self
    }

    /// Declare a mutable `STATIC` field backed by accessor functions
    #[must_use]
    pub fn static_field<V>(
        mut self,
        name: &str,
        signature: impl Into<TypeSignature>,
        get: fn() -> V,
        set: fn(V),
    ) -> Self
    where
        V: Any + Send + Sync,
    {
        self.fields.push(Field::new(
            name,
            signature.into(),
            FieldModifiers::STATIC,
            Arc::new(StaticSlot { get, set }),
        ));
        self
    }

    /// Declare the zero-argument constructor
    #[must_use]
    pub fn default_constructor<F>(mut self, f: F) -> Self
    where
        T: Send + Sync,
        F: Fn() -> T + Send + Sync + 'static,
    {
        let body: ConstructorBody =
            Arc::new(move |_args: Vec<Value>| -> Result<Value> { Ok(Box::new(f()) as Value) });
        self.constructors.push(Constructor::new(Vec::new(), body));
        self
    }

    /// Declare a constructor with parameters
    #[must_use]
    pub fn constructor(mut self, params: Vec<TypeSignature>, body: ConstructorBody) -> Self {
        self.constructors.push(Constructor::new(params, body));
        self
    }

    /// Returns the full name (Namespace.Name) of the declared type
    pub(crate) fn fullname(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{0}.{1}", self.namespace, self.name)
        }
    }

    /// The Rust type to bind in the registry, if any
    pub(crate) fn rust_type(&self) -> Option<TypeId> {
        self.bind_rust_type.then(TypeId::of::<T>)
    }

    /// Produce the final `TypeInfo` under `token`
    pub(crate) fn build(self, token: Token) -> TypeInfo {
        let rust_type = self.rust_type();
        let mut info = TypeInfo::new(token, self.flavor, self.namespace, self.name, self.base);

        info.rust_type = rust_type;
        info.interfaces = self.interfaces;
        info.generic_params = self.generic_params;
        info.methods = self.methods.into_iter().map(Arc::new).collect();
        info.fields = self.fields.into_iter().map(Arc::new).collect();
        info.constructors = self.constructors.into_iter().map(Arc::new).collect();
        info
    }

    /// Declare and register in one step
    ///
    /// # Errors
    /// See [`TypeRegistry::define`].
    pub fn register(self, registry: &TypeRegistry) -> Result<TypeRc> {
        registry.define(self)
    }
}
