use crate::metadata::{
    member::{Field, Method},
    typesystem::{PrimitiveKind, SuperType, TypeInfo, TypeRc, TypeRegistry, TypeSignature},
};

/// Default maximum recursion depth for type signature resolution
pub const MAX_RECURSION_DEPTH: usize = 64;

/// Resolves declared type signatures to concrete types in the registry
///
/// Resolution never fails. Anything that cannot be made concrete (wildcards, unbound type
/// variables, unknown names, runaway recursion) degrades to the universal top type.
///
/// Two flavours are offered:
/// - [`TypeResolver::erase`] yields the *erased declared* type of a signature, seen from the
///   declaring type alone. Type variables become their first bound.
/// - [`TypeResolver::resolve`] yields the type a signature has when the member is observed
///   through a (more derived) owning type, following generic arguments along the way.
pub struct TypeResolver<'a> {
    /// Reference to the type registry
    registry: &'a TypeRegistry,
    /// Maximum depth before resolution gives up
    max_depth: usize,
}

impl<'a> TypeResolver<'a> {
    /// Create a new resolver with the given registry
    ///
    /// ## Arguments
    /// * 'registry' - The type registry to use
    #[must_use]
    pub fn new(registry: &'a TypeRegistry) -> Self {
        TypeResolver {
            registry,
            max_depth: MAX_RECURSION_DEPTH,
        }
    }

    /// Set the maximum resolution depth
    ///
    /// ## Arguments
    /// * 'depth' - The new limit
    #[must_use]
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Resolve the declared type of `field` as seen from `owner`
    #[must_use]
    pub fn resolve_field_type(&self, field: &Field, declaring: &TypeInfo, owner: &TypeInfo) -> TypeRc {
        self.resolve(&field.signature, declaring, owner)
    }

    /// Resolve the return type of `method` as seen from `owner`
    #[must_use]
    pub fn resolve_return_type(
        &self,
        method: &Method,
        declaring: &TypeInfo,
        owner: &TypeInfo,
    ) -> TypeRc {
        self.resolve(&method.return_type, declaring, owner)
    }

    /// Resolve the parameter types of `method` as seen from `owner`
    #[must_use]
    pub fn resolve_param_types(
        &self,
        method: &Method,
        declaring: &TypeInfo,
        owner: &TypeInfo,
    ) -> Vec<TypeRc> {
        method
            .params
            .iter()
            .map(|param| self.resolve(param, declaring, owner))
            .collect()
    }

    /// Resolve a signature declared by `declaring` in the context of `owner`
    ///
    /// ## Arguments
    /// * 'signature' - The declared signature
    /// * 'declaring' - The type declaring the member
    /// * 'owner'     - The type being reflected, `declaring` or a subtype of it
    #[must_use]
    pub fn resolve(
        &self,
        signature: &TypeSignature,
        declaring: &TypeInfo,
        owner: &TypeInfo,
    ) -> TypeRc {
        if signature.is_concrete() {
            return self.to_type(signature);
        }

        let resolved = self.substitute_vars(signature, declaring, owner, 0);
        self.to_type(&resolved)
    }

    /// The erased declared type of `signature` within `declaring`
    ///
    /// ## Arguments
    /// * 'signature' - The declared signature
    /// * 'declaring' - The type declaring the member
    #[must_use]
    pub fn erase(&self, signature: &TypeSignature, declaring: &TypeInfo) -> TypeRc {
        let erased = self.erase_vars(signature, declaring, 0);
        self.to_type(&erased)
    }

    /// Map a signature to its registered type, performing erasure
    ///
    /// `GenericInst` erases to its raw type, arrays are synthesized on demand, everything
    /// that is not concrete becomes the top type.
    #[must_use]
    pub fn to_type(&self, signature: &TypeSignature) -> TypeRc {
        self.to_type_with_depth(signature, 0)
    }

    fn to_type_with_depth(&self, signature: &TypeSignature, depth: usize) -> TypeRc {
        if depth >= self.max_depth {
            log::warn!(
                "Resolution depth limit ({}) exceeded for '{}', using object",
                self.max_depth,
                signature
            );
            return self.registry.object();
        }

        match signature {
            TypeSignature::Primitive(kind) => self.registry.primitive(*kind),
            TypeSignature::Class(name) | TypeSignature::GenericInst { raw: name, .. } => {
                match self.registry.get_by_fullname(name) {
                    Some(found) => found,
                    None => {
                        log::warn!("Type '{}' is not registered, using object", name);
                        self.registry.object()
                    }
                }
            }
            TypeSignature::Array(component) => {
                let component = self.to_type_with_depth(component, depth + 1);
                self.registry.get_or_create_array(&component)
            }
            TypeSignature::Var(_) | TypeSignature::Wildcard { .. } => {
                log::debug!("'{}' has no concrete type, using object", signature);
                self.registry.object()
            }
        }
    }

    /// Replace the type variables of `declaring` by their first bound
    fn erase_vars(
        &self,
        signature: &TypeSignature,
        declaring: &TypeInfo,
        depth: usize,
    ) -> TypeSignature {
        if depth >= self.max_depth {
            return PrimitiveKind::Object.into();
        }

        match signature {
            TypeSignature::Var(name) => match Self::first_bound(declaring, name) {
                Some(bound) => self.erase_vars(&bound, declaring, depth + 1),
                None => PrimitiveKind::Object.into(),
            },
            TypeSignature::Array(component) => {
                TypeSignature::array(self.erase_vars(component, declaring, depth + 1))
            }
            other => other.clone(),
        }
    }

    /// Replace every type variable in `signature` by what it is bound to when seen from `owner`
    fn substitute_vars(
        &self,
        signature: &TypeSignature,
        declaring: &TypeInfo,
        owner: &TypeInfo,
        depth: usize,
    ) -> TypeSignature {
        if depth >= self.max_depth {
            log::warn!(
                "Resolution depth limit ({}) exceeded for '{}' in '{}'",
                self.max_depth,
                signature,
                owner.fullname()
            );
            return PrimitiveKind::Object.into();
        }

        match signature {
            TypeSignature::Var(name) => self.resolve_var(name, owner, &[], declaring, depth + 1),
            TypeSignature::GenericInst { raw, args } => TypeSignature::GenericInst {
                raw: raw.clone(),
                args: args
                    .iter()
                    .map(|arg| self.substitute_vars(arg, declaring, owner, depth + 1))
                    .collect(),
            },
            TypeSignature::Array(component) => {
                TypeSignature::array(self.substitute_vars(component, declaring, owner, depth + 1))
            }
            other => other.clone(),
        }
    }

    /// Find what the variable `var` of `declaring` is bound to in `src`
    ///
    /// ## Arguments
    /// * 'var'       - Name of the type variable
    /// * 'src'       - The type the variable is observed from
    /// * 'src_args'  - The generic arguments `src` is instantiated with, empty if raw
    /// * 'declaring' - The type declaring the variable
    /// * 'depth'     - Indicator of recursion level
    fn resolve_var(
        &self,
        var: &str,
        src: &TypeInfo,
        src_args: &[TypeSignature],
        declaring: &TypeInfo,
        depth: usize,
    ) -> TypeSignature {
        if depth >= self.max_depth {
            log::warn!(
                "Resolution depth limit ({}) exceeded for type variable '{}'",
                self.max_depth,
                var
            );
            return PrimitiveKind::Object.into();
        }

        if src.token == declaring.token {
            return Self::first_bound(declaring, var).unwrap_or(PrimitiveKind::Object.into());
        }

        for parent in src.base().into_iter().chain(src.interfaces.iter()) {
            if let Some(found) = self.scan_super_type(var, src, src_args, declaring, parent, depth)
            {
                return found;
            }
        }

        log::debug!(
            "Type variable '{}' of '{}' is not bound by '{}'",
            var,
            declaring.fullname(),
            src.fullname()
        );
        PrimitiveKind::Object.into()
    }

    fn scan_super_type(
        &self,
        var: &str,
        src: &TypeInfo,
        src_args: &[TypeSignature],
        declaring: &TypeInfo,
        parent: &SuperType,
        depth: usize,
    ) -> Option<TypeSignature> {
        if parent.args.is_empty() {
            return declaring
                .is_assignable_from(&parent.ty)
                .then(|| self.resolve_var(var, &parent.ty, &[], declaring, depth + 1));
        }

        let parent_args: Vec<TypeSignature> = if src_args.is_empty() {
            parent.args.clone()
        } else {
            parent
                .args
                .iter()
                .map(|arg| Self::translate(arg, src, src_args))
                .collect()
        };

        if parent.ty.token == declaring.token {
            if let Some(bound) = declaring
                .generic_param(var)
                .and_then(|(index, _)| parent_args.get(index))
            {
                return Some(bound.clone());
            }
        }

        declaring
            .is_assignable_from(&parent.ty)
            .then(|| self.resolve_var(var, &parent.ty, &parent_args, declaring, depth + 1))
    }

    /// Rewrite the type variables of `src` inside `signature` to the arguments `src` was
    /// instantiated with
    fn translate(
        signature: &TypeSignature,
        src: &TypeInfo,
        src_args: &[TypeSignature],
    ) -> TypeSignature {
        match signature {
            TypeSignature::Var(name) => src
                .generic_param(name)
                .and_then(|(index, _)| src_args.get(index))
                .cloned()
                .unwrap_or_else(|| signature.clone()),
            TypeSignature::GenericInst { raw, args } => TypeSignature::GenericInst {
                raw: raw.clone(),
                args: args
                    .iter()
                    .map(|arg| Self::translate(arg, src, src_args))
                    .collect(),
            },
            TypeSignature::Array(component) => {
                TypeSignature::array(Self::translate(component, src, src_args))
            }
            other => other.clone(),
        }
    }

    fn first_bound(declaring: &TypeInfo, var: &str) -> Option<TypeSignature> {
        declaring
            .generic_param(var)
            .and_then(|(_, param)| param.bounds.first().cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::typesystem::{TypeBuilder, TypeFlavor};

    fn var(name: &str) -> TypeSignature {
        TypeSignature::var(name)
    }

    #[test]
    fn test_resolve_concrete() {
        let registry = TypeRegistry::new();
        let resolver = TypeResolver::new(&registry);
        let object = registry.object();

        let int = resolver.resolve(&PrimitiveKind::I32.into(), &object, &object);
        assert_eq!(int.token, registry.primitive(PrimitiveKind::I32).token);

        let missing = resolver.to_type(&TypeSignature::class("zoo.Missing"));
        assert!(missing.is_object());

        let wildcard = resolver.to_type(&TypeSignature::wildcard());
        assert!(wildcard.is_object());
    }

    #[test]
    fn test_resolve_generic_inst_erases_to_raw() {
        let registry = TypeRegistry::new();
        let list = registry
            .define(TypeBuilder::interface("util", "List").generic_param("E", vec![]))
            .unwrap();
        let resolver = TypeResolver::new(&registry);

        let resolved = resolver.to_type(&TypeSignature::generic(
            "util.List",
            vec![PrimitiveKind::String.into()],
        ));
        assert_eq!(resolved.token, list.token);
    }

    #[test]
    fn test_resolve_array() {
        let registry = TypeRegistry::new();
        let resolver = TypeResolver::new(&registry);

        let nested = resolver.to_type(&TypeSignature::array(TypeSignature::array(
            PrimitiveKind::I64,
        )));
        assert_eq!(nested.flavor, TypeFlavor::Array);
        assert_eq!(nested.fullname(), "i64[][]");
        assert_eq!(nested.element().unwrap().fullname(), "i64[]");
    }

    #[test]
    fn test_resolve_var_through_hierarchy() {
        let registry = TypeRegistry::new();

        // class Entity<K> { K getId() }
        let entity = registry
            .define(
                TypeBuilder::<()>::abstract_class("orm", "Entity")
                    .generic_param("K", vec![])
                    .abstract_method("getId", vec![], var("K")),
            )
            .unwrap();
        // class Named<N extends string, K> extends Entity<K>
        let named = registry
            .define(
                TypeBuilder::<()>::abstract_class("orm", "Named")
                    .generic_param("N", vec![PrimitiveKind::String.into()])
                    .generic_param("V", vec![])
                    .extends(&entity, vec![var("V")]),
            )
            .unwrap();
        // class User extends Named<string, i64>
        let user = registry
            .define(TypeBuilder::<()>::abstract_class("orm", "User").extends(
                &named,
                vec![PrimitiveKind::String.into(), PrimitiveKind::I64.into()],
            ))
            .unwrap();

        let resolver = TypeResolver::new(&registry);
        let get_id = &entity.methods[0];

        let from_user = resolver.resolve_return_type(get_id, &entity, &user);
        assert_eq!(from_user.token, registry.primitive(PrimitiveKind::I64).token);

        // raw view from an intermediate type leaves the variable unbound
        let from_named = resolver.resolve_return_type(get_id, &entity, &named);
        assert!(from_named.is_object());

        let from_entity = resolver.resolve_return_type(get_id, &entity, &entity);
        assert!(from_entity.is_object());

        let name_bound = resolver.erase(&var("N"), &named);
        assert_eq!(name_bound.token, registry.primitive(PrimitiveKind::String).token);
    }

    #[test]
    fn test_resolve_var_array_and_interface() {
        let registry = TypeRegistry::new();

        let source = registry
            .define(
                TypeBuilder::interface("orm", "Source")
                    .generic_param("T", vec![])
                    .abstract_method("getItems", vec![], TypeSignature::array(var("T"))),
            )
            .unwrap();
        let books = registry
            .define(
                TypeBuilder::<()>::abstract_class("orm", "Books")
                    .implements(&source, vec![PrimitiveKind::String.into()]),
            )
            .unwrap();

        let resolver = TypeResolver::new(&registry);
        let items = resolver.resolve_return_type(&source.methods[0], &source, &books);
        assert_eq!(items.fullname(), "string[]");

        let erased = resolver.erase(&source.methods[0].return_type, &source);
        assert_eq!(erased.fullname(), "object[]");
    }

    #[test]
    fn test_recursion_limit() {
        let registry = TypeRegistry::new();
        let resolver = TypeResolver::new(&registry).with_max_depth(3);

        let mut deep = TypeSignature::from(PrimitiveKind::I32);
        for _ in 0..5 {
            deep = TypeSignature::array(deep);
        }

        let resolved = resolver.to_type(&deep);
        assert_eq!(resolved.fullname(), "object[][][]");
    }
}
