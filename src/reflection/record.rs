use std::{any::Any, collections::HashMap};

use indexmap::IndexMap;

use crate::{
    metadata::{
        member::{ConstructorRc, Value},
        typesystem::{TypeRc, TypeRegistry, TypeResolver},
    },
    reflection::{
        conflicts::ConflictResolver, enumerator::MemberEnumerator, AccessorKind, Invoker,
        ReflectorConfig,
    },
    Error, Result,
};

/// The reflected property surface of one type.
///
/// A `TypeMetadata` lists the readable and writable properties of a type, the accessor
/// behind each of them with its resolved type, the zero-argument constructor and a
/// case-insensitive name index. It is built once by a [`crate::MetadataCache`] and never
/// changes afterwards.
///
/// Conflicts found while building do not fail the build. An undecidable accessor is stored
/// as [`Invoker::Ambiguous`] and only reports its diagnostic when invoked.
///
/// # Examples
///
/// ```rust
/// use ormscope::{MetadataCache, TypeBuilder, TypeRegistry};
/// use ormscope::metadata::typesystem::PrimitiveKind;
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct User {
///     user_name: String,
/// }
///
/// let registry = Arc::new(TypeRegistry::new());
/// registry.define(
///     TypeBuilder::<User>::class("app", "User")
///         .getter("getUserName", PrimitiveKind::String, |u: &User| u.user_name.clone())
///         .setter("setUserName", PrimitiveKind::String, |u: &mut User, v: String| u.user_name = v)
///         .default_constructor(User::default),
/// )?;
///
/// let cache = MetadataCache::new(registry);
/// let metadata = cache.metadata_of::<User>()?;
///
/// assert_eq!(metadata.find_property_name("USERNAME"), Some("userName"));
/// assert!(metadata.has_default_constructor());
///
/// let mut user = metadata.default_constructor()?.instantiate::<User>(vec![])?;
/// metadata.set_value(&mut user, "userName", Box::new("grace".to_string()))?;
/// assert_eq!(user.user_name, "grace");
/// # Ok::<(), ormscope::Error>(())
/// ```
pub struct TypeMetadata {
    ty: TypeRc,
    default_constructor: Option<ConstructorRc>,
    get_invokers: IndexMap<String, Invoker>,
    set_invokers: IndexMap<String, Invoker>,
    case_insensitive: HashMap<String, String>,
}

impl TypeMetadata {
    /// Reflect on `ty`
    ///
    /// ## Arguments
    /// * 'ty'       - The type to reflect
    /// * 'registry' - The registry `ty` and all referenced types live in
    /// * 'config'   - Resolution limits
    pub(crate) fn build(ty: &TypeRc, registry: &TypeRegistry, config: &ReflectorConfig) -> Self {
        let resolver = TypeResolver::new(registry).with_max_depth(config.max_resolution_depth);
        let enumerator = MemberEnumerator::new(&resolver);

        let methods = enumerator.methods(ty);
        let fields = enumerator.fields(ty);
        let accessors = ConflictResolver::new(ty, &resolver).resolve(&methods, &fields);

        let mut case_insensitive = HashMap::new();
        for name in accessors.getters.keys().chain(accessors.setters.keys()) {
            case_insensitive.insert(name.to_uppercase(), name.clone());
        }

        log::debug!(
            "Reflected {} ({}): {} readable, {} writable from {} methods and {} fields",
            ty.fullname(),
            ty.token,
            accessors.getters.len(),
            accessors.setters.len(),
            methods.len(),
            fields.len()
        );

        TypeMetadata {
            ty: ty.clone(),
            default_constructor: ty
                .constructors
                .iter()
                .find(|constructor| constructor.is_default())
                .cloned(),
            get_invokers: accessors.getters,
            set_invokers: accessors.setters,
            case_insensitive,
        }
    }

    /// The reflected type
    #[must_use]
    pub fn ty(&self) -> &TypeRc {
        &self.ty
    }

    /// Readable property names in discovery order
    #[must_use]
    pub fn readable_properties(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.get_invokers.keys().map(String::as_str)
    }

    /// Writable property names in discovery order
    #[must_use]
    pub fn writable_properties(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.set_invokers.keys().map(String::as_str)
    }

    /// True if `name` is readable
    #[must_use]
    pub fn has_getter(&self, name: &str) -> bool {
        self.get_invokers.contains_key(name)
    }

    /// True if `name` is writable
    #[must_use]
    pub fn has_setter(&self, name: &str) -> bool {
        self.set_invokers.contains_key(name)
    }

    /// The accessor reading `name`
    ///
    /// # Errors
    /// Returns [`Error::PropertyNotFound`] if `name` is not readable.
    pub fn get_invoker(&self, name: &str) -> Result<&Invoker> {
        self.get_invokers
            .get(name)
            .ok_or_else(|| self.not_found(AccessorKind::Getter, name))
    }

    /// The accessor writing `name`
    ///
    /// # Errors
    /// Returns [`Error::PropertyNotFound`] if `name` is not writable.
    pub fn set_invoker(&self, name: &str) -> Result<&Invoker> {
        self.set_invokers
            .get(name)
            .ok_or_else(|| self.not_found(AccessorKind::Setter, name))
    }

    /// The resolved type read from `name`
    ///
    /// # Errors
    /// Returns [`Error::PropertyNotFound`] if `name` is not readable.
    pub fn getter_type(&self, name: &str) -> Result<TypeRc> {
        self.get_invoker(name)
            .map(|invoker| invoker.value_type().clone())
    }

    /// The resolved type written to `name`
    ///
    /// # Errors
    /// Returns [`Error::PropertyNotFound`] if `name` is not writable.
    pub fn setter_type(&self, name: &str) -> Result<TypeRc> {
        self.set_invoker(name)
            .map(|invoker| invoker.value_type().clone())
    }

    /// True if the type declares a zero-argument constructor
    #[must_use]
    pub fn has_default_constructor(&self) -> bool {
        self.default_constructor.is_some()
    }

    /// The zero-argument constructor
    ///
    /// # Errors
    /// Returns [`Error::NoDefaultConstructor`] if the type has none.
    pub fn default_constructor(&self) -> Result<&ConstructorRc> {
        self.default_constructor
            .as_ref()
            .ok_or_else(|| Error::NoDefaultConstructor(self.ty.fullname()))
    }

    /// The canonical property name for `name`, ignoring case
    ///
    /// ## Arguments
    /// * 'name' - The property name in any casing, e.g. `USERNAME`
    #[must_use]
    pub fn find_property_name(&self, name: &str) -> Option<&str> {
        self.case_insensitive
            .get(&name.to_uppercase())
            .map(String::as_str)
    }

    /// Read property `name` of `target`
    ///
    /// # Errors
    /// Fails if `name` is not readable or invoking its accessor fails.
    pub fn get_value(&self, target: &mut dyn Any, name: &str) -> Result<Value> {
        self.get_invoker(name)?.get(target)
    }

    /// Write property `name` of `target`
    ///
    /// # Errors
    /// Fails if `name` is not writable or invoking its accessor fails.
    pub fn set_value(&self, target: &mut dyn Any, name: &str, value: Value) -> Result<()> {
        self.set_invoker(name)?.set(target, value)
    }

    fn not_found(&self, kind: AccessorKind, name: &str) -> Error {
        Error::PropertyNotFound {
            kind,
            property: name.to_string(),
            type_name: self.ty.fullname(),
        }
    }
}

impl std::fmt::Debug for TypeMetadata {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeMetadata")
            .field("type", &self.ty.fullname())
            .field("readable", &self.get_invokers.keys())
            .field("writable", &self.set_invokers.keys())
            .field("default_constructor", &self.has_default_constructor())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{metadata::typesystem::PrimitiveKind, test::*};

    fn build(ty: &TypeRc, registry: &TypeRegistry) -> TypeMetadata {
        TypeMetadata::build(ty, registry, &ReflectorConfig::default())
    }

    #[test]
    fn test_pet_prefers_is_getter() {
        let registry = TypeRegistry::new();
        let pet = define_pet(&registry);
        let metadata = build(&pet, &registry);

        assert_eq!(
            metadata.readable_properties().collect::<Vec<_>>(),
            vec!["name", "happy"]
        );
        assert_eq!(metadata.writable_properties().len(), 0);

        match metadata.get_invoker("happy").unwrap() {
            Invoker::Method(invoker) => assert_eq!(invoker.method().name, "isHappy"),
            other => panic!("unexpected invoker {:?}", other),
        }
        assert_eq!(
            metadata.getter_type("happy").unwrap().token,
            registry.primitive(PrimitiveKind::Bool).token
        );

        let mut pet = Pet {
            name: "tom".to_string(),
            happy: true,
        };
        assert!(*metadata
            .get_value(&mut pet, "happy")
            .unwrap()
            .downcast::<bool>()
            .unwrap());
    }

    #[test]
    fn test_counter_field_fallback() {
        let registry = TypeRegistry::new();
        let counter = define_counter(&registry);
        let metadata = build(&counter, &registry);

        assert!(metadata.has_getter("count"));
        assert!(metadata.has_setter("count"));
        assert!(metadata.has_default_constructor());
        assert_eq!(
            metadata.setter_type("count").unwrap().token,
            registry.primitive(PrimitiveKind::I32).token
        );

        let mut counter = metadata
            .default_constructor()
            .unwrap()
            .instantiate::<Counter>(vec![])
            .unwrap();
        metadata
            .set_value(&mut counter, "count", Box::new(4_i32))
            .unwrap();
        assert_eq!(counter.count, 4);
    }

    #[test]
    fn test_missing_properties_and_constructor() {
        let registry = TypeRegistry::new();
        let pet = define_pet(&registry);
        let metadata = build(&pet, &registry);

        match metadata.set_invoker("name") {
            Err(Error::PropertyNotFound {
                kind,
                property,
                type_name,
            }) => {
                assert_eq!(kind, AccessorKind::Setter);
                assert_eq!(property, "name");
                assert_eq!(type_name, "zoo.Pet");
            }
            other => panic!("unexpected {:?}", other.map(|_| ())),
        }

        assert!(matches!(
            metadata.getter_type("owner"),
            Err(Error::PropertyNotFound { .. })
        ));
        assert!(matches!(
            metadata.default_constructor(),
            Err(Error::NoDefaultConstructor(name)) if name == "zoo.Pet"
        ));
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let registry = TypeRegistry::new();
        let user = define_user(&registry);
        let metadata = build(&user, &registry);

        assert_eq!(metadata.find_property_name("USERNAME"), Some("userName"));
        assert_eq!(metadata.find_property_name("username"), Some("userName"));
        assert_eq!(metadata.find_property_name("nickname"), None);
    }

    #[test]
    fn test_name_sets_are_unique() {
        let registry = TypeRegistry::new();
        let account = define_account(&registry);
        let metadata = build(&account, &registry);

        let readable: Vec<&str> = metadata.readable_properties().collect();
        let mut deduped = readable.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(readable.len(), deduped.len());

        for name in readable.into_iter().chain(metadata.writable_properties()) {
            assert_eq!(metadata.find_property_name(&name.to_uppercase()), Some(name));
        }
    }
}
