//! Collects the accessor-shaped members reachable from a type.
//!
//! Methods are gathered from the reflected type up its base chain. At every level the
//! level's own declarations come first, then the declarations of the interfaces it
//! implements (transitively). A method is identified by its erased signature
//! (`return#name:param,...`); the first discovery wins, which lets overrides in derived
//! types shadow their ancestors. Bridge methods are skipped entirely.
//!
//! Fields are gathered along the base chain only, most-derived first.

use indexmap::{map::Entry, IndexMap};

use crate::{
    metadata::{
        member::{FieldRc, MethodRc},
        typesystem::{SuperType, TypeInfo, TypeRc, TypeResolver},
    },
    reflection::invoker::Projection,
};

/// A method reachable from the reflected type
#[derive(Clone)]
pub(crate) struct MethodCandidate {
    pub(crate) method: MethodRc,
    pub(crate) declaring: TypeRc,
    pub(crate) projection: Projection,
}

/// A field reachable from the reflected type
#[derive(Clone)]
pub(crate) struct FieldCandidate {
    pub(crate) field: FieldRc,
    pub(crate) declaring: TypeRc,
    pub(crate) projection: Projection,
}

/// Walks the schema of one reflected type
pub(crate) struct MemberEnumerator<'a> {
    resolver: &'a TypeResolver<'a>,
}

impl<'a> MemberEnumerator<'a> {
    pub(crate) fn new(resolver: &'a TypeResolver<'a>) -> Self {
        MemberEnumerator { resolver }
    }

    /// All unique, non-bridge methods reachable from `owner`, in discovery order
    pub(crate) fn methods(&self, owner: &TypeRc) -> Vec<MethodCandidate> {
        let mut unique: IndexMap<String, MethodCandidate> = IndexMap::new();

        for (level, projection) in Self::class_chain(owner) {
            self.add_unique(&mut unique, &level, &projection);
            for interface in &level.interfaces {
                self.add_interface(&mut unique, interface, &projection);
            }
        }

        unique.into_values().collect()
    }

    /// All fields declared along the base chain of `owner`, most-derived first
    pub(crate) fn fields(&self, owner: &TypeRc) -> Vec<FieldCandidate> {
        Self::class_chain(owner)
            .into_iter()
            .flat_map(|(level, projection)| {
                level
                    .fields
                    .iter()
                    .map(|field| FieldCandidate {
                        field: field.clone(),
                        declaring: level.clone(),
                        projection: projection.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// `owner` and its bases up to (excluding) the top type, each with the projection that
    /// reaches it from an instance of `owner`
    fn class_chain(owner: &TypeRc) -> Vec<(TypeRc, Projection)> {
        let mut chain = Vec::new();
        let mut current = Some((owner.clone(), Projection::identity()));

        while let Some((level, projection)) = current {
            if level.is_object() {
                break;
            }

            current = level.base().map(|base| {
                (
                    base.ty.clone(),
                    projection.then(base.upcast.as_ref()),
                )
            });
            chain.push((level, projection));
        }

        chain
    }

    fn add_interface(
        &self,
        unique: &mut IndexMap<String, MethodCandidate>,
        interface: &SuperType,
        projection: &Projection,
    ) {
        self.add_unique(unique, &interface.ty, projection);
        for parent in &interface.ty.interfaces {
            self.add_interface(unique, parent, projection);
        }
    }

    fn add_unique(
        &self,
        unique: &mut IndexMap<String, MethodCandidate>,
        declaring: &TypeRc,
        projection: &Projection,
    ) {
        for method in declaring.methods.iter().filter(|method| !method.is_bridge()) {
            if let Entry::Vacant(slot) = unique.entry(self.signature(method, declaring)) {
                slot.insert(MethodCandidate {
                    method: method.clone(),
                    declaring: declaring.clone(),
                    projection: projection.clone(),
                });
            }
        }
    }

    /// Erased identity of a method, e.g. `string#getName:` or `void#setAge:i32`
    fn signature(&self, method: &MethodRc, declaring: &TypeInfo) -> String {
        let mut key = self.resolver.erase(&method.return_type, declaring).fullname();
        key.push('#');
        key.push_str(&method.name);

        for (index, param) in method.params.iter().enumerate() {
            key.push(if index == 0 { ':' } else { ',' });
            key.push_str(&self.resolver.erase(param, declaring).fullname());
        }

        key
    }
}
