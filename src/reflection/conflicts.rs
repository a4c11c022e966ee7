//! Accessor conflict resolution.
//!
//! Overloads, covariant overrides and `is`/`get` pairs can yield several candidate methods
//! for the same property and direction. The resolver reduces every such group to exactly one
//! [`Invoker`]. Groups that cannot be decided become [`Invoker::Ambiguous`]: the failure is
//! recorded with a diagnostic and only reported when the accessor is used.
//!
//! Candidates are compared by their erased declared types, the types recorded for the
//! winners are the generic types resolved against the reflected type.

use indexmap::IndexMap;

use crate::{
    metadata::typesystem::{PrimitiveKind, TypeRc, TypeResolver},
    reflection::{
        enumerator::{FieldCandidate, MethodCandidate},
        invoker::{AmbiguousInvoker, FieldAccess, FieldInvoker, Invoker, MethodInvoker},
        namer,
    },
};

/// Candidates for one direction, grouped by property name in discovery order
type ConflictSet<'c> = IndexMap<String, Vec<&'c MethodCandidate>>;

/// The decided accessors of a type, in discovery order
#[derive(Default)]
pub(crate) struct AccessorTable {
    pub(crate) getters: IndexMap<String, Invoker>,
    pub(crate) setters: IndexMap<String, Invoker>,
}

pub(crate) struct ConflictResolver<'a> {
    owner: &'a TypeRc,
    resolver: &'a TypeResolver<'a>,
}

impl<'a> ConflictResolver<'a> {
    pub(crate) fn new(owner: &'a TypeRc, resolver: &'a TypeResolver<'a>) -> Self {
        ConflictResolver { owner, resolver }
    }

    /// Decide getters first, then setters (which depend on the getter types), then fall
    /// back to fields for everything still unclaimed
    pub(crate) fn resolve(
        &self,
        methods: &[MethodCandidate],
        fields: &[FieldCandidate],
    ) -> AccessorTable {
        let mut table = AccessorTable::default();

        let getters = Self::collect(methods, 0, namer::is_getter);
        self.resolve_getters(getters, &mut table);

        let setters = Self::collect(methods, 1, namer::is_setter);
        self.resolve_setters(setters, &mut table);

        self.add_fields(fields, &mut table);
        table
    }

    fn collect(
        methods: &[MethodCandidate],
        arity: usize,
        shape: fn(&str) -> bool,
    ) -> ConflictSet<'_> {
        let mut conflicts = ConflictSet::new();

        for candidate in methods {
            let method = &candidate.method;
            if method.params.len() != arity || !shape(&method.name) {
                continue;
            }

            if let Some(property) = namer::method_to_property(&method.name)
                .filter(|property| namer::is_valid_property_name(property))
            {
                conflicts.entry(property).or_default().push(candidate);
            }
        }

        conflicts
    }

    fn resolve_getters(&self, conflicts: ConflictSet<'_>, table: &mut AccessorTable) {
        for (property, candidates) in conflicts {
            let Some((&first, rest)) = candidates.split_first() else {
                continue;
            };

            let mut winner = first;
            let mut rival = None;

            for &candidate in rest {
                let winner_type = self.erased_return(winner);
                let candidate_type = self.erased_return(candidate);

                if candidate_type.token == winner_type.token {
                    if !candidate_type.flavor.is_bool() {
                        rival = Some(candidate);
                        break;
                    }
                    if candidate.method.name.starts_with("is") {
                        winner = candidate;
                    }
                } else if candidate_type.is_assignable_from(&winner_type) {
                    // winner already returns the more specific type
                } else if winner_type.is_assignable_from(&candidate_type) {
                    winner = candidate;
                } else {
                    rival = Some(candidate);
                    break;
                }

                log::trace!(
                    "{}: getter '{}' keeps '{}'",
                    self.owner.fullname(),
                    property,
                    winner.method.name
                );
            }

            let value_type =
                self.resolver
                    .resolve_return_type(&winner.method, &winner.declaring, self.owner);

            let invoker = match rival {
                Some(rival) => {
                    let message = format!(
                        "Illegal overloaded getter method with ambiguous type for property '{}' in class '{}' ({} vs {}). \
                         This breaks the accessor naming conventions and can cause unpredictable results.",
                        property,
                        winner.declaring.fullname(),
                        self.describe_getter(winner),
                        self.describe_getter(rival),
                    );
                    log::warn!("{}", message);
                    Invoker::Ambiguous(AmbiguousInvoker::new(message, value_type))
                }
                None => Invoker::Method(MethodInvoker::new(
                    winner.method.clone(),
                    winner.projection.clone(),
                    value_type,
                )),
            };

            table.getters.insert(property, invoker);
        }
    }

    fn resolve_setters(&self, conflicts: ConflictSet<'_>, table: &mut AccessorTable) {
        for (property, candidates) in conflicts {
            let getter_type = table
                .getters
                .get(&property)
                .filter(|getter| !getter.is_ambiguous())
                .map(|getter| getter.value_type().clone());

            let mut matched: Option<&MethodCandidate> = None;
            let mut ambiguous = false;

            for candidate in candidates {
                let param_type = self.erased_param(candidate);
                if getter_type
                    .as_ref()
                    .is_some_and(|getter| getter.token == param_type.token)
                {
                    log::trace!(
                        "{}: setter '{}' matches the getter type exactly",
                        self.owner.fullname(),
                        candidate.method.name
                    );
                    matched = Some(candidate);
                    break;
                }

                if !ambiguous {
                    matched = self.pick_better_setter(matched, candidate, &property, table);
                    ambiguous = matched.is_none();
                }
            }

            if let Some(setter) = matched {
                let value_type = self.resolved_param(setter);
                table.setters.insert(
                    property,
                    Invoker::Method(MethodInvoker::new(
                        setter.method.clone(),
                        setter.projection.clone(),
                        value_type,
                    )),
                );
            }
        }
    }

    /// Prefer the setter with the narrower parameter type
    ///
    /// Unrelated parameter types register an ambiguous setter and yield `None`.
    fn pick_better_setter<'c>(
        &self,
        current: Option<&'c MethodCandidate>,
        candidate: &'c MethodCandidate,
        property: &str,
        table: &mut AccessorTable,
    ) -> Option<&'c MethodCandidate> {
        let Some(current) = current else {
            return Some(candidate);
        };

        let current_type = self.erased_param(current);
        let candidate_type = self.erased_param(candidate);

        if current_type.is_assignable_from(&candidate_type) {
            return Some(candidate);
        }
        if candidate_type.is_assignable_from(&current_type) {
            return Some(current);
        }

        let message = format!(
            "Ambiguous setters defined for property '{}' in class '{}' with types '{}' and '{}'.",
            property,
            candidate.declaring.fullname(),
            current_type.fullname(),
            candidate_type.fullname(),
        );
        log::warn!("{}", message);

        let value_type = self.resolved_param(current);
        table.setters.insert(
            property.to_string(),
            Invoker::Ambiguous(AmbiguousInvoker::new(message, value_type)),
        );
        None
    }

    /// Expose fields for every name no method claimed, most-derived declaration first
    fn add_fields(&self, fields: &[FieldCandidate], table: &mut AccessorTable) {
        for candidate in fields {
            let field = &candidate.field;
            if field.is_synthetic() || !namer::is_valid_property_name(&field.name) {
                continue;
            }

            let wants_setter = !table.setters.contains_key(&field.name) && !field.is_constant();
            let wants_getter = !table.getters.contains_key(&field.name);
            if !wants_setter && !wants_getter {
                continue;
            }

            let value_type =
                self.resolver
                    .resolve_field_type(field, &candidate.declaring, self.owner);

            if wants_setter {
                table.setters.insert(
                    field.name.clone(),
                    Invoker::Field(FieldInvoker::new(
                        field.clone(),
                        FieldAccess::Set,
                        candidate.projection.clone(),
                        value_type.clone(),
                    )),
                );
            }
            if wants_getter {
                table.getters.insert(
                    field.name.clone(),
                    Invoker::Field(FieldInvoker::new(
                        field.clone(),
                        FieldAccess::Get,
                        candidate.projection.clone(),
                        value_type,
                    )),
                );
            }
        }
    }

    fn erased_return(&self, candidate: &MethodCandidate) -> TypeRc {
        self.resolver
            .erase(&candidate.method.return_type, &candidate.declaring)
    }

    fn erased_param(&self, candidate: &MethodCandidate) -> TypeRc {
        match candidate.method.params.first() {
            Some(param) => self.resolver.erase(param, &candidate.declaring),
            None => self.top_type(),
        }
    }

    fn resolved_param(&self, candidate: &MethodCandidate) -> TypeRc {
        self.resolver
            .resolve_param_types(&candidate.method, &candidate.declaring, self.owner)
            .into_iter()
            .next()
            .unwrap_or_else(|| self.top_type())
    }

    fn top_type(&self) -> TypeRc {
        self.resolver.to_type(&PrimitiveKind::Object.into())
    }

    fn describe_getter(&self, candidate: &MethodCandidate) -> String {
        format!(
            "{}.{}() -> {}",
            candidate.declaring.fullname(),
            candidate.method.name,
            self.erased_return(candidate).fullname()
        )
    }
}
