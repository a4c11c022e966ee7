//! Benchmarks for reflection and cached lookups.
//!
//! - Cold builds of a type with inherited, generic and overloaded accessors
//! - Warm cache hits
//! - Property reads and writes through invokers
//! - Case-insensitive name lookups

extern crate ormscope;

use criterion::{criterion_group, criterion_main, Criterion};
use ormscope::{
    metadata::typesystem::{PrimitiveKind, TypeRc, TypeSignature},
    MetadataCache, ReflectorConfig, TypeBuilder, TypeRegistry,
};
use std::{hint::black_box, sync::Arc};

#[derive(Clone, Default)]
struct Entity {
    id: i64,
    version: i32,
}

#[derive(Clone, Default)]
struct Order {
    entity: Entity,
    customer: String,
    amount: f64,
    paid: bool,
    note: String,
}

fn registry() -> (Arc<TypeRegistry>, TypeRc) {
    let registry = Arc::new(TypeRegistry::new());

    let entity = registry
        .define(
            TypeBuilder::<Entity>::abstract_class("bench", "Entity")
                .generic_param("K", vec![])
                .getter("getId", TypeSignature::var("K"), |e: &Entity| e.id)
                .setter("setId", TypeSignature::var("K"), |e: &mut Entity, v: i64| {
                    e.id = v
                })
                .field("version", PrimitiveKind::I32, |e| &e.version, |e| &mut e.version),
        )
        .unwrap();

    let order = registry
        .define(
            TypeBuilder::<Order>::class("bench", "Order")
                .embeds(
                    &entity,
                    vec![PrimitiveKind::I64.into()],
                    |o| &o.entity,
                    |o| &mut o.entity,
                )
                .getter("getCustomer", PrimitiveKind::String, |o: &Order| {
                    o.customer.clone()
                })
                .setter("setCustomer", PrimitiveKind::String, |o: &mut Order, v: String| {
                    o.customer = v
                })
                .getter("isPaid", PrimitiveKind::Bool, |o: &Order| o.paid)
                .getter("getPaid", PrimitiveKind::Bool, |o: &Order| o.paid)
                .getter("getNote", PrimitiveKind::String, |o: &Order| o.note.clone())
                .setter("setNote", PrimitiveKind::I32, |o: &mut Order, v: i32| {
                    o.note = v.to_string()
                })
                .setter("setNote", PrimitiveKind::String, |o: &mut Order, v: String| {
                    o.note = v
                })
                .field("amount", PrimitiveKind::F64, |o| &o.amount, |o| &mut o.amount)
                .default_constructor(Order::default),
        )
        .unwrap();

    (registry, order)
}

/// Benchmark building the metadata of a type from scratch.
fn bench_cold_build(c: &mut Criterion) {
    let (registry, order) = registry();
    let cache = MetadataCache::with_config(registry, ReflectorConfig::uncached());

    c.bench_function("metadata_cold_build", |b| {
        b.iter(|| black_box(cache.metadata(black_box(&order))));
    });
}

/// Benchmark a cache hit.
fn bench_cached_lookup(c: &mut Criterion) {
    let (registry, order) = registry();
    let cache = MetadataCache::new(registry);
    cache.metadata(&order);

    c.bench_function("metadata_cached_lookup", |b| {
        b.iter(|| black_box(cache.metadata(black_box(&order))));
    });
}

/// Benchmark reading and writing properties through their invokers.
fn bench_property_access(c: &mut Criterion) {
    let (registry, order) = registry();
    let cache = MetadataCache::new(registry);
    let metadata = cache.metadata(&order);
    let mut instance = Order::default();

    c.bench_function("property_get_inherited", |b| {
        b.iter(|| black_box(metadata.get_value(&mut instance, black_box("id")).unwrap()));
    });

    let mut instance = Order::default();
    c.bench_function("property_set_field", |b| {
        b.iter(|| {
            metadata
                .set_value(&mut instance, black_box("amount"), Box::new(9.5_f64))
                .unwrap()
        });
    });
}

/// Benchmark resolving property names regardless of case.
fn bench_case_insensitive(c: &mut Criterion) {
    let (registry, order) = registry();
    let cache = MetadataCache::new(registry);
    let metadata = cache.metadata(&order);

    c.bench_function("find_property_name", |b| {
        b.iter(|| black_box(metadata.find_property_name(black_box("CUSTOMER"))));
    });
}

criterion_group!(
    benches,
    bench_cold_build,
    bench_cached_lookup,
    bench_property_access,
    bench_case_insensitive
);
criterion_main!(benches);
