use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use strata_kernel::prelude::*;

fn catalog(implementations: usize) -> (Registry, Class) {
    let registry = Registry::new();
    let renderer = Class::replaceable("BaseRenderer").build();
    for i in 0..implementations {
        let steps = i64::try_from(i).unwrap_or_default();
        registry
            .register(
                Class::extends(&renderer, format!("Renderer{i}"))
                    .field("n_steps", steps)
                    .field("bg_color", vec![0.0, 0.0, 0.0])
                    .build(),
            )
            .unwrap();
    }
    let model = Class::configurable("GenericModel")
        .field("renderer_class_type", "Renderer0")
        .member("renderer", &renderer)
        .build();
    registry.expand(&model).unwrap();
    (registry, model)
}

fn bench_default_args(c: &mut Criterion) {
    let mut group = c.benchmark_group("default_args");

    for implementations in [4usize, 16, 64] {
        let (registry, model) = catalog(implementations);
        let tree = registry.default_args(&model).expect("defaults extract");

        group.bench_with_input(BenchmarkId::new("extract", implementations), &model, |b, m| {
            b.iter(|| registry.default_args(black_box(m)).unwrap());
        });

        group.bench_with_input(BenchmarkId::new("prune", implementations), &tree, |b, t| {
            b.iter(|| {
                let mut tree = t.clone();
                remove_unused_components(black_box(&mut tree));
                tree
            });
        });

        group.bench_with_input(BenchmarkId::new("construct", implementations), &tree, |b, t| {
            b.iter(|| registry.construct(&model, black_box(t)).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_default_args);
criterion_main!(benches);
