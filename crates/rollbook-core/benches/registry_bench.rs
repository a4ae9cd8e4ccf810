//! # Registry Benchmarks
//!
//! Performance benchmarks for rollbook-core registry operations.
//!
//! Run with: `cargo bench -p rollbook-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use rollbook_core::{Registry, Roll, StudentDraft, StudentPatch, list_sorted};
use std::hint::black_box;

/// Create a registry with N students and varied marks.
fn create_registry(size: usize) -> Registry {
    let mut registry = Registry::new();
    for i in 0..size {
        let mark = (i % 101) as i64;
        registry
            .create(StudentDraft::new(Roll(i as u64)).with_marks([mark; 5]))
            .expect("create");
    }
    registry
}

// =============================================================================
// BENCHMARKS
// =============================================================================

fn bench_create(c: &mut Criterion) {
    let mut group = c.benchmark_group("create");

    for size in [100, 1000, 10000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| black_box(create_registry(size)));
        });
    }

    group.finish();
}

fn bench_update(c: &mut Criterion) {
    let mut registry = create_registry(1000);
    let patch = StudentPatch {
        marks: [Some(88), None, Some(72), None, None],
        ..StudentPatch::default()
    };

    c.bench_function("update_single", |b| {
        b.iter(|| black_box(registry.update(Roll(500), &patch)));
    });
}

fn bench_sorted_listing(c: &mut Criterion) {
    let mut group = c.benchmark_group("list_sorted");

    for size in [100, 1000, 10000].iter() {
        let registry = create_registry(*size);
        group.bench_with_input(BenchmarkId::from_parameter(size), &registry, |b, registry| {
            b.iter(|| black_box(list_sorted(registry)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_create, bench_update, bench_sorted_listing);
criterion_main!(benches);
