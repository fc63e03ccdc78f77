// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Performance benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use dagmc_export::export::{collect, DagmcExporter, ExportConfig, UniqueIdRegistry};
use dagmc_export::topology::{check_model, BrepBuilder, MemoryModel};
use nalgebra::Point3;

/// A row of `count` boxes sharing one material group
fn box_row(count: usize, segments: usize) -> MemoryModel {
    let mut builder = BrepBuilder::new().with_segments(segments);
    let mut bodies = Vec::with_capacity(count);
    for i in 0..count {
        let x = i as f64 * 2.0;
        bodies.push(builder.cuboid(Point3::new(x, 0.0, 0.0), Point3::new(x + 1.0, 1.0, 1.0)));
    }
    builder.add_group(&["mat:1"], bodies.into_iter().map(Into::into).collect());
    builder.into_host()
}

fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export");
    let dir = std::env::temp_dir();

    for count in [1, 10, 100] {
        let host = box_row(count, 8);
        let config = ExportConfig {
            output_filename: dir.join(format!("dagmc-bench-{}.json", count)),
            ..Default::default()
        };
        group.bench_with_input(BenchmarkId::new("boxes", count), &host, |b, host| {
            b.iter(|| {
                DagmcExporter::new(config.clone())
                    .execute(black_box(host))
                    .unwrap()
            });
        });
    }

    group.finish();
}

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("queries");
    let host = box_row(100, 8);

    group.bench_function("collect_and_number", |b| {
        b.iter(|| UniqueIdRegistry::for_topology(&collect(black_box(&host))))
    });

    let params = ExportConfig::default().facet_params();
    group.bench_function("check_model", |b| {
        b.iter(|| check_model(black_box(&host), &params))
    });

    group.finish();
}

criterion_group!(benches, bench_export, bench_queries);
criterion_main!(benches);
