// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kozaneba_view2d::{Backend, FlatBackend, GridBackend, NoteIndex};
use kurbo::Rect;

const CELL: f64 = 120.0;

fn gen_grid_rects(n: usize) -> Vec<Rect> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * CELL;
            let y0 = y as f64 * CELL;
            out.push(Rect::new(x0, y0, x0 + CELL, y0 + CELL));
        }
    }
    out
}

/// A screenful of view windows panned across the world.
fn gen_windows(n: usize, span: f64) -> Vec<Rect> {
    let world = n as f64 * CELL;
    (0..16)
        .map(|i| {
            let t = f64::from(i) / 16.0;
            let x0 = t * (world - span).max(0.0);
            let y0 = (1.0 - t) * (world - span).max(0.0);
            Rect::new(x0, y0, x0 + span, y0 + span * 0.75)
        })
        .collect()
}

fn bench_queries<B: Backend>(b: &mut criterion::Bencher<'_>, index: &NoteIndex<B>, windows: &[Rect]) {
    b.iter(|| {
        let mut total = 0;
        for w in windows {
            total += index.visible(black_box(*w)).len();
        }
        total
    });
}

fn bench_visible(c: &mut Criterion) {
    let mut group = c.benchmark_group("visible");
    for &n in &[64usize, 256] {
        let rects = gen_grid_rects(n);
        let windows = gen_windows(n, 1600.0);
        group.throughput(Throughput::Elements(windows.len() as u64));

        let flat = NoteIndex::with_backend(FlatBackend::default(), rects.iter().copied());
        group.bench_function(BenchmarkId::new("Flat", n * n), |b| {
            bench_queries(b, &flat, &windows);
        });
        let grid = NoteIndex::with_backend(GridBackend::new(CELL), rects.iter().copied());
        group.bench_function(BenchmarkId::new("Grid", n * n), |b| {
            bench_queries(b, &grid, &windows);
        });
    }
    group.finish();
}

fn bench_contained(c: &mut Criterion) {
    let rects = gen_grid_rects(256);
    let index = NoteIndex::grid(CELL, rects.iter().copied());
    let region = Rect::new(3000.0, 3000.0, 9000.0, 7000.0);
    c.bench_function("contained/Grid/65536", |b| {
        b.iter(|| index.contained(black_box(region)).len());
    });
}

criterion_group!(benches, bench_visible, bench_contained);
criterion_main!(benches);
