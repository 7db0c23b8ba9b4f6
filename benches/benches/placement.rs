// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kozaneba_cluster::extract_clusters;
use kozaneba_layout::{LayoutParams, RawNote, layout_notes};
use kurbo::Point;

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

/// Embedding-like input: dense blobs around a few centres, so many notes
/// collide on the same cell and the ring search does real work.
fn gen_blobs(count: usize, blobs: usize, spread: f64) -> Vec<RawNote> {
    let mut rng = Rng::new(0x5EED_0F_B10B);
    let centers: Vec<(f64, f64)> = (0..blobs)
        .map(|_| (rng.next_f64() * 10.0, rng.next_f64() * 10.0))
        .collect();
    (0..count)
        .map(|i| {
            let (cx, cy) = centers[i % blobs];
            RawNote {
                id: format!("n{i}"),
                text: format!("note {i}"),
                position: Point::new(
                    cx + (rng.next_f64() - 0.5) * spread,
                    cy + (rng.next_f64() - 0.5) * spread,
                ),
            }
        })
        .collect()
}

fn bench_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_notes");
    for &n in &[1_000usize, 10_000] {
        let raw = gen_blobs(n, 8, 0.4);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::new("blobs", n), |b| {
            b.iter(|| layout_notes(black_box(raw.clone()), LayoutParams::default()));
        });
    }
    group.finish();
}

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract_clusters");
    for &n in &[1_000usize, 10_000] {
        let Some(layout) = layout_notes(gen_blobs(n, 8, 0.4), LayoutParams::default()) else {
            continue;
        };
        group.throughput(Throughput::Elements(n as u64));
        group.bench_function(BenchmarkId::new("min10", n), |b| {
            b.iter(|| extract_clusters(black_box(&layout.notes), 10));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_layout, bench_extract);
criterion_main!(benches);
