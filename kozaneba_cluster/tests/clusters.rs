// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for the `kozaneba_cluster` crate on laid-out datasets.
//!
//! Clusters must partition the notes, stay internally connected, and respect
//! the size threshold for every `min_size`.

use std::collections::{HashMap, HashSet};

use kozaneba_cluster::{connected_components, extract_clusters};
use kozaneba_layout::{GridCell, LayoutParams, Note, RawNote, layout_notes};
use kurbo::Point;

struct Lcg(u64);

impl Lcg {
    fn next_unit(&mut self) -> f64 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 11) as f64 / (1_u64 << 53) as f64
    }
}

fn notes(len: usize, seed: u64) -> Vec<Note> {
    let mut rng = Lcg(seed);
    let raw = (0..len)
        .map(|i| RawNote {
            id: format!("n{i}"),
            text: format!("text {i}"),
            position: Point::new(rng.next_unit(), rng.next_unit()),
        })
        .collect();
    layout_notes(raw, LayoutParams::default()).unwrap().notes
}

#[test]
fn clusters_are_disjoint() {
    let notes = notes(600, 3);
    let clusters = extract_clusters(&notes, 2);
    let mut seen = HashSet::new();
    for cluster in &clusters {
        for id in &cluster.note_ids {
            assert!(seen.insert(id.clone()), "{id} is in two clusters");
        }
    }
}

#[test]
fn every_member_touches_another_member() {
    let notes = notes(600, 5);
    let cell_of: HashMap<&str, GridCell> =
        notes.iter().map(|n| (n.id.as_str(), n.cell)).collect();
    for cluster in extract_clusters(&notes, 2) {
        let cells: HashSet<GridCell> = cluster
            .note_ids
            .iter()
            .map(|id| cell_of[id.as_str()])
            .collect();
        for cell in &cells {
            let touching = [(1, 0), (-1, 0), (0, 1), (0, -1)]
                .iter()
                .any(|&(dx, dy)| cells.contains(&cell.offset(dx, dy)));
            assert!(touching, "{} in {} has no 4-neighbor", cell, cluster.id);
        }
    }
}

#[test]
fn threshold_keeps_exactly_the_large_components() {
    let notes = notes(400, 11);
    let components = connected_components(&notes);
    assert_eq!(
        components.iter().map(Vec::len).sum::<usize>(),
        notes.len(),
        "components must cover every note"
    );
    for min_size in 1..=12 {
        let clusters = extract_clusters(&notes, min_size);
        assert!(clusters.iter().all(|c| c.len() >= min_size));
        let expected = components.iter().filter(|c| c.len() >= min_size).count();
        assert_eq!(clusters.len(), expected, "min_size {min_size}");
    }
}

#[test]
fn bounding_rect_is_tight() {
    let notes = notes(300, 13);
    let rect_of: HashMap<&str, kurbo::Rect> =
        notes.iter().map(|n| (n.id.as_str(), n.rect)).collect();
    for cluster in extract_clusters(&notes, 3) {
        let rects: Vec<kurbo::Rect> = cluster
            .note_ids
            .iter()
            .map(|id| rect_of[id.as_str()])
            .collect();
        let min_x = rects.iter().map(|r| r.x0).fold(f64::INFINITY, f64::min);
        let max_y = rects.iter().map(|r| r.y1).fold(f64::NEG_INFINITY, f64::max);
        assert_eq!(cluster.rect.x0, min_x);
        assert_eq!(cluster.rect.y1, max_y);
        for r in rects {
            assert!(cluster.rect.x0 <= r.x0 && cluster.rect.y0 <= r.y0);
            assert!(cluster.rect.x1 >= r.x1 && cluster.rect.y1 >= r.y1);
        }
    }
}

#[test]
fn extraction_is_reproducible() {
    let notes = notes(500, 17);
    assert_eq!(extract_clusters(&notes, 4), extract_clusters(&notes, 4));
}
