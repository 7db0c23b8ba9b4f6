// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Breadth-first extraction of 4-connected note components.

use alloc::collections::VecDeque;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use kozaneba_layout::{GridCell, Note};

use crate::cluster::{Cluster, ClusterId};

/// Default minimum number of notes a component needs to become a cluster.
pub const DEFAULT_MIN_CLUSTER_SIZE: usize = 10;

/// Neighbor offsets visited from each cell, in this order.
const NEIGHBORS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

/// Splits the notes into 4-connected components of occupied grid cells.
///
/// Components are discovered by scanning `notes` in order and starting a
/// breadth-first traversal from every note whose cell has not been reached
/// yet. Each component lists note indices in visitation order, so both the
/// component order and the member order are reproducible.
///
/// Adjacency is over grid cells (N/S/E/W), not pixel rectangles. If two notes
/// share a cell (the placement overflow case), the later one answers for the
/// cell when it is reached through a neighbor.
#[must_use]
pub fn connected_components(notes: &[Note]) -> Vec<Vec<usize>> {
    let by_cell: HashMap<GridCell, usize> = notes
        .iter()
        .enumerate()
        .map(|(index, note)| (note.cell, index))
        .collect();
    let mut seen: HashSet<GridCell> = HashSet::with_capacity(notes.len());
    let mut queue = VecDeque::new();
    let mut components = Vec::new();

    for (start, note) in notes.iter().enumerate() {
        if !seen.insert(note.cell) {
            continue;
        }
        queue.push_back(start);
        let mut component = Vec::new();
        while let Some(index) = queue.pop_front() {
            component.push(index);
            let cell = notes[index].cell;
            for (dx, dy) in NEIGHBORS {
                let next = cell.offset(dx, dy);
                if let Some(&neighbor) = by_cell.get(&next)
                    && seen.insert(next)
                {
                    queue.push_back(neighbor);
                }
            }
        }
        components.push(component);
    }
    components
}

/// Extracts every connected component with at least `min_size` notes.
///
/// Clusters are numbered `C1`, `C2`, … in discovery order. Smaller components
/// are dropped; their notes stay visible individually. A `min_size` of zero is
/// treated as one.
///
/// ```rust
/// use kozaneba_cluster::extract_clusters;
/// # use kozaneba_layout::{GridCell, Note, NoteColor};
/// # use kurbo::Point;
/// # fn note(x: i32, y: i32) -> Note {
/// #     let cell = GridCell::new(x, y);
/// #     Note {
/// #         id: format!("{x},{y}"),
/// #         text: String::new(),
/// #         embedding: Point::ORIGIN,
/// #         color: NoteColor::for_index(0),
/// #         cell,
/// #         rect: cell.rect(120.0),
/// #     }
/// # }
///
/// let notes = [note(0, 0), note(1, 0), note(0, 1), note(5, 5)];
/// let clusters = extract_clusters(&notes, 3);
/// assert_eq!(clusters.len(), 1);
/// assert_eq!(clusters[0].id.to_string(), "C1");
/// assert_eq!(clusters[0].note_ids, ["0,0", "1,0", "0,1"]);
/// ```
#[must_use]
pub fn extract_clusters(notes: &[Note], min_size: usize) -> Vec<Cluster> {
    let min_size = min_size.max(1);
    let components = connected_components(notes);
    let total = components.len();
    let clusters: Vec<Cluster> = components
        .into_iter()
        .filter(|members| members.len() >= min_size)
        .zip(1_u32..)
        .map(|(members, n)| Cluster::from_members(ClusterId::new(n), notes, &members))
        .collect();
    tracing::debug!(
        components = total,
        clusters = clusters.len(),
        min_size,
        "extracted connected clusters"
    );
    clusters
}

#[cfg(test)]
mod tests {
    use alloc::format;
    use alloc::string::String;
    use alloc::vec::Vec;

    use kozaneba_layout::{GridCell, Note, NoteColor};
    use kurbo::{Point, Rect};

    use super::{connected_components, extract_clusters};

    fn note(x: i32, y: i32) -> Note {
        let cell = GridCell::new(x, y);
        Note {
            id: format!("{x},{y}"),
            text: format!("text {x} {y}"),
            embedding: Point::ORIGIN,
            color: NoteColor::for_index(0),
            cell,
            rect: cell.rect(120.0),
        }
    }

    #[test]
    fn l_shape_forms_one_cluster_and_isolated_note_is_dropped() {
        let notes = [note(0, 0), note(1, 0), note(0, 1), note(5, 5)];
        let clusters = extract_clusters(&notes, 3);
        assert_eq!(clusters.len(), 1);
        let c = &clusters[0];
        assert_eq!(c.note_ids, ["0,0", "1,0", "0,1"]);
        assert_eq!(c.texts, ["text 0 0", "text 1 0", "text 0 1"]);
        assert_eq!(c.rect, Rect::new(0.0, 0.0, 240.0, 240.0));
        assert!(c.summary.is_none());
    }

    #[test]
    fn diagonal_cells_are_not_connected() {
        let notes = [note(0, 0), note(1, 1), note(2, 2)];
        let components = connected_components(&notes);
        assert_eq!(components.len(), 3);
        assert!(extract_clusters(&notes, 2).is_empty());
    }

    #[test]
    fn members_follow_breadth_first_order_from_the_first_note() {
        // A plus sign discovered from its east arm: east, then the centre, then
        // the centre's neighbors in E/W/S/N order.
        let notes = [note(2, 1), note(1, 1), note(0, 1), note(1, 2), note(1, 0)];
        let components = connected_components(&notes);
        assert_eq!(components, [[0, 1, 2, 3, 4]]);
    }

    #[test]
    fn ids_follow_discovery_order_of_kept_clusters() {
        let mut notes: Vec<Note> = Vec::new();
        // Small component first, then two large ones.
        notes.push(note(100, 100));
        notes.extend((0..3).map(|i| note(i, 0)));
        notes.extend((0..4).map(|i| note(i, 10)));
        let clusters = extract_clusters(&notes, 3);
        let ids: Vec<String> = clusters.iter().map(|c| format!("{}", c.id)).collect();
        assert_eq!(ids, ["C1", "C2"]);
        assert_eq!(clusters[0].len(), 3);
        assert_eq!(clusters[1].len(), 4);
    }

    #[test]
    fn zero_min_size_behaves_like_one() {
        let notes = [note(0, 0), note(3, 3)];
        assert_eq!(extract_clusters(&notes, 0).len(), 2);
    }
}
