// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use kozaneba_layout::Note;
use kurbo::Rect;

/// Sequential cluster identifier, displayed as `C1`, `C2`, …
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClusterId(u32);

impl ClusterId {
    /// Creates the id with sequence number `n` (1-based).
    #[must_use]
    pub const fn new(n: u32) -> Self {
        Self(n)
    }

    /// Returns the sequence number.
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Error returned when a string is not of the form `C<n>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseClusterIdError;

impl fmt::Display for ParseClusterIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("cluster id must look like `C<number>`")
    }
}

impl core::error::Error for ParseClusterIdError {}

impl FromStr for ClusterId {
    type Err = ParseClusterIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.strip_prefix('C')
            .and_then(|n| n.parse().ok())
            .map(Self)
            .ok_or(ParseClusterIdError)
    }
}

/// A group of 4-connected notes.
#[derive(Clone, Debug, PartialEq)]
pub struct Cluster {
    /// Sequential id.
    pub id: ClusterId,
    /// Tight bounding box around every member's pixel rectangle.
    pub rect: Rect,
    /// Member note ids, in traversal order.
    pub note_ids: Vec<String>,
    /// Member texts, parallel to `note_ids`.
    pub texts: Vec<String>,
    /// Summary, attached asynchronously after extraction.
    pub summary: Option<String>,
}

impl Cluster {
    /// Builds a cluster from note indices, preserving their order.
    ///
    /// `members` must be non-empty.
    pub(crate) fn from_members(id: ClusterId, notes: &[Note], members: &[usize]) -> Self {
        let rect = members
            .iter()
            .map(|&i| notes[i].rect)
            .reduce(|acc, r| acc.union(r))
            .unwrap_or(Rect::ZERO);
        Self {
            id,
            rect,
            note_ids: members.iter().map(|&i| notes[i].id.clone()).collect(),
            texts: members.iter().map(|&i| notes[i].text.clone()).collect(),
            summary: None,
        }
    }

    /// Number of member notes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.note_ids.len()
    }

    /// Returns `true` if the cluster has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.note_ids.is_empty()
    }
}

/// The current cluster set plus a generation counter.
///
/// Every [`ClusterSet::replace`] starts a new generation. Summaries computed
/// for an older generation are refused by [`ClusterSet::attach_summary`], so a
/// slow response can never land on a cluster from a later extraction that
/// happens to reuse its id.
#[derive(Clone, Debug, Default)]
pub struct ClusterSet {
    generation: u64,
    clusters: Vec<Cluster>,
}

impl ClusterSet {
    /// Creates an empty set at generation `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            generation: 0,
            clusters: Vec::new(),
        }
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Current clusters, in id order.
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Number of clusters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    /// Returns `true` if there are no clusters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Looks up a cluster by id.
    #[must_use]
    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.id == id)
    }

    /// Replaces the whole set and returns the new generation.
    pub fn replace(&mut self, clusters: Vec<Cluster>) -> u64 {
        self.generation += 1;
        self.clusters = clusters;
        self.generation
    }

    /// Attaches `summary` to cluster `id` if `generation` is still current.
    ///
    /// Returns `false` (and changes nothing) for stale generations or ids that
    /// are not in the set.
    pub fn attach_summary(&mut self, generation: u64, id: ClusterId, summary: String) -> bool {
        if generation != self.generation {
            return false;
        }
        match self.clusters.iter_mut().find(|c| c.id == id) {
            Some(cluster) => {
                cluster.summary = Some(summary);
                true
            }
            None => false,
        }
    }

    /// Clusters that do not have a summary yet.
    pub fn pending(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.iter().filter(|c| c.summary.is_none())
    }
}
