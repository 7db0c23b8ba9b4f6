// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::fmt;
use std::sync::Arc;

use kozaneba_cluster::{Cluster, ClusterId, ClusterSet, extract_clusters};
use kozaneba_layout::Note;
use kozaneba_summary::{SummaryDispatcher, SummaryProvider};

/// Extracts clusters on demand and summarizes them in the background.
///
/// The service is handed to whatever triggers extraction. Summaries are
/// computed on the dispatcher's worker threads and attached later by
/// [`ClusterService::collect`]; completions that belong to an earlier
/// extraction are dropped there.
pub struct ClusterService {
    notes: Arc<[Note]>,
    dispatcher: SummaryDispatcher<ClusterId>,
}

impl fmt::Debug for ClusterService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClusterService")
            .field("notes", &self.notes.len())
            .field("pending", &self.dispatcher.pending())
            .finish_non_exhaustive()
    }
}

impl ClusterService {
    /// Creates a service over `notes` with `workers` summary threads.
    pub fn new(notes: Arc<[Note]>, provider: SummaryProvider, workers: usize) -> Self {
        Self {
            notes,
            dispatcher: SummaryDispatcher::new(Arc::new(provider), workers),
        }
    }

    /// Notes the service clusters.
    #[must_use]
    pub fn notes(&self) -> &Arc<[Note]> {
        &self.notes
    }

    /// Summaries requested but not yet collected.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.dispatcher.pending()
    }

    /// Replaces the contents of `set` with a fresh extraction and queues a
    /// summary for every cluster. Returns the new generation.
    pub fn extract(&mut self, set: &mut ClusterSet, min_size: usize) -> u64 {
        let generation = set.replace(extract_clusters(&self.notes, min_size));
        for cluster in set.clusters() {
            self.dispatcher
                .submit(cluster.id, generation, cluster.texts.clone());
        }
        generation
    }

    /// Attaches every finished summary to `set` without blocking.
    ///
    /// Returns the number of summaries attached. Completions for a previous
    /// generation or an unknown id are discarded.
    pub fn collect(&mut self, set: &mut ClusterSet) -> usize {
        attach(set, self.dispatcher.drain())
    }

    /// Extracts clusters and blocks until each one has its summary.
    ///
    /// Used for offline precomputation. Summaries still in flight from
    /// earlier calls are awaited and discarded first.
    pub fn extract_with_summaries(&mut self, min_size: usize) -> Vec<Cluster> {
        let stale = self.dispatcher.wait_all();
        if !stale.is_empty() {
            tracing::debug!(discarded = stale.len(), "dropped summaries of an earlier extraction");
        }
        let mut set = ClusterSet::new();
        self.extract(&mut set, min_size);
        let attached = attach(&mut set, self.dispatcher.wait_all());
        tracing::debug!(clusters = set.len(), attached, "clusters summarized");
        set.clusters().to_vec()
    }
}

fn attach(set: &mut ClusterSet, done: Vec<kozaneba_summary::SummaryDone<ClusterId>>) -> usize {
    let mut attached = 0;
    for d in done {
        if set.attach_summary(d.generation, d.key, d.summary) {
            attached += 1;
        } else {
            tracing::debug!(
                cluster = %d.key,
                generation = d.generation,
                current = set.generation(),
                "discarded stale summary"
            );
        }
    }
    attached
}
