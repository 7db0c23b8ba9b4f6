// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::sync::Arc;

use kozaneba_cluster::{Cluster, ClusterSet};
use kozaneba_layout::{Layout, Note};
use kozaneba_summary::{SummaryProvider, cluster_title};
use kozaneba_view2d::{
    CanvasEvent, CanvasView, ClusterOverlay, ClusterStyle, ColumnMeasure, EventOutcome, Scene,
    TextMeasure,
};
use kurbo::Rect;

use crate::artifact::{ClustersArtifact, ClustersExport, RectRecord, SelectionExport};
use crate::{ClusterService, Config, Result};

/// One open dataset: the canvas, the current clusters and the service that
/// keeps them summarized.
///
/// The host forwards input to [`Session::handle`] and calls
/// [`Session::tick`] once per display refresh. Summaries finishing in the
/// background are picked up by `tick` and show up as cluster titles.
#[derive(Debug)]
pub struct Session<M: TextMeasure = ColumnMeasure> {
    canvas: CanvasView<M>,
    clusters: ClusterSet,
    service: ClusterService,
    min_size: usize,
}

impl<M: TextMeasure> Session<M> {
    /// Opens `layout` in a canvas covering `view_rect`.
    pub fn new(
        layout: Layout,
        view_rect: Rect,
        config: &Config,
        cluster_style: ClusterStyle,
        measure: M,
        provider: SummaryProvider,
    ) -> Self {
        let notes: Arc<[Note]> = layout.notes.into();
        let canvas = CanvasView::new(
            Arc::clone(&notes),
            layout.world,
            view_rect,
            config.canvas_options(cluster_style),
            measure,
        );
        Self {
            canvas,
            clusters: ClusterSet::new(),
            service: ClusterService::new(notes, provider, config.summary.workers),
            min_size: config.clusters.min_size,
        }
    }

    /// The canvas.
    #[must_use]
    pub fn canvas(&self) -> &CanvasView<M> {
        &self.canvas
    }

    /// The canvas, for direct control (zoom buttons, style, resets).
    pub fn canvas_mut(&mut self) -> &mut CanvasView<M> {
        &mut self.canvas
    }

    /// Current clusters.
    #[must_use]
    pub fn clusters(&self) -> &ClusterSet {
        &self.clusters
    }

    /// Summaries still being computed.
    #[must_use]
    pub fn summaries_pending(&self) -> usize {
        self.service.pending()
    }

    /// Shows clusters computed elsewhere, replacing the current set.
    pub fn load_clusters(&mut self, clusters: Vec<Cluster>) -> u64 {
        let generation = self.clusters.replace(clusters);
        self.refresh_overlays();
        generation
    }

    /// Shows the clusters of a precomputed artifact.
    pub fn load_artifact(&mut self, artifact: ClustersArtifact) -> Result<u64> {
        Ok(self.load_clusters(artifact.into_clusters()?))
    }

    /// Extracts clusters now, with `min_size` or the configured minimum.
    ///
    /// Returns the new generation. The clusters are drawn at once; their
    /// summaries arrive over the following ticks.
    pub fn extract_clusters(&mut self, min_size: Option<usize>) -> u64 {
        let min_size = min_size.unwrap_or(self.min_size);
        let generation = self.service.extract(&mut self.clusters, min_size);
        self.refresh_overlays();
        generation
    }

    /// Forwards an input event to the canvas.
    pub fn handle(&mut self, event: CanvasEvent) -> EventOutcome {
        self.canvas.handle(event)
    }

    /// Collects finished summaries and runs one canvas frame.
    pub fn tick(&mut self) -> Option<Scene> {
        if self.service.collect(&mut self.clusters) > 0 {
            self.refresh_overlays();
        }
        self.canvas.tick()
    }

    /// The committed selection as an export.
    #[must_use]
    pub fn selection_export(&self) -> SelectionExport {
        SelectionExport {
            range: self
                .canvas
                .selection()
                .map(|s| RectRecord::from(s.world_rect)),
            texts: self
                .canvas
                .selection_texts()
                .into_iter()
                .map(str::to_owned)
                .collect(),
        }
    }

    /// The current clusters as an export.
    #[must_use]
    pub fn clusters_export(&self) -> ClustersExport {
        ClustersExport::new(self.clusters.clusters())
    }

    fn refresh_overlays(&mut self) {
        let overlays = self
            .clusters
            .clusters()
            .iter()
            .map(|c| ClusterOverlay {
                rect: c.rect,
                title: c.summary.as_deref().and_then(cluster_title),
            })
            .collect();
        self.canvas.set_cluster_overlays(overlays);
    }
}
