// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! JSON shapes for the precomputed cluster artifact and the exports.

use std::path::Path;

use kozaneba_cluster::{Cluster, ClusterId};
use kozaneba_layout::World;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// A rectangle as `{ x, y, w, h }`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectRecord {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl From<Rect> for RectRecord {
    fn from(r: Rect) -> Self {
        let r = r.abs();
        Self {
            x: r.x0,
            y: r.y0,
            w: r.width(),
            h: r.height(),
        }
    }
}

impl From<RectRecord> for Rect {
    fn from(r: RectRecord) -> Self {
        Self::new(r.x, r.y, r.x + r.w, r.y + r.h)
    }
}

/// World extent as `{ width, height }`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WorldRecord {
    /// Width in world units.
    pub width: f64,
    /// Height in world units.
    pub height: f64,
}

impl From<World> for WorldRecord {
    fn from(w: World) -> Self {
        Self {
            width: w.width,
            height: w.height,
        }
    }
}

impl From<WorldRecord> for World {
    fn from(w: WorldRecord) -> Self {
        Self {
            width: w.width,
            height: w.height,
        }
    }
}

/// One cluster as stored in artifacts and exports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterRecord {
    /// `C1`, `C2`, …
    pub id: String,
    /// Bounding rectangle.
    pub rect: RectRecord,
    /// Member note ids.
    pub note_ids: Vec<String>,
    /// Member texts.
    pub texts: Vec<String>,
    /// Attached summary, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
}

impl From<&Cluster> for ClusterRecord {
    fn from(c: &Cluster) -> Self {
        Self {
            id: c.id.to_string(),
            rect: c.rect.into(),
            note_ids: c.note_ids.clone(),
            texts: c.texts.clone(),
            summary: c.summary.clone(),
        }
    }
}

impl TryFrom<ClusterRecord> for Cluster {
    type Error = Error;

    fn try_from(r: ClusterRecord) -> Result<Self> {
        let id: ClusterId = r.id.parse().map_err(|e| Error::InvalidArtifact {
            message: format!("`{}`: {e}", r.id),
        })?;
        if r.note_ids.len() != r.texts.len() {
            return Err(Error::InvalidArtifact {
                message: format!("{id}: {} note ids but {} texts", r.note_ids.len(), r.texts.len()),
            });
        }
        Ok(Self {
            id,
            rect: r.rect.into(),
            note_ids: r.note_ids,
            texts: r.texts,
            summary: r.summary,
        })
    }
}

/// The precomputed cluster artifact: `{ world, clusters }`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClustersArtifact {
    /// World extent the clusters were computed in.
    pub world: WorldRecord,
    /// Clusters with their summaries.
    pub clusters: Vec<ClusterRecord>,
}

impl ClustersArtifact {
    /// Builds an artifact from a world and its clusters.
    pub fn new(world: World, clusters: &[Cluster]) -> Self {
        Self {
            world: world.into(),
            clusters: clusters.iter().map(ClusterRecord::from).collect(),
        }
    }

    /// Reads an artifact file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        read_json(path.as_ref())
    }

    /// Writes the artifact as pretty-printed JSON.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), self)
    }

    /// Converts the records back into clusters.
    pub fn into_clusters(self) -> Result<Vec<Cluster>> {
        self.clusters.into_iter().map(Cluster::try_from).collect()
    }
}

/// A committed region selection: `{ range, texts }`.
///
/// `range` is `null` when nothing was selected.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SelectionExport {
    /// World-space rectangle of the selection.
    pub range: Option<RectRecord>,
    /// Texts of the selected notes.
    pub texts: Vec<String>,
}

impl SelectionExport {
    /// Writes the export as pretty-printed JSON.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        write_json(path.as_ref(), self)
    }
}

/// An extraction run: `{ clusters }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ClustersExport {
    /// Extracted clusters.
    pub clusters: Vec<ClusterRecord>,
}

impl ClustersExport {
    /// Builds an export from clusters.
    pub fn new(clusters: &[Cluster]) -> Self {
        Self {
            clusters: clusters.iter().map(ClusterRecord::from).collect(),
        }
    }
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let mut text = serde_json::to_string_pretty(value)?;
    text.push('\n');
    std::fs::write(path, text).map_err(|e| Error::io(path, e))
}
