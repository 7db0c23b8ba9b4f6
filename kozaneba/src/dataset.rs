// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The input dataset: notes with text and a 2D embedding coordinate.

use std::path::Path;

use kozaneba_layout::{Layout, LayoutParams, RawNote, layout_notes};
use kurbo::Point;
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One dataset entry. Unknown fields are ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DatasetRecord {
    /// Stable id.
    #[serde(alias = "id")]
    pub arg_id: String,
    /// Display text.
    #[serde(alias = "text")]
    pub argument: String,
    /// Embedding x.
    pub x: f64,
    /// Embedding y.
    pub y: f64,
}

/// A dataset: `{ "arguments": [ ... ] }`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// Entries in dataset order.
    pub arguments: Vec<DatasetRecord>,
}

impl Dataset {
    /// Reads a dataset from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let dataset = Self::from_json(&text)?;
        tracing::info!(path = %path.display(), notes = dataset.arguments.len(), "dataset loaded");
        Ok(dataset)
    }

    /// Parses a dataset from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Validated notes ready for layout.
    ///
    /// Fails on an empty dataset or a non-finite coordinate.
    pub fn raw_notes(&self) -> Result<Vec<RawNote>> {
        if self.arguments.is_empty() {
            return Err(Error::EmptyDataset);
        }
        self.arguments
            .iter()
            .map(|r| {
                if !(r.x.is_finite() && r.y.is_finite()) {
                    return Err(Error::NonFiniteCoordinate {
                        id: r.arg_id.clone(),
                    });
                }
                Ok(RawNote {
                    id: r.arg_id.clone(),
                    text: r.argument.clone(),
                    position: Point::new(r.x, r.y),
                })
            })
            .collect()
    }

    /// Places every note.
    pub fn layout(&self, params: LayoutParams) -> Result<Layout> {
        let raw = self.raw_notes()?;
        layout_notes(raw, params).ok_or(Error::EmptyDataset)
    }
}

#[cfg(test)]
mod tests {
    use kozaneba_layout::LayoutParams;

    use super::{Dataset, DatasetRecord};
    use crate::Error;

    #[test]
    fn aliases_and_extra_fields_are_accepted() {
        let json = r#"{
            "arguments": [
                { "arg_id": "a1", "argument": "first", "x": 0.5, "y": 1.0, "cluster": 3 },
                { "id": "a2", "text": "second", "x": -0.5, "y": 2.0 }
            ],
            "meta": "ignored"
        }"#;
        let dataset = Dataset::from_json(json).unwrap();
        assert_eq!(
            dataset.arguments[1],
            DatasetRecord {
                arg_id: "a2".to_owned(),
                argument: "second".to_owned(),
                x: -0.5,
                y: 2.0,
            }
        );
        let layout = dataset.layout(LayoutParams::default()).unwrap();
        assert_eq!(layout.notes.len(), 2);
        assert_eq!(layout.notes[0].id, "a1");
    }

    #[test]
    fn empty_dataset_is_an_input_error() {
        let dataset = Dataset::from_json(r#"{ "arguments": [] }"#).unwrap();
        assert!(matches!(dataset.raw_notes(), Err(Error::EmptyDataset)));
    }

    #[test]
    fn non_finite_coordinates_are_rejected() {
        let dataset = Dataset {
            arguments: vec![DatasetRecord {
                arg_id: "bad".to_owned(),
                argument: String::new(),
                x: f64::INFINITY,
                y: 0.0,
            }],
        };
        match dataset.raw_notes() {
            Err(Error::NonFiniteCoordinate { id }) => assert_eq!(id, "bad"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_fields_are_json_errors() {
        let err = Dataset::from_json(r#"{ "arguments": [ { "arg_id": "a" } ] }"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
