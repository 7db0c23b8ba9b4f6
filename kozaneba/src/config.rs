// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Runtime configuration, loaded from JSON.
//!
//! Every field has a default, so a configuration file only needs the values
//! it changes:
//!
//! ```
//! use kozaneba::Config;
//!
//! let config: Config = serde_json::from_str(r#"{ "clusters": { "min_size": 4 } }"#).unwrap();
//! assert_eq!(config.clusters.min_size, 4);
//! assert_eq!(config.layout.note_size, 120.0);
//! ```
//!
//! The hosted summarizer's API key is never part of the file; it is read from
//! the environment variable named by `summary.api_key_env`.

use std::path::Path;
use std::time::Duration;

use kozaneba_layout::{LayoutParams, NOTE_SIZE, POSITION_SCALE, PlacementParams, SEARCH_RADIUS_LIMIT};
use kozaneba_summary::{
    DEFAULT_API_KEY_ENV, DEFAULT_ENDPOINT, DEFAULT_MAX_INPUT_CHARS, DEFAULT_MODEL,
    OpenRouterConfig, OpenRouterSummarizer, SummaryProvider,
};
use kozaneba_view2d::{CanvasOptions, ClusterStyle, Easing, Modifiers, NoteTextStyle};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Top-level configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Placement settings.
    pub layout: LayoutConfig,
    /// Cluster extraction settings.
    pub clusters: ClusterConfig,
    /// Canvas interaction settings.
    pub view: ViewConfig,
    /// Summarization settings.
    pub summary: SummaryConfig,
}

/// Placement settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Multiplier applied to shifted embedding coordinates.
    pub position_scale: f64,
    /// Edge length of a note and of a grid cell.
    pub note_size: f64,
    /// Number of rings searched for a free cell.
    pub search_radius_limit: u32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            position_scale: POSITION_SCALE,
            note_size: NOTE_SIZE,
            search_radius_limit: SEARCH_RADIUS_LIMIT,
        }
    }
}

/// Cluster extraction settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterConfig {
    /// Smallest component kept as a cluster.
    pub min_size: usize,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            min_size: kozaneba_cluster::DEFAULT_MIN_CLUSTER_SIZE,
        }
    }
}

/// Modifier key that turns a drag into a rectangle selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionModifier {
    /// Shift.
    #[default]
    Shift,
    /// Control.
    Control,
    /// Alt / Option.
    Alt,
    /// Meta / Command.
    Meta,
}

impl From<SelectionModifier> for Modifiers {
    fn from(m: SelectionModifier) -> Self {
        match m {
            SelectionModifier::Shift => Self::SHIFT,
            SelectionModifier::Control => Self::CONTROL,
            SelectionModifier::Alt => Self::ALT,
            SelectionModifier::Meta => Self::META,
        }
    }
}

/// Canvas interaction settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewConfig {
    /// Upper zoom bound.
    pub max_zoom: f64,
    /// Lower zoom bound before the world is fitted.
    pub initial_min_zoom: f64,
    /// Fraction of the view filled by the world after a reset.
    pub fit_margin: f64,
    /// Wheel factor for scrolling up.
    pub wheel_zoom_in: f64,
    /// Wheel factor for scrolling down.
    pub wheel_zoom_out: f64,
    /// Zoom button factor.
    pub button_zoom_factor: f64,
    /// Fraction of the remaining distance eased per frame.
    pub easing_factor: f64,
    /// Zoom snap threshold.
    pub scale_epsilon: f64,
    /// Pan snap threshold in pixels.
    pub pan_epsilon: f64,
    /// Minimum on-screen note width for drawing text.
    pub text_min_screen_width: f64,
    /// Selection modifier.
    pub selection_modifier: SelectionModifier,
}

impl Default for ViewConfig {
    fn default() -> Self {
        let options = CanvasOptions::default();
        Self {
            max_zoom: options.max_zoom,
            initial_min_zoom: options.initial_min_zoom,
            fit_margin: options.fit_margin,
            wheel_zoom_in: options.wheel_zoom_in,
            wheel_zoom_out: options.wheel_zoom_out,
            button_zoom_factor: options.button_zoom_factor,
            easing_factor: options.easing.factor,
            scale_epsilon: options.easing.scale_epsilon,
            pan_epsilon: options.easing.pan_epsilon,
            text_min_screen_width: options.text_min_screen_width,
            selection_modifier: SelectionModifier::Shift,
        }
    }
}

/// Summarization settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Ask for hosted summaries. A configured API key enables them as well.
    pub use_openrouter: bool,
    /// Hosted model id.
    pub model: String,
    /// Completion token budget.
    pub max_tokens: u32,
    /// Sampling temperature.
    pub temperature: f32,
    /// Corpus character budget.
    pub max_input_chars: usize,
    /// Chat completions endpoint.
    pub endpoint: String,
    /// Whole-request timeout in seconds.
    pub timeout_secs: u64,
    /// Summary worker threads.
    pub workers: usize,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            use_openrouter: false,
            model: DEFAULT_MODEL.to_owned(),
            max_tokens: 600,
            temperature: 0.2,
            max_input_chars: DEFAULT_MAX_INPUT_CHARS,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout_secs: 60,
            workers: 4,
            api_key_env: DEFAULT_API_KEY_ENV.to_owned(),
        }
    }
}

impl Config {
    /// Reads and validates a JSON configuration file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let config: Self = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is in range.
    pub fn validate(&self) -> Result<()> {
        let positive = |name: &str, v: f64| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(Error::config(format!("{name} must be a positive number, got {v}")))
            }
        };
        positive("layout.position_scale", self.layout.position_scale)?;
        positive("layout.note_size", self.layout.note_size)?;
        positive("view.max_zoom", self.view.max_zoom)?;
        positive("view.initial_min_zoom", self.view.initial_min_zoom)?;
        positive("view.wheel_zoom_in", self.view.wheel_zoom_in)?;
        positive("view.wheel_zoom_out", self.view.wheel_zoom_out)?;
        positive("view.button_zoom_factor", self.view.button_zoom_factor)?;
        if self.layout.search_radius_limit == 0 {
            return Err(Error::config("layout.search_radius_limit must be at least 1"));
        }
        if self.clusters.min_size == 0 {
            return Err(Error::config("clusters.min_size must be at least 1"));
        }
        if !(self.view.fit_margin > 0.0 && self.view.fit_margin <= 1.0) {
            return Err(Error::config("view.fit_margin must be in (0, 1]"));
        }
        if !(self.view.easing_factor > 0.0 && self.view.easing_factor <= 1.0) {
            return Err(Error::config("view.easing_factor must be in (0, 1]"));
        }
        if self.summary.workers == 0 {
            return Err(Error::config("summary.workers must be at least 1"));
        }
        Ok(())
    }

    /// Placement parameters.
    #[must_use]
    pub fn layout_params(&self) -> LayoutParams {
        LayoutParams {
            position_scale: self.layout.position_scale,
            placement: PlacementParams {
                cell_size: self.layout.note_size,
                search_radius_limit: self.layout.search_radius_limit,
            },
        }
    }

    /// Canvas options, with the given cluster style.
    #[must_use]
    pub fn canvas_options(&self, cluster_style: ClusterStyle) -> CanvasOptions {
        let v = &self.view;
        CanvasOptions {
            note_text: NoteTextStyle::default(),
            text_min_screen_width: v.text_min_screen_width,
            wheel_zoom_in: v.wheel_zoom_in,
            wheel_zoom_out: v.wheel_zoom_out,
            button_zoom_factor: v.button_zoom_factor,
            fit_margin: v.fit_margin,
            max_zoom: v.max_zoom,
            initial_min_zoom: v.initial_min_zoom,
            easing: Easing {
                factor: v.easing_factor,
                scale_epsilon: v.scale_epsilon,
                pan_epsilon: v.pan_epsilon,
            },
            selection_modifier: v.selection_modifier.into(),
            cluster_style,
        }
    }
}

impl SummaryConfig {
    /// Hosted summarizer settings with the given API key.
    pub fn openrouter_config(&self, api_key: impl Into<String>) -> OpenRouterConfig {
        OpenRouterConfig {
            endpoint: self.endpoint.clone(),
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            max_input_chars: self.max_input_chars,
            timeout: Duration::from_secs(self.timeout_secs),
            api_key: api_key.into(),
        }
    }

    /// Builds the summary provider.
    ///
    /// The hosted summarizer is used whenever its API key is present in the
    /// environment. If hosted summaries were requested but the key is
    /// missing, a warning is logged and only local summaries are produced.
    #[must_use]
    pub fn provider(&self) -> SummaryProvider {
        match OpenRouterConfig::from_env(&self.api_key_env) {
            Ok(env) => {
                tracing::info!(model = %self.model, "using hosted summaries");
                SummaryProvider::with_external(OpenRouterSummarizer::new(
                    self.openrouter_config(env.api_key),
                ))
            }
            Err(err) => {
                if self.use_openrouter {
                    tracing::warn!(error = %err, "hosted summaries unavailable, using local summaries");
                }
                SummaryProvider::local()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use kozaneba_view2d::{ClusterStyle, Modifiers};

    use super::{Config, SelectionModifier};

    #[test]
    fn defaults_match_canvas_defaults() {
        let config = Config::default();
        config.validate().unwrap();
        let options = config.canvas_options(ClusterStyle::Outline);
        assert_eq!(options, kozaneba_view2d::CanvasOptions::default());
        assert_eq!(config.layout_params(), kozaneba_layout::LayoutParams::default());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let config: Config =
            serde_json::from_str(r#"{ "view": { "selection_modifier": "alt", "max_zoom": 3 } }"#)
                .unwrap();
        assert_eq!(config.view.selection_modifier, SelectionModifier::Alt);
        assert_eq!(config.view.max_zoom, 3.0);
        assert_eq!(config.view.fit_margin, 0.92);
        assert_eq!(
            config.canvas_options(ClusterStyle::Sticky).selection_modifier,
            Modifiers::ALT
        );
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let mut config = Config::default();
        config.clusters.min_size = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.view.fit_margin = 1.5;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.layout.note_size = f64::NAN;
        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("layout.note_size"), "{err}");
    }

    #[test]
    fn missing_key_means_local_provider() {
        let mut config = Config::default();
        config.summary.use_openrouter = true;
        config.summary.api_key_env = "KOZANEBA_TEST_KEY_THAT_IS_NEVER_SET".to_owned();
        assert!(!config.summary.provider().has_external());
    }
}
