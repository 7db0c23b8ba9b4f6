// Copyright 2025 the Kozaneba Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! `kozaneba`: offline tools around a Kozaneba dataset.
//!
//! - `precompute` extracts and summarizes clusters into an artifact file.
//! - `select` exports the notes inside a world-space rectangle.
//! - `render` draws one settled canvas frame as SVG.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use kozaneba::summary::SummaryProvider;
use kozaneba::view2d::{ClusterStyle, ColumnMeasure, Scene};
use kozaneba::{ClusterService, ClustersArtifact, Config, Dataset, Session};
use kurbo::Rect;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt as _;
use tracing_subscriber::util::SubscriberInitExt as _;

/// Frames rendered at most while waiting for the view to settle.
const MAX_FRAMES: usize = 10_000;

#[derive(Parser)]
#[command(name = "kozaneba", version, about = "Lay out, cluster and render Kozaneba notes")]
struct Cli {
    /// More logging (`-v` info, `-vv` debug). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
    /// JSON configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract clusters, summarize them and write the artifact.
    Precompute {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output: PathBuf,
        /// Smallest component kept as a cluster.
        #[arg(long)]
        min_size: Option<usize>,
        /// Ask for hosted summaries (needs the API key in the environment).
        #[arg(long)]
        use_openrouter: bool,
        #[arg(long)]
        or_model: Option<String>,
        #[arg(long)]
        or_max_tokens: Option<u32>,
    },
    /// Export the notes lying inside a world-space rectangle.
    Select {
        #[arg(long)]
        input: PathBuf,
        /// `x,y,w,h` in world units.
        #[arg(long, value_parser = parse_rect)]
        rect: Rect,
        /// Output file; stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Render one frame of the canvas as SVG.
    Render {
        #[arg(long)]
        input: PathBuf,
        /// Precomputed cluster artifact.
        #[arg(long)]
        clusters: Option<PathBuf>,
        /// Extract clusters on demand when no artifact is given.
        #[arg(long)]
        extract: bool,
        #[arg(long, default_value_t = 1280.0)]
        width: f64,
        #[arg(long, default_value_t = 800.0)]
        height: f64,
        /// Zoom button presses applied after the initial fit.
        #[arg(long, default_value_t = 0)]
        zoom_in: u32,
        #[arg(long, value_enum, default_value_t = StyleArg::Outline)]
        style: StyleArg,
        #[arg(long)]
        output: PathBuf,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum StyleArg {
    Outline,
    Sticky,
}

impl From<StyleArg> for ClusterStyle {
    fn from(s: StyleArg) -> Self {
        match s {
            StyleArg::Outline => Self::Outline,
            StyleArg::Sticky => Self::Sticky,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => Config::from_path(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Precompute {
            input,
            output,
            min_size,
            use_openrouter,
            or_model,
            or_max_tokens,
        } => {
            if let Some(min_size) = min_size {
                config.clusters.min_size = min_size;
            }
            config.summary.use_openrouter |= use_openrouter;
            if let Some(model) = or_model {
                config.summary.model = model;
            }
            if let Some(max_tokens) = or_max_tokens {
                config.summary.max_tokens = max_tokens;
            }
            config.validate()?;
            precompute(&config, &input, &output)
        }
        Commands::Select {
            input,
            rect,
            output,
        } => select(&config, &input, rect, output.as_deref()),
        Commands::Render {
            input,
            clusters,
            extract,
            width,
            height,
            zoom_in,
            style,
            output,
        } => {
            if !(width > 0.0 && height > 0.0) {
                bail!("--width and --height must be positive");
            }
            let mut session = open_session(
                &config,
                &input,
                Rect::new(0.0, 0.0, width, height),
                style.into(),
            )?;
            if let Some(path) = clusters {
                let artifact = ClustersArtifact::from_path(&path)
                    .with_context(|| format!("loading clusters {}", path.display()))?;
                session.load_artifact(artifact)?;
            } else if extract {
                session.extract_clusters(None);
            }
            for _ in 0..zoom_in {
                session.canvas_mut().zoom_in();
            }
            let scene = settle(&mut session).context("no frame was rendered")?;
            std::fs::write(&output, scene.to_svg())
                .with_context(|| format!("writing {}", output.display()))?;
            tracing::info!(
                path = %output.display(),
                visible = scene.visible_count(),
                "frame written"
            );
            Ok(())
        }
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn precompute(config: &Config, input: &Path, output: &Path) -> Result<()> {
    let layout = load_dataset(input)?.layout(config.layout_params())?;
    let world = layout.world;
    let mut service = ClusterService::new(
        layout.notes.into(),
        config.summary.provider(),
        config.summary.workers,
    );
    let clusters = service.extract_with_summaries(config.clusters.min_size);
    ClustersArtifact::new(world, &clusters).write(output)?;
    println!("Wrote {} clusters to {}", clusters.len(), output.display());
    Ok(())
}

fn select(config: &Config, input: &Path, rect: Rect, output: Option<&Path>) -> Result<()> {
    // The view rectangle is irrelevant here; selection works in world space.
    let mut session = open_session(
        config,
        input,
        Rect::new(0.0, 0.0, 1.0, 1.0),
        ClusterStyle::Outline,
    )?;
    session.canvas_mut().select_region(rect);
    let export = session.selection_export();
    match output {
        Some(path) => export.write(path)?,
        None => println!("{}", serde_json::to_string_pretty(&export)?),
    }
    Ok(())
}

fn open_session(
    config: &Config,
    input: &Path,
    view_rect: Rect,
    style: ClusterStyle,
) -> Result<Session> {
    let layout = load_dataset(input)?.layout(config.layout_params())?;
    Ok(Session::new(
        layout,
        view_rect,
        config,
        style,
        ColumnMeasure::default(),
        SummaryProvider::local(),
    ))
}

fn load_dataset(path: &Path) -> Result<Dataset> {
    Dataset::from_path(path).with_context(|| format!("loading dataset {}", path.display()))
}

/// Ticks until the view has settled and every summary has arrived.
fn settle(session: &mut Session) -> Option<Scene> {
    let mut last = None;
    for _ in 0..MAX_FRAMES {
        match session.tick() {
            Some(scene) => last = Some(scene),
            None if session.summaries_pending() == 0 => break,
            None => std::thread::sleep(Duration::from_millis(1)),
        }
    }
    last
}

fn parse_rect(s: &str) -> std::result::Result<Rect, String> {
    let parts = s
        .split(',')
        .map(|p| p.trim().parse::<f64>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("`{s}`: {e}"))?;
    let [x, y, w, h] = parts[..] else {
        return Err(format!("`{s}`: expected x,y,w,h"));
    };
    if !parts.iter().all(|v| v.is_finite()) {
        return Err(format!("`{s}`: values must be finite"));
    }
    Ok(Rect::new(x, y, x + w, y + h))
}
