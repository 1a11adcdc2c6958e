use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use shelet_core::EngineConfig;
use shelet_encode::{plan, probe_source, LayoutMode, Transcoder};
use shelet_overlay::{raster, EngineAssets, OverlayCompositor};

#[derive(Parser)]
#[command(
    name = "shelet",
    version,
    about = "Shelet — branded vertical video overlay engine",
    long_about = "Shelet turns a raw clip plus two lines of bidirectional text\ninto a branded vertical video with burned-in captions."
)]
struct Cli {
    /// Path to a shelet.toml profile (defaults are used when omitted)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a source clip with the composed overlay burned in
    Render {
        /// Path to the source video file
        input: PathBuf,

        /// Headline text (single line)
        #[arg(long)]
        headline: String,

        /// Body text; embedded newlines delimit paragraphs
        #[arg(long)]
        body: String,

        /// Layout mode: lower (crop top, pin low) or standard (centered)
        #[arg(long, default_value = "lower")]
        mode: String,
    },

    /// Compose only the overlay artifact, without touching the video
    Overlay {
        /// Headline text (single line)
        #[arg(long)]
        headline: String,

        /// Body text; embedded newlines delimit paragraphs
        #[arg(long)]
        body: String,

        /// Write the PNG here instead of the temp-dir overlay path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Probe a source video and print its info as JSON
    Probe {
        /// Path to the source video file
        input: PathBuf,
    },

    /// Display version and engine info
    Info,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => EngineConfig::load_from_file(path)
            .with_context(|| format!("loading profile {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Render {
            input,
            headline,
            body,
            mode,
        } => cmd_render(config, &input, &headline, &body, &mode),
        Commands::Overlay {
            headline,
            body,
            output,
        } => cmd_overlay(config, &headline, &body, output),
        Commands::Probe { input } => cmd_probe(&input),
        Commands::Info => cmd_info(&config),
    }
}

/// The full sequential pipeline: overlay → probe → plan → filter graph →
/// ffmpeg. Each stage depends on the previous one; any failure aborts the
/// request with no file at the canonical output path.
fn cmd_render(
    config: EngineConfig,
    input: &std::path::Path,
    headline: &str,
    body: &str,
    mode: &str,
) -> Result<()> {
    let mode = LayoutMode::from_str(mode)?;
    let assets = EngineAssets::load(config).context("loading engine assets")?;

    let overlay = OverlayCompositor::new(&assets)
        .compose(headline, body)
        .context("composing overlay")?;

    let info = probe_source(input).context("probing source video")?;
    let layout = plan(info.width, info.height, mode, &assets.config)?;

    let output = Transcoder::new(&assets.config)
        .run(input, &overlay, &layout, &info)
        .context("rendering video")?;

    println!("{}", output.display());
    Ok(())
}

fn cmd_overlay(
    config: EngineConfig,
    headline: &str,
    body: &str,
    output: Option<PathBuf>,
) -> Result<()> {
    let assets = EngineAssets::load(config).context("loading engine assets")?;
    let compositor = OverlayCompositor::new(&assets);

    let path = match output {
        Some(path) => {
            let canvas = compositor.compose_canvas(headline, body)?;
            raster::save_png(&canvas, &path)?;
            path
        }
        None => compositor.compose(headline, body)?,
    };

    println!("{}", path.display());
    Ok(())
}

fn cmd_probe(input: &std::path::Path) -> Result<()> {
    let info = probe_source(input)?;
    println!("{}", serde_json::to_string_pretty(&info)?);
    Ok(())
}

fn cmd_info(config: &EngineConfig) -> Result<()> {
    println!("shelet {}", env!("CARGO_PKG_VERSION"));
    println!(
        "canvas: {}x{}",
        config.canvas.width, config.canvas.height
    );
    println!(
        "text shaping: {}",
        if config.complex_layout {
            "native complex layout"
        } else {
            "visual reorder"
        }
    );
    println!(
        "ffmpeg: {}",
        if Transcoder::is_available() {
            "available"
        } else {
            "not found in PATH"
        }
    );
    Ok(())
}
