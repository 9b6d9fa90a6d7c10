//! Quill - headless stroke engine demo
//!
//! Loads an optional base image, draws a synthetic wavy stroke with the
//! chosen tool and writes the composited result to a PNG.
//!
//! ```text
//! quill --base photo.png --tool marker --color ff8800 --arrow -o out.png
//! RUST_LOG=quill_canvas=debug quill --width 800 --height 600 --hold
//! ```

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use quill_canvas::{CanvasEngine, EngineConfig};
use quill_core::{Color, PointerSample, TipKind, ToolPreset};
use tracing_subscriber::EnvFilter;

/// Pointer sample rate of the synthetic stroke
const SAMPLE_RATE: f64 = 120.0;

/// Draw a synthetic stroke onto an image
#[derive(Parser, Debug)]
#[command(name = "quill")]
#[command(about = "Draw a synthetic stroke onto an image with the Quill engine")]
#[command(version)]
struct Args {
    /// Base image to draw on (PNG)
    #[arg(short, long)]
    base: Option<PathBuf>,

    /// Canvas width (defaults to the base image width, or 512)
    #[arg(long)]
    width: Option<u32>,

    /// Canvas height (defaults to the base image height, or 512)
    #[arg(long)]
    height: Option<u32>,

    /// Tool preset: pen, marker, pencil, eraser or blur
    #[arg(short, long, default_value = "pen")]
    tool: ToolPreset,

    /// Stroke color as RRGGBB or RRGGBBAA hex
    #[arg(short, long, default_value = "000000", value_parser = parse_color)]
    color: Color,

    /// Stroke width (defaults to the tool's width)
    #[arg(long)]
    stroke_width: Option<f32>,

    /// End the stroke with an arrow head
    #[arg(long)]
    arrow: bool,

    /// Tap and hold instead of drawing: fills the canvas
    #[arg(long)]
    hold: bool,

    /// Undo the stroke after drawing it
    #[arg(long)]
    undo: bool,

    /// Output PNG path
    #[arg(short, long, default_value = "quill.png")]
    output: PathBuf,
}

fn parse_color(value: &str) -> std::result::Result<Color, String> {
    let hex = value.trim().trim_start_matches('#');
    if !matches!(hex.len(), 6 | 8) {
        return Err(format!("expected RRGGBB or RRGGBBAA, got '{}'", value));
    }
    let parsed = u32::from_str_radix(hex, 16).map_err(|e| format!("'{}': {}", value, e))?;
    Ok(match hex.len() {
        8 => Color::from_hex_rgba(parsed),
        _ => Color::from_hex(parsed),
    })
}

/// Samples of a two-period sine wave across the middle of the canvas
fn wave(width: u32, height: u32) -> Vec<PointerSample> {
    let (w, h) = (width as f32, height as f32);
    let margin = w * 0.1;
    let count = ((w - 2.0 * margin) / 4.0).max(2.0) as usize;
    (0..=count)
        .map(|i| {
            let k = i as f32 / count as f32;
            let x = margin + k * (w - 2.0 * margin);
            let y = h * 0.5 + (k * std::f32::consts::TAU * 2.0).sin() * h * 0.25;
            PointerSample::new(x, y, i as f64 / SAMPLE_RATE)
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let base = match &args.base {
        Some(path) => Some(
            image::open(path)
                .with_context(|| format!("failed to open base image {}", path.display()))?
                .to_rgba8(),
        ),
        None => None,
    };
    let (width, height) = match (&base, args.width, args.height) {
        (_, Some(w), Some(h)) => (w, h),
        (Some(image), w, h) => (w.unwrap_or(image.width()), h.unwrap_or(image.height())),
        (None, w, h) => (w.unwrap_or(512), h.unwrap_or(512)),
    };
    if width == 0 || height == 0 {
        bail!("canvas size must be non-zero, got {}x{}", width, height);
    }

    let tip = if args.arrow { TipKind::Arrow } else { TipKind::Default };
    let style = match args.stroke_width {
        Some(w) => args.tool.style_with_width(w, args.color, tip),
        None => args.tool.style(args.color, tip),
    };
    tracing::info!(
        "{} {}x{} with {} (width {})",
        if args.hold { "filling" } else { "drawing on" },
        width,
        height,
        args.tool.name(),
        style.stroke_width()
    );

    let mut engine = CanvasEngine::new(EngineConfig::from_env(), (width, height), style)
        .context("failed to create the canvas engine")?;
    engine
        .set_base_image(base)
        .context("failed to upload the base image")?;

    let samples = wave(width, height);
    let (first, rest) = samples
        .split_first()
        .context("synthetic stroke has no samples")?;
    engine.pointer_began(*first)?;
    if args.hold {
        engine.tick(first.timestamp + 1.0)?;
    } else {
        for sample in rest {
            engine.pointer_moved(*sample, &[])?;
        }
        engine.pointer_ended()?;
    }
    tracing::info!("{} item(s) committed", engine.items().len());

    if args.undo {
        engine.undo()?;
        tracing::info!("undone, {} item(s) left", engine.items().len());
    }

    let image = engine
        .try_get_image()
        .context("failed to read back the composited image")?;
    image
        .save(&args.output)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    tracing::info!("wrote {}", args.output.display());
    Ok(())
}
