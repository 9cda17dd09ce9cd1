//! Composite a caption behind the subject of an image.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use textbehind_common::config::AppConfig;
use textbehind_render_engine::{FontResolver, TextBehindPipeline};
use textbehind_segmentation::{CommandExtractor, CutoutFileExtractor, ForegroundExtractor};
use textbehind_style_model::{Preset, TextStyle};

#[derive(Args, Debug)]
pub struct RenderArgs {
    /// Input image
    pub input: PathBuf,

    /// Caption text (taken from the preset when omitted)
    #[arg(short, long)]
    pub text: Option<String>,

    /// Start from a named preset (see `textbehind presets`)
    #[arg(long)]
    pub preset: Option<String>,

    /// Font size in points (1-800)
    #[arg(long)]
    pub font_size: Option<u32>,

    /// Text color: #RRGGBB, a color name, or rgba(r,g,b,a)
    #[arg(long)]
    pub color: Option<String>,

    /// Text opacity (0-255)
    #[arg(long)]
    pub opacity: Option<u8>,

    /// Horizontal position, percent of free room (0-100)
    #[arg(short, long)]
    pub x: Option<f64>,

    /// Vertical position, percent of free room (0-100)
    #[arg(short, long)]
    pub y: Option<f64>,

    /// Stroke thickness in pixels
    #[arg(long)]
    pub thickness: Option<u32>,

    /// Use a precomputed cutout instead of running the extractor
    #[arg(long)]
    pub cutout: Option<PathBuf>,

    /// Output file path
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

pub fn run(args: RenderArgs, config: &AppConfig) -> anyhow::Result<()> {
    let style = build_style(&args, config)?;

    let extractor: Box<dyn ForegroundExtractor> = match &args.cutout {
        Some(path) => Box::new(CutoutFileExtractor::new(path)),
        None => Box::new(CommandExtractor::from_config(&config.extractor)),
    };
    if !extractor.is_available() {
        anyhow::bail!(
            "Extractor '{}' is not available. Install it or pass --cutout.",
            extractor.name()
        );
    }

    let image = image::open(&args.input)
        .with_context(|| format!("Failed to open {}", args.input.display()))?;

    println!("Rendering '{}' onto {}", style.text(), args.input.display());
    println!("  Resolution: {}x{}", image.width(), image.height());
    println!("  Extractor: {}", extractor.name());

    let pipeline = TextBehindPipeline::new(extractor, FontResolver::new(config.fonts.clone()));
    let result = pipeline
        .process(Some(&image), &style)?
        .context("No image was produced")?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| default_output_path(&args.input));
    result
        .save(&output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Saved: {}", output.display());
    Ok(())
}

/// Merge explicit flags over the preset (if any) over configured defaults.
fn build_style(args: &RenderArgs, config: &AppConfig) -> anyhow::Result<TextStyle> {
    let defaults = &config.defaults;
    let preset = match &args.preset {
        Some(name) => Some(
            Preset::find(name)
                .with_context(|| format!("Unknown preset: {name}. Use `textbehind presets`."))?,
        ),
        None => None,
    };

    let text = args
        .text
        .clone()
        .or_else(|| preset.map(|p| p.text.to_string()))
        .context("--text is required unless a preset is given")?;
    let color = args
        .color
        .clone()
        .or_else(|| preset.map(|p| p.color.to_string()))
        .unwrap_or_else(|| defaults.color.clone());

    let style = TextStyle::new(
        text,
        args.font_size
            .or(preset.map(|p| p.font_size))
            .unwrap_or(defaults.font_size),
        &color,
        args.opacity
            .or(preset.map(|p| p.opacity))
            .unwrap_or(defaults.opacity),
        args.x
            .or(preset.map(|p| p.x_position))
            .unwrap_or(defaults.x_position),
        args.y
            .or(preset.map(|p| p.y_position))
            .unwrap_or(defaults.y_position),
        args.thickness
            .or(preset.map(|p| p.thickness))
            .unwrap_or(defaults.thickness),
    )?;
    Ok(style)
}

fn default_output_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output");
    input.with_file_name(format!("{stem}_text.png"))
}
