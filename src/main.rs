// Copyright 2025 the Threadmark Authors
// SPDX-License-Identifier: Apache-2.0

//! Headless renderer: draws a shape document into a PNG.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use threadmark::EngineConfig;
use threadmark::model::ShapeDocument;
use threadmark::render::{self, StitchPlan};
use threadmark::surface::CanvasSize;
use tiny_skia::Pixmap;

/// Render a Threadmark shape document to a PNG
#[derive(Parser, Debug, PartialEq)]
#[command(name = "threadmark", about = "Render a shape document as plain strokes or simulated embroidery")]
struct Args {
    /// Shape document (JSON)
    #[arg(value_name = "SHAPES.json")]
    input: PathBuf,

    /// PNG to write
    #[arg(value_name = "OUT.png")]
    output: PathBuf,

    /// Canvas size in pixels
    #[arg(long, value_name = "WxH", value_parser = parse_size, default_value = "1024x1024")]
    size: CanvasSize,

    /// Engine configuration (TOML)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Also write the stitch plan of every shape as JSON
    #[arg(long, value_name = "FILE")]
    plan: Option<PathBuf>,

    /// Millimetres per canvas pixel, reported in the stitch plan
    #[arg(long, value_name = "MM", requires = "plan")]
    mm_per_px: Option<f64>,
}

fn parse_size(value: &str) -> Result<CanvasSize, String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("invalid size {value:?}, expected WxH"))?;
    let width: u32 = w.trim().parse().map_err(|_| format!("invalid width {w:?}"))?;
    let height: u32 = h.trim().parse().map_err(|_| format!("invalid height {h:?}"))?;
    if width == 0 || height == 0 {
        return Err(format!("canvas size must be non-zero, got {width}x{height}"));
    }
    Ok(CanvasSize::new(width, height))
}

fn save_png(pixmap: &Pixmap, path: &std::path::Path) -> Result<()> {
    let data: Vec<u8> = pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect();
    let image = image::RgbaImage::from_raw(pixmap.width(), pixmap.height(), data)
        .context("Pixel buffer does not match canvas size")?;
    image
        .save(path)
        .with_context(|| format!("Failed to write {}", path.display()))
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let document = ShapeDocument::load(&args.input)?;
    tracing::info!(
        "Rendering {} shape(s) from {} at {}x{}",
        document.shapes.len(),
        args.input.display(),
        args.size.width,
        args.size.height
    );

    let mut pixmap = Pixmap::new(args.size.width, args.size.height).context("Failed to allocate canvas")?;
    for shape in &document.shapes {
        match render::render_shape(&mut pixmap, shape, &config.stitch) {
            Ok(report) if report.fell_back => {
                tracing::warn!("Shape {:?} rendered plain", shape.id())
            }
            Ok(_) => {}
            Err(err) => tracing::warn!("Skipped shape {:?}: {}", shape.id(), err),
        }
    }

    save_png(&pixmap, &args.output)?;
    tracing::info!("Wrote {}", args.output.display());

    if let Some(path) = &args.plan {
        let plans = plans(&document, &config, args.mm_per_px);
        let json = serde_json::to_string_pretty(&plans).context("Failed to serialize stitch plans")?;
        std::fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote {} stitch plan(s) to {}", plans.len(), path.display());
    }
    Ok(())
}

fn plans(document: &ShapeDocument, config: &EngineConfig, mm_per_px: Option<f64>) -> Vec<StitchPlan> {
    document
        .shapes
        .iter()
        .filter_map(|shape| match StitchPlan::for_shape(shape, &config.stitch, mm_per_px) {
            Ok(plan) => Some(plan),
            Err(err) => {
                tracing::warn!("No stitch plan for shape {:?}: {}", shape.id(), err);
                None
            }
        })
        .collect()
}

fn main() -> Result<()> {
    threadmark::init_tracing();
    run(Args::parse())
}
