//! Example: centroid of every class label in a segmentation mask.
//!
//! Loads a label PNG (8-bit luma, one class per gray level), finds the labels
//! present, and runs the full pipeline once per label against a flat depth
//! map. Flat depth keeps all components in one merge group, so the region is
//! the cleaned union of the class.
//!
//! Results are written to a JSON file next to the input image.
//! Per-label and total timing is printed to stdout.
//!
//! Run from the workspace root:
//!   cargo run -p segmask --example label_sweep -- --help
//!   cargo run -p segmask --example label_sweep -- --input data/mask_0.png

use std::collections::BTreeSet;
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use image::ImageReader;
use segmask::{Image, PipelineConfig, ReduceMode, run_pipeline};
use serde::Serialize;

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Compute one centroid per class label in a segmentation mask")]
struct Args {
    /// Path to the label PNG
    #[arg(long, default_value = "data/mask_0.png")]
    input: String,

    /// Reduce with the dominant cluster mean instead of the median
    #[arg(long)]
    cluster: bool,

    /// Side of the square cleaning kernel; 0 disables cleaning
    #[arg(long, default_value_t = 5)]
    kernel: usize,

    /// Output JSON path (default: <input stem>_centroids.json next to input)
    #[arg(long)]
    out: Option<String>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct LabelResult {
    label: u8,
    /// Wall-clock time for this label's pipeline run, in milliseconds.
    elapsed_ms: f64,
    candidates: usize,
    centroid: Option<[f64; 2]>,
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();

    let img_path = &args.input;
    let out_path = args.out.unwrap_or_else(|| {
        let p = std::path::Path::new(img_path);
        let stem = p.file_stem().unwrap_or_default().to_string_lossy();
        let dir = p.parent().unwrap_or(std::path::Path::new("."));
        dir.join(format!("{stem}_centroids.json"))
            .to_string_lossy()
            .into_owned()
    });

    let gray = ImageReader::open(img_path)
        .with_context(|| format!("opening {img_path}"))?
        .decode()
        .with_context(|| format!("decoding {img_path}"))?
        .into_luma8();

    let (width, height) = (gray.width() as usize, gray.height() as usize);
    let mask = Image::from_vec(width, height, gray.into_raw()).context("building mask Image")?;
    let depth = Image::new_fill(width, height, 1.0f32);

    let labels: BTreeSet<u8> = mask.data().iter().copied().filter(|&v| v != 0).collect();
    if labels.is_empty() {
        bail!("{img_path} holds only background pixels");
    }
    println!(
        "loaded {img_path}: {width}x{height}, {} labels present",
        labels.len()
    );

    let mut cfg = PipelineConfig {
        mode: if args.cluster {
            ReduceMode::Cluster
        } else {
            ReduceMode::Median
        },
        estimate_width: false,
        ..PipelineConfig::default()
    };
    cfg.cleaning.enabled = args.kernel > 0;
    cfg.cleaning.kernel_size = args.kernel.max(1);

    let mut results = Vec::with_capacity(labels.len());
    let total_start = Instant::now();

    for label in labels {
        cfg.target_label = label;

        let t0 = Instant::now();
        let res = run_pipeline(&mask.as_view(), &depth.as_view(), &cfg)
            .with_context(|| format!("running pipeline for label {label}"))?;
        let elapsed_ms = t0.elapsed().as_secs_f64() * 1e3;

        match res.centroid {
            Some(c) => println!(
                "  label {label:3}: ({:.1}, {:.1}) from {} px  ({elapsed_ms:.2} ms)",
                c.x, c.y, res.candidates
            ),
            None => println!("  label {label:3}: no centroid  ({elapsed_ms:.2} ms)"),
        }

        results.push(LabelResult {
            label,
            elapsed_ms,
            candidates: res.candidates,
            centroid: res.centroid.map(|c| [c.x, c.y]),
        });
    }

    let total_ms = total_start.elapsed().as_secs_f64() * 1e3;
    println!("total: {total_ms:.2} ms");

    let json = serde_json::to_string_pretty(&results).context("serializing results")?;
    std::fs::write(&out_path, json).with_context(|| format!("writing {out_path}"))?;
    println!("results written to {out_path}");

    Ok(())
}
