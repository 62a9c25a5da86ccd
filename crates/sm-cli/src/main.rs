use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use image::{GrayImage, Rgb, RgbImage};
use segmask::{
    Centroid, ClustererConfig, Image, PipelineConfig, PipelineResult, ReduceMode, resize_nearest,
    run_pipeline,
};
use serde::{Deserialize, Serialize};

#[derive(Parser, Debug)]
#[command(name = "segmask")]
#[command(about = "Clean segmentation masks and track the centroid of a labeled region")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the full pipeline and report the region centroid.
    #[command(name = "centroid")]
    Centroid(CentroidArgs),
    /// Write the cleaned region mask and its depth-merged components.
    #[command(name = "clean")]
    Clean(CleanArgs),
}

#[derive(Args, Debug, Clone)]
struct CommonArgs {
    /// Label image; any format the `image` crate reads, taken as 8-bit luma.
    #[arg(long, required = true)]
    mask: PathBuf,
    /// Raw little-endian f32 depth map, row-major.
    #[arg(long, required = true)]
    depth: PathBuf,
    #[arg(long, default_value_t = 1024)]
    depth_width: usize,
    #[arg(long, default_value_t = 1024)]
    depth_height: usize,
    /// Pipeline config JSON; command-line flags override its fields.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    label: Option<u8>,
    #[arg(long)]
    kernel_size: Option<usize>,
    #[arg(long, default_value = "out")]
    out: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct CentroidArgs {
    #[command(flatten)]
    common: CommonArgs,
    #[arg(long, value_enum)]
    mode: Option<ModeArg>,
    #[arg(long, value_enum)]
    clusterer: Option<ClustererArg>,
    #[arg(long)]
    eps: Option<f64>,
    #[arg(long)]
    min_points: Option<usize>,
    /// Use every target pixel as is, skipping morphology and region selection.
    #[arg(long)]
    no_clean: bool,
    #[arg(long)]
    no_width: bool,
}

#[derive(Args, Debug, Clone)]
struct CleanArgs {
    #[command(flatten)]
    common: CommonArgs,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ModeArg {
    Median,
    Cluster,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum ClustererArg {
    WholeSet,
    Dbscan,
}

#[derive(Debug, Clone, Serialize)]
struct PointDto {
    x: f64,
    y: f64,
}

#[derive(Debug, Clone, Serialize)]
struct CentroidResultDto {
    mask: String,
    width: usize,
    height: usize,
    centroid: Option<PointDto>,
    region_width: Option<f32>,
    candidates: usize,
    config: PipelineConfig,
}

#[derive(Debug, Clone, Serialize)]
struct ComponentDto {
    label: u32,
    pixels: usize,
    mean_depth: f64,
}

#[derive(Debug, Clone, Serialize)]
struct CleanResultDto {
    target_label: u8,
    kernel_size: usize,
    merge_depth_threshold: f32,
    depth_clean_threshold: f32,
    region_pixels: usize,
    components: Vec<ComponentDto>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Command::Centroid(args) => run_centroid(args),
        Command::Clean(args) => run_clean(args),
    }
}

fn run_centroid(args: CentroidArgs) -> Result<()> {
    let mut cfg = load_config(&args.common)?;
    if let Some(mode) = args.mode {
        cfg.mode = match mode {
            ModeArg::Median => ReduceMode::Median,
            ModeArg::Cluster => ReduceMode::Cluster,
        };
    }
    cfg.clusterer = resolve_clusterer(cfg.clusterer, &args)?;
    if args.no_clean {
        cfg.cleaning.enabled = false;
    }
    if args.no_width {
        cfg.estimate_width = false;
    }

    let (mask, depth) = load_inputs(&args.common)?;
    let res = run_pipeline(&mask.as_view(), &depth.as_view(), &cfg)
        .context("running centroid pipeline")?;

    let out_dir = prepare_out_dir(&args.common.out)?;
    match res.centroid {
        Some(c) => tracing::info!(x = c.x, y = c.y, candidates = res.candidates, "centroid"),
        None => tracing::warn!(label = cfg.target_label, "no centroid for target label"),
    }

    save_rgb_image(
        out_dir.join("overlay.png"),
        &render_overlay(&mask, &res, cfg.target_label)?,
    )?;
    write_json(
        out_dir.join("result.json"),
        &CentroidResultDto {
            mask: args.common.mask.display().to_string(),
            width: mask.width(),
            height: mask.height(),
            centroid: res.centroid.map(|c| PointDto { x: c.x, y: c.y }),
            region_width: res.width,
            candidates: res.candidates,
            config: cfg,
        },
    )?;

    Ok(())
}

fn run_clean(args: CleanArgs) -> Result<()> {
    let mut cfg = load_config(&args.common)?;
    cfg.cleaning.enabled = true;
    cfg.estimate_width = false;

    let (mask, depth) = load_inputs(&args.common)?;
    let res = run_pipeline(&mask.as_view(), &depth.as_view(), &cfg)
        .context("running cleaning pipeline")?;

    let out_dir = prepare_out_dir(&args.common.out)?;
    let cleaned = res.region.as_view().map(|&v| v.saturating_mul(255));
    save_u8_image(out_dir.join("cleaned.png"), cleaned)?;

    let region_pixels = res.region.data().iter().filter(|&&v| v != 0).count();
    tracing::info!(
        components = res.components.len(),
        region_pixels,
        "wrote cleaned mask"
    );

    write_json(
        out_dir.join("components.json"),
        &CleanResultDto {
            target_label: cfg.target_label,
            kernel_size: cfg.cleaning.kernel_size,
            merge_depth_threshold: cfg.cleaning.merge_depth_threshold,
            depth_clean_threshold: cfg.cleaning.depth_clean_threshold,
            region_pixels,
            components: res
                .components
                .iter()
                .map(|c| ComponentDto {
                    label: c.label,
                    pixels: c.pixels,
                    mean_depth: c.mean_depth,
                })
                .collect(),
        },
    )?;

    Ok(())
}

fn load_config(common: &CommonArgs) -> Result<PipelineConfig> {
    let mut cfg = match &common.config {
        Some(path) => {
            ensure_file_exists(path, "config")?;
            read_json(path)?
        }
        None => PipelineConfig::default(),
    };

    if let Some(label) = common.label {
        cfg.target_label = label;
    }
    if let Some(size) = common.kernel_size {
        cfg.cleaning.kernel_size = size;
    }
    Ok(cfg)
}

fn resolve_clusterer(current: ClustererConfig, args: &CentroidArgs) -> Result<ClustererConfig> {
    let (cur_eps, cur_min) = match current {
        ClustererConfig::Dbscan { eps, min_points } => (Some(eps), Some(min_points)),
        ClustererConfig::WholeSet => (None, None),
    };

    let wants_dbscan = match args.clusterer {
        Some(ClustererArg::Dbscan) => true,
        Some(ClustererArg::WholeSet) => false,
        None => cur_eps.is_some(),
    };

    if !wants_dbscan {
        if args.eps.is_some() || args.min_points.is_some() {
            bail!("--eps and --min-points only apply to the dbscan clusterer.");
        }
        return Ok(ClustererConfig::WholeSet);
    }

    let Some(eps) = args.eps.or(cur_eps) else {
        bail!("the dbscan clusterer needs --eps (or clusterer.eps in the config).");
    };
    let Some(min_points) = args.min_points.or(cur_min) else {
        bail!("the dbscan clusterer needs --min-points (or clusterer.min_points in the config).");
    };
    Ok(ClustererConfig::Dbscan { eps, min_points })
}

fn load_inputs(common: &CommonArgs) -> Result<(Image<u8>, Image<f32>)> {
    ensure_file_exists(&common.mask, "mask")?;
    ensure_file_exists(&common.depth, "depth")?;

    let mask = load_mask_u8(&common.mask)?;
    let depth = load_depth_f32(&common.depth, common.depth_width, common.depth_height)?;

    if depth.dims() == mask.dims() {
        return Ok((mask, depth));
    }
    tracing::debug!(
        from = ?depth.dims(),
        to = ?mask.dims(),
        "resizing depth map to mask size"
    );
    let depth = resize_nearest(&depth.as_view(), mask.width(), mask.height())
        .context("resizing depth map to mask size")?;
    Ok((mask, depth))
}

fn load_mask_u8(path: &Path) -> Result<Image<u8>> {
    let dyn_img =
        image::open(path).with_context(|| format!("opening mask image {}", path.display()))?;
    let luma = dyn_img.to_luma8();
    let (w, h) = luma.dimensions();
    let data = luma.into_raw();

    Image::from_vec(w as usize, h as usize, data)
        .with_context(|| format!("constructing mask image from {}", path.display()))
}

fn load_depth_f32(path: &Path, width: usize, height: usize) -> Result<Image<f32>> {
    let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;

    let Some(expected) = width
        .checked_mul(height)
        .and_then(|n| n.checked_mul(size_of::<f32>()))
    else {
        bail!("depth dimensions {width}x{height} overflow the addressable size.");
    };
    if bytes.len() != expected {
        bail!(
            "depth file {} holds {} bytes, expected {} for {}x{} f32 samples.",
            path.display(),
            bytes.len(),
            expected,
            width,
            height
        );
    }

    let data = bytes
        .chunks_exact(size_of::<f32>())
        .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
        .collect();
    Image::from_vec(width, height, data)
        .with_context(|| format!("constructing depth image from {}", path.display()))
}

fn prepare_out_dir(out: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out)
        .with_context(|| format!("creating output directory {}", out.display()))?;
    Ok(out.to_path_buf())
}

/// Target pixels dark gray, the selected region light gray, other classes
/// dim, and the centroid as a red dot.
fn render_overlay(mask: &Image<u8>, res: &PipelineResult, target: u8) -> Result<RgbImage> {
    let shades: Vec<u8> = mask
        .data()
        .iter()
        .zip(res.region.data())
        .map(|(&label, &inside)| match (label, inside) {
            (_, 1) => 200,
            (l, _) if l == target => 110,
            (0, _) => 0,
            _ => 50,
        })
        .collect();
    let gray = GrayImage::from_raw(mask.width() as u32, mask.height() as u32, shades)
        .context("constructing overlay base image")?;
    let mut rgb = image::DynamicImage::ImageLuma8(gray).to_rgb8();

    if let Some(Centroid { x, y }) = res.centroid {
        draw_dot(&mut rgb, x as f32, y as f32, Rgb([255, 64, 64]));
    }
    Ok(rgb)
}

fn save_u8_image(path: PathBuf, img: Image<u8>) -> Result<()> {
    let (w, h) = img.dims();
    let gray = GrayImage::from_raw(w as u32, h as u32, img.into_vec())
        .context("constructing GrayImage from raw bytes")?;
    gray.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn save_rgb_image(path: PathBuf, img: &RgbImage) -> Result<()> {
    img.save(&path)
        .with_context(|| format!("saving image {}", path.display()))
}

fn write_json(path: PathBuf, value: &impl Serialize) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value).context("serializing json")?;
    fs::write(&path, bytes).with_context(|| format!("writing json {}", path.display()))
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("parsing json {}", path.display()))
}

fn draw_dot(img: &mut RgbImage, x: f32, y: f32, color: Rgb<u8>) {
    let xi = x.round() as i32;
    let yi = y.round() as i32;

    for dy in -2..=2 {
        for dx in -2..=2 {
            let nx = xi + dx;
            let ny = yi + dy;
            if nx < 0 || ny < 0 {
                continue;
            }
            let (ux, uy) = (nx as u32, ny as u32);
            if ux >= img.width() || uy >= img.height() {
                continue;
            }
            img.put_pixel(ux, uy, color);
        }
    }
}

fn ensure_file_exists(path: &Path, what: &str) -> Result<()> {
    if !path.exists() {
        bail!("{} file does not exist: {}", what, path.display());
    }
    if !path.is_file() {
        bail!("{} path is not a file: {}", what, path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use segmask::{ClustererConfig, Image};

    use super::{CentroidArgs, Cli, Command, load_depth_f32, resolve_clusterer, save_u8_image};

    fn centroid_args(extra: &[&str]) -> CentroidArgs {
        let mut argv = vec!["segmask", "centroid", "--mask", "m.png", "--depth", "d.bin"];
        argv.extend_from_slice(extra);
        match Cli::try_parse_from(argv).expect("valid command line").cmd {
            Command::Centroid(args) => args,
            Command::Clean(_) => panic!("expected centroid subcommand"),
        }
    }

    #[test]
    fn dbscan_flags_override_config() {
        let args = centroid_args(&["--clusterer", "dbscan", "--eps", "2.5", "--min-points", "4"]);
        let cfg = resolve_clusterer(ClustererConfig::WholeSet, &args).expect("resolved");
        assert_eq!(
            cfg,
            ClustererConfig::Dbscan {
                eps: 2.5,
                min_points: 4
            }
        );

        let args = centroid_args(&["--eps", "3.0"]);
        let from_file = ClustererConfig::Dbscan {
            eps: 1.0,
            min_points: 9,
        };
        let cfg = resolve_clusterer(from_file, &args).expect("resolved");
        assert_eq!(
            cfg,
            ClustererConfig::Dbscan {
                eps: 3.0,
                min_points: 9
            }
        );
    }

    #[test]
    fn dbscan_requires_its_parameters() {
        let args = centroid_args(&["--clusterer", "dbscan", "--eps", "2.5"]);
        assert!(resolve_clusterer(ClustererConfig::WholeSet, &args).is_err());

        let args = centroid_args(&["--clusterer", "whole-set", "--min-points", "3"]);
        assert!(resolve_clusterer(ClustererConfig::WholeSet, &args).is_err());
    }

    #[test]
    fn raw_depth_round_trip_and_length_check() {
        let dir = std::env::temp_dir().join(format!("segmask-cli-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("depth.bin");

        let samples = [0.5f32, 1.0, 1.5, 2.0, 2.5, 3.0];
        let bytes: Vec<u8> = samples.iter().flat_map(|v| v.to_le_bytes()).collect();
        std::fs::write(&path, bytes).expect("write depth");

        let depth = load_depth_f32(&path, 3, 2).expect("3x2 depth");
        assert_eq!(depth.dims(), (3, 2));
        assert_eq!(depth.data(), &samples);

        assert!(load_depth_f32(&path, 4, 2).is_err());
        let err = load_depth_f32(&path, usize::MAX, 2).expect_err("overflowing dimensions");
        assert!(err.to_string().contains("overflow"));
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }

    #[test]
    fn cleaned_mask_png_keeps_layout() {
        let dir = std::env::temp_dir().join(format!("segmask-cli-png-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("cleaned.png");

        let mask = Image::from_fn(5, 3, |x, y| if x == y { 255u8 } else { 0 });
        save_u8_image(path.clone(), mask.clone()).expect("png written");

        let back = image::open(&path).expect("png readable").to_luma8();
        assert_eq!(back.dimensions(), (5, 3));
        assert_eq!(back.as_raw().as_slice(), mask.data());
        std::fs::remove_dir_all(&dir).expect("cleanup");
    }
}
