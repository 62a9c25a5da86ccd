use sm_centroid::{estimate_width, extract_points, reduce};
use sm_core::{Centroid, Error, Image, ImageView, ensure_same_dims};
use sm_morph::{SquareKernel, clean_mask};
use sm_regions::{
    ComponentStats, Connectivity, component_stats, connected_components, depth_clean_mask,
    merge_by_depth,
};

use crate::config::{CleaningConfig, PipelineConfig};

/// Output of [`run_pipeline`].
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub centroid: Option<Centroid>,
    pub width: Option<f32>,
    /// Number of region pixels handed to the reducer.
    pub candidates: usize,
    /// Binary region (`1` inside) the centroid was computed on.
    pub region: Image<u8>,
    /// Components after depth merging, sorted by label. Empty when cleaning
    /// is disabled.
    pub components: Vec<ComponentStats>,
}

/// Cleans the target region of `mask` and reduces it to a centroid.
///
/// With cleaning enabled the target label is opened and closed, split into
/// 8-connected components, merged by mean depth, and the largest merged group
/// is kept and trimmed by depth. Otherwise every target pixel is used as is.
///
/// A region that ends up empty yields `centroid: None` rather than an error.
pub fn run_pipeline(
    mask: &ImageView<'_, u8>,
    depth: &ImageView<'_, f32>,
    cfg: &PipelineConfig,
) -> Result<PipelineResult, Error> {
    ensure_same_dims(mask, depth)?;
    let clusterer = cfg.clusterer.build()?;

    let target = cfg.target_label;
    let binary = mask.map(|&v| u8::from(v == target));

    let (region, components) = if cfg.cleaning.enabled {
        clean_region(&binary.as_view(), depth, &cfg.cleaning)?
    } else {
        (binary, Vec::new())
    };

    let points = extract_points(&region.as_view(), depth, 1u8)?;
    let centroid = match reduce(&points, cfg.mode, clusterer.as_ref()) {
        Ok(c) => c,
        Err(Error::EmptyInput) => {
            tracing::warn!(target_label = target, "no region pixels left to reduce");
            None
        }
        Err(e) => return Err(e),
    };

    let width = match centroid {
        Some(c) if cfg.estimate_width => estimate_width(&region.as_view(), depth, c)?,
        _ => None,
    };

    tracing::info!(
        candidates = points.len(),
        components = components.len(),
        ?centroid,
        ?width,
        "pipeline finished"
    );

    Ok(PipelineResult {
        centroid,
        width,
        candidates: points.len(),
        region,
        components,
    })
}

fn clean_region(
    binary: &ImageView<'_, u8>,
    depth: &ImageView<'_, f32>,
    cfg: &CleaningConfig,
) -> Result<(Image<u8>, Vec<ComponentStats>), Error> {
    let kernel = SquareKernel::new(cfg.kernel_size)?;
    let cleaned = clean_mask(binary, kernel);

    let comps = connected_components(&cleaned.as_view(), Connectivity::C8);
    let merged = merge_by_depth(&comps.labels.as_view(), depth, cfg.merge_depth_threshold)?;
    let stats = component_stats(&merged.as_view(), depth)?;

    // Stats are sorted by label, so strict `>` keeps the lowest label on ties.
    let mut best: Option<&ComponentStats> = None;
    for s in &stats {
        if best.is_none_or(|b| s.pixels > b.pixels) {
            best = Some(s);
        }
    }

    let Some(best) = best else {
        tracing::warn!("no component survived cleaning");
        return Ok((cleaned, stats));
    };
    tracing::debug!(
        components = comps.count,
        groups = stats.len(),
        label = best.label,
        pixels = best.pixels,
        "selected largest depth-merged group"
    );

    let chosen = best.label;
    let region = merged.as_view().map(|&l| u8::from(l == chosen));
    let region = depth_clean_mask(&region.as_view(), depth, 1u8, cfg.depth_clean_threshold)?;
    Ok((region, stats))
}
