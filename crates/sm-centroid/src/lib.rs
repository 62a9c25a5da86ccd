//! Reduce a labeled region of a segmentation mask to one tracking point.
//!
//! Pipeline:
//! - [`extract_points`] scans mask and depth map in raster order and keeps
//!   `(x, y, depth)` for every pixel carrying the target label.
//! - [`reduce`] turns those candidates into a [`Centroid`], either by
//!   coordinate-wise median ([`ReduceMode::Median`]) or by averaging the
//!   dominant cluster of a [`PointClusterer`] ([`ReduceMode::Cluster`]).
//!
//! Every call is a pure function of its inputs. Views are borrowed for the
//! duration of the call only.
//!
//! Absence and failure are kept apart: `Ok(None)` means no centroid could be
//! formed, while dimension mismatches and empty median input are errors.

mod extract;
mod reduce;
mod width;

use sm_cluster::{PointClusterer, WholeSetClusterer};
use sm_core::{Centroid, Error, ImageView, MaskPoint};

pub use extract::extract_points;
pub use reduce::{ReduceMode, cluster_centroid, median, median_centroid, reduce};
pub use width::estimate_width;

/// Reduction mode bound to a clustering strategy.
pub struct CentroidEstimator {
    mode: ReduceMode,
    clusterer: Box<dyn PointClusterer>,
}

impl Default for CentroidEstimator {
    fn default() -> Self {
        Self::median()
    }
}

impl std::fmt::Debug for CentroidEstimator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CentroidEstimator")
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}

impl CentroidEstimator {
    pub fn new(mode: ReduceMode, clusterer: impl PointClusterer + 'static) -> Self {
        Self {
            mode,
            clusterer: Box::new(clusterer),
        }
    }

    pub fn median() -> Self {
        Self::new(ReduceMode::Median, WholeSetClusterer)
    }

    pub fn clustered(clusterer: impl PointClusterer + 'static) -> Self {
        Self::new(ReduceMode::Cluster, clusterer)
    }

    pub fn mode(&self) -> ReduceMode {
        self.mode
    }

    pub fn estimate<L: Copy + PartialEq>(
        &self,
        mask: &ImageView<'_, L>,
        depth: &ImageView<'_, f32>,
        target: L,
    ) -> Result<Option<Centroid>, Error> {
        let points = extract_points(mask, depth, target)?;
        self.estimate_points(&points)
    }

    pub fn estimate_points(&self, points: &[MaskPoint]) -> Result<Option<Centroid>, Error> {
        reduce(points, self.mode, self.clusterer.as_ref())
    }
}

/// One-shot centroid with the whole-set clusterer backing cluster mode.
pub fn compute_centroid<L: Copy + PartialEq>(
    mask: &ImageView<'_, L>,
    depth: &ImageView<'_, f32>,
    target: L,
    mode: ReduceMode,
) -> Result<Option<Centroid>, Error> {
    CentroidEstimator::new(mode, WholeSetClusterer).estimate(mask, depth, target)
}
