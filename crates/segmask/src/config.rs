use serde::{Deserialize, Serialize};
use sm_centroid::ReduceMode;
use sm_cluster::{Dbscan, PointClusterer, WholeSetClusterer};
use sm_core::Error;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Class label of the tracked region in the input mask.
    pub target_label: u8,
    pub mode: ReduceMode,
    pub clusterer: ClustererConfig,
    pub cleaning: CleaningConfig,
    pub estimate_width: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_label: 1,
            mode: ReduceMode::Median,
            clusterer: ClustererConfig::WholeSet,
            cleaning: CleaningConfig::default(),
            estimate_width: true,
        }
    }
}

/// Clustering strategy used in [`ReduceMode::Cluster`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClustererConfig {
    #[default]
    WholeSet,
    Dbscan {
        eps: f64,
        min_points: usize,
    },
}

impl ClustererConfig {
    pub fn build(&self) -> Result<Box<dyn PointClusterer>, Error> {
        let clusterer: Box<dyn PointClusterer> = match *self {
            Self::WholeSet => Box::new(WholeSetClusterer),
            Self::Dbscan { eps, min_points } => Box::new(Dbscan::new(eps, min_points)?),
        };
        Ok(clusterer)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    pub enabled: bool,
    /// Side of the square open/close kernel, in pixels.
    pub kernel_size: usize,
    /// Components whose mean depths differ by less than this are merged.
    pub merge_depth_threshold: f32,
    /// Pixels farther than this from the region's mean depth are dropped.
    pub depth_clean_threshold: f32,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kernel_size: 5,
            merge_depth_threshold: 0.5,
            depth_clean_threshold: 0.25,
        }
    }
}
