//! Umbrella crate for the `segmask` workspace.
//!
//! Re-exports the building blocks and adds [`run_pipeline`], which takes a
//! raw segmentation mask and a depth map through cleaning, region selection
//! and centroid reduction in one call, driven by a serde-friendly
//! [`PipelineConfig`].

mod config;
mod pipeline;

pub use config::{CleaningConfig, ClustererConfig, PipelineConfig};
pub use pipeline::{PipelineResult, run_pipeline};

pub use sm_centroid::*;
pub use sm_cluster::*;
pub use sm_core::*;
pub use sm_morph::*;
pub use sm_regions::*;
