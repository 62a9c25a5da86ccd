//! Region-level post-processing of segmentation masks.
//!
//! - [`connected_components`] splits the foreground into numbered regions.
//! - [`merge_by_depth`] joins regions that sit at a similar mean depth, which
//!   reconnects a surface split by an occluder.
//! - [`depth_clean_mask`] drops pixels far from the target region's mean
//!   depth.
//!
//! All functions validate that mask and depth map share dimensions before
//! reading any pixel.

mod components;
mod depth_clean;
mod merge;

pub use components::{Components, Connectivity, connected_components};
pub use depth_clean::depth_clean_mask;
pub use merge::{ComponentStats, component_stats, merge_by_depth};
