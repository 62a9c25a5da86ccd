//! Clustering strategies for candidate mask points.
//!
//! Reduction code depends only on [`PointClusterer`], so strategies can be
//! swapped without touching extraction or averaging:
//! - [`WholeSetClusterer`] returns the full input as a single cluster.
//! - [`Dbscan`] groups points by density in `(x, y, depth)` space and rejects
//!   sparse points as noise. Its neighborhood radius and minimum density have
//!   no defaults and must be chosen by the caller.

mod cluster;
mod dbscan;

pub use cluster::{Cluster, ClusterMean, PointClusterer, WholeSetClusterer};
pub use dbscan::{Dbscan, DbscanLabels};
