use std::collections::HashMap;

use sm_core::{Error, MaskPoint};

use crate::cluster::{Cluster, PointClusterer};

/// Density-based clustering in `(x, y, depth)` space.
///
/// A point is a core point when at least `min_points` points, itself
/// included, lie within Euclidean distance `eps`. Clusters grow from core
/// points in input order; a non-core point joins the first cluster that
/// reaches it, otherwise it is noise. Points with a non-finite depth are
/// always noise.
///
/// Pixel coordinates are integers, so any `eps < 1` with equal depths leaves
/// every point isolated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dbscan {
    eps: f64,
    min_points: usize,
}

/// Per-point cluster ids; `None` marks noise. Ids are dense and numbered in
/// discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DbscanLabels {
    pub labels: Vec<Option<usize>>,
    pub cluster_count: usize,
}

impl DbscanLabels {
    pub fn cluster_sizes(&self) -> Vec<usize> {
        let mut sizes = vec![0usize; self.cluster_count];
        for id in self.labels.iter().flatten() {
            sizes[*id] += 1;
        }
        sizes
    }

    pub fn noise_count(&self) -> usize {
        self.labels.iter().filter(|l| l.is_none()).count()
    }

    /// Id of the cluster with the most members; ties go to the lower id.
    pub fn largest(&self) -> Option<usize> {
        let mut best: Option<(usize, usize)> = None;
        for (id, size) in self.cluster_sizes().into_iter().enumerate() {
            if best.is_none_or(|(_, best_size)| size > best_size) {
                best = Some((id, size));
            }
        }
        best.map(|(id, _)| id)
    }
}

impl Dbscan {
    pub fn new(eps: f64, min_points: usize) -> Result<Self, Error> {
        if !eps.is_finite() || eps <= 0.0 {
            return Err(Error::InvalidParameter("eps must be finite and positive"));
        }
        if min_points == 0 {
            return Err(Error::InvalidParameter("min_points must be at least 1"));
        }
        Ok(Self { eps, min_points })
    }

    pub fn eps(&self) -> f64 {
        self.eps
    }

    pub fn min_points(&self) -> usize {
        self.min_points
    }

    pub fn labels(&self, points: &[MaskPoint]) -> DbscanLabels {
        let grid = GridIndex::build(points, self.eps);
        let mut scratch = Vec::new();

        let core: Vec<bool> = (0..points.len())
            .map(|i| {
                grid.neighbors(points, i, &mut scratch);
                scratch.len() >= self.min_points
            })
            .collect();

        let mut labels: Vec<Option<usize>> = vec![None; points.len()];
        let mut cluster_count = 0usize;
        let mut stack = Vec::new();

        for seed in 0..points.len() {
            if labels[seed].is_some() || !core[seed] {
                continue;
            }

            let id = cluster_count;
            cluster_count += 1;
            labels[seed] = Some(id);
            stack.push(seed);

            while let Some(p) = stack.pop() {
                grid.neighbors(points, p, &mut scratch);
                for &q in &scratch {
                    if labels[q].is_none() {
                        labels[q] = Some(id);
                        if core[q] {
                            stack.push(q);
                        }
                    }
                }
            }
        }

        let out = DbscanLabels {
            labels,
            cluster_count,
        };
        tracing::debug!(
            points = points.len(),
            clusters = out.cluster_count,
            noise = out.noise_count(),
            eps = self.eps,
            min_points = self.min_points,
            "dbscan finished"
        );
        out
    }
}

impl PointClusterer for Dbscan {
    fn largest_cluster(&self, points: &[MaskPoint]) -> Option<Cluster> {
        if points.is_empty() {
            return None;
        }

        let labels = self.labels(points);
        let Some(best) = labels.largest() else {
            tracing::warn!(points = points.len(), "dbscan found only noise");
            return None;
        };

        let members = points
            .iter()
            .zip(&labels.labels)
            .filter(|(_, label)| **label == Some(best))
            .map(|(p, _)| *p)
            .collect();
        Some(Cluster::new(members))
    }
}

type CellKey = [i64; 3];

/// Uniform grid with cell edge `eps`: every neighbor of a point lies in the
/// 3x3x3 block of cells around it.
struct GridIndex {
    eps: f64,
    eps_sq: f64,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl GridIndex {
    fn build(points: &[MaskPoint], eps: f64) -> Self {
        let mut cells: HashMap<CellKey, Vec<usize>> = HashMap::new();
        for (i, p) in points.iter().enumerate() {
            if p.depth.is_finite() {
                cells.entry(cell_of(p, eps)).or_default().push(i);
            }
        }
        Self {
            eps,
            eps_sq: eps * eps,
            cells,
        }
    }

    /// Fills `out` with the indices within `eps` of `points[i]`, `i` included,
    /// in ascending order. Non-finite points have no neighbors at all.
    fn neighbors(&self, points: &[MaskPoint], i: usize, out: &mut Vec<usize>) {
        out.clear();
        let p = &points[i];
        if !p.depth.is_finite() {
            return;
        }

        let [cx, cy, cz] = cell_of(p, self.eps);
        for dz in -1..=1 {
            for dy in -1..=1 {
                for dx in -1..=1 {
                    // Keys saturate for tiny eps; out-of-range cells hold nothing.
                    let (Some(kx), Some(ky), Some(kz)) =
                        (cx.checked_add(dx), cy.checked_add(dy), cz.checked_add(dz))
                    else {
                        continue;
                    };
                    let Some(bucket) = self.cells.get(&[kx, ky, kz]) else {
                        continue;
                    };
                    out.extend(
                        bucket
                            .iter()
                            .copied()
                            .filter(|&j| p.distance_sq(&points[j]) <= self.eps_sq),
                    );
                }
            }
        }
        out.sort_unstable();
    }
}

fn cell_of(p: &MaskPoint, eps: f64) -> CellKey {
    let [x, y, z] = p.to_array();
    [
        (x / eps).floor() as i64,
        (y / eps).floor() as i64,
        (z / eps).floor() as i64,
    ]
}
