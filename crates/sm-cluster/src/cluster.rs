use sm_core::MaskPoint;

/// Points believed to belong together, in input order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Cluster {
    points: Vec<MaskPoint>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClusterMean {
    pub x: f64,
    pub y: f64,
    pub depth: f64,
}

impl Cluster {
    pub fn new(points: Vec<MaskPoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[MaskPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Arithmetic mean of all three coordinates, `None` when empty.
    pub fn mean(&self) -> Option<ClusterMean> {
        if self.points.is_empty() {
            return None;
        }

        let (mut sx, mut sy, mut sd) = (0.0f64, 0.0f64, 0.0f64);
        for p in &self.points {
            sx += p.x as f64;
            sy += p.y as f64;
            sd += f64::from(p.depth);
        }
        let n = self.points.len() as f64;

        Some(ClusterMean {
            x: sx / n,
            y: sy / n,
            depth: sd / n,
        })
    }
}

/// Partitions a point set and reports its dominant cluster.
pub trait PointClusterer: Send + Sync {
    /// The cluster with the most members, or `None` when no cluster forms.
    fn largest_cluster(&self, points: &[MaskPoint]) -> Option<Cluster>;
}

impl<C: PointClusterer + ?Sized> PointClusterer for Box<C> {
    fn largest_cluster(&self, points: &[MaskPoint]) -> Option<Cluster> {
        (**self).largest_cluster(points)
    }
}

/// Treats the whole input as one cluster, with no density test and no noise
/// rejection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WholeSetClusterer;

impl PointClusterer for WholeSetClusterer {
    fn largest_cluster(&self, points: &[MaskPoint]) -> Option<Cluster> {
        if points.is_empty() {
            return None;
        }
        Some(Cluster::new(points.to_vec()))
    }
}
