use serde::{Deserialize, Serialize};
use sm_cluster::PointClusterer;
use sm_core::{Centroid, Error, MaskPoint};

/// How a candidate point set is reduced to one centroid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReduceMode {
    /// Coordinate-wise median of x and y; depth is ignored.
    #[default]
    Median,
    /// Mean of the dominant cluster reported by a [`PointClusterer`].
    Cluster,
}

/// Median of `values`, averaging the two central values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Per-axis median. The result need not coincide with any input point.
pub fn median_centroid(points: &[MaskPoint]) -> Result<Centroid, Error> {
    let xs: Vec<f64> = points.iter().map(|p| p.x as f64).collect();
    let ys: Vec<f64> = points.iter().map(|p| p.y as f64).collect();

    match (median(&xs), median(&ys)) {
        (Some(x), Some(y)) => Ok(Centroid::new(x, y)),
        _ => Err(Error::EmptyInput),
    }
}

/// Mean position of the dominant cluster, `None` when no cluster forms.
pub fn cluster_centroid(points: &[MaskPoint], clusterer: &dyn PointClusterer) -> Option<Centroid> {
    let cluster = clusterer.largest_cluster(points)?;
    let mean = cluster.mean()?;
    tracing::debug!(
        members = cluster.len(),
        candidates = points.len(),
        mean_depth = mean.depth,
        "reduced dominant cluster"
    );
    Some(Centroid::new(mean.x, mean.y))
}

/// Reduces candidate points to a centroid.
///
/// An empty point set is an [`Error::EmptyInput`] in median mode but a plain
/// `Ok(None)` in cluster mode, where "no cluster" is an ordinary outcome.
pub fn reduce(
    points: &[MaskPoint],
    mode: ReduceMode,
    clusterer: &dyn PointClusterer,
) -> Result<Option<Centroid>, Error> {
    match mode {
        ReduceMode::Median => median_centroid(points).map(Some),
        ReduceMode::Cluster => Ok(cluster_centroid(points, clusterer)),
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
    use sm_cluster::{Dbscan, WholeSetClusterer};
    use sm_core::{Centroid, Error, MaskPoint};

    use super::{ReduceMode, median, median_centroid, reduce};

    fn points_from_xy(xy: &[(usize, usize)]) -> Vec<MaskPoint> {
        xy.iter().map(|&(x, y)| MaskPoint::new(x, y, 1.0)).collect()
    }

    #[test]
    fn median_odd_and_even() {
        assert_eq!(median(&[1.0, 3.0, 5.0]), Some(3.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(&[7.0]), Some(7.0));
        assert_eq!(median(&[]), None);
    }

    #[test]
    fn median_x_of_odd_count() {
        let points = points_from_xy(&[(1, 0), (3, 9), (5, 4)]);
        let c = median_centroid(&points).expect("non-empty");
        assert_eq!(c.x, 3.0);
    }

    #[test]
    fn median_x_of_even_count() {
        let points = points_from_xy(&[(1, 0), (2, 0), (3, 0), (4, 0)]);
        let c = median_centroid(&points).expect("non-empty");
        assert_eq!(c.x, 2.5);
    }

    #[test]
    fn median_ignores_point_order() {
        let mut points = points_from_xy(&[
            (4, 1),
            (9, 3),
            (2, 8),
            (7, 7),
            (1, 0),
            (3, 3),
            (8, 2),
            (5, 6),
        ]);
        let reference = median_centroid(&points).expect("non-empty");

        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            points.shuffle(&mut rng);
            assert_eq!(median_centroid(&points).expect("non-empty"), reference);
        }
    }

    #[test]
    fn median_axes_are_independent() {
        let base = points_from_xy(&[(1, 2), (6, 4), (3, 9)]);
        let moved_y = points_from_xy(&[(1, 50), (6, 0), (3, 7)]);
        let moved_x = points_from_xy(&[(40, 2), (0, 4), (2, 9)]);

        let c = median_centroid(&base).expect("non-empty");
        assert_eq!(median_centroid(&moved_y).expect("non-empty").x, c.x);
        assert_eq!(median_centroid(&moved_x).expect("non-empty").y, c.y);
    }

    #[test]
    fn median_is_not_necessarily_an_input_point() {
        let points = points_from_xy(&[(0, 10), (10, 0)]);
        assert_eq!(
            median_centroid(&points).expect("non-empty"),
            Centroid::new(5.0, 5.0)
        );
    }

    #[test]
    fn empty_input_is_error_for_median_and_none_for_cluster() {
        assert_eq!(
            reduce(&[], ReduceMode::Median, &WholeSetClusterer),
            Err(Error::EmptyInput)
        );
        assert_eq!(reduce(&[], ReduceMode::Cluster, &WholeSetClusterer), Ok(None));
    }

    #[test]
    fn cluster_mode_averages_whole_set() {
        let points = vec![
            MaskPoint::new(0, 0, 1.0),
            MaskPoint::new(2, 0, 1.0),
            MaskPoint::new(0, 2, 1.0),
            MaskPoint::new(2, 2, 1.0),
        ];
        let c = reduce(&points, ReduceMode::Cluster, &WholeSetClusterer).expect("reduce");
        assert_eq!(c, Some(Centroid::new(1.0, 1.0)));
    }

    #[test]
    fn cluster_mode_with_dbscan_ignores_outliers() {
        let mut points = Vec::new();
        for y in 10..14 {
            for x in 20..24 {
                points.push(MaskPoint::new(x, y, 2.0));
            }
        }
        points.push(MaskPoint::new(0, 0, 2.0));
        points.push(MaskPoint::new(90, 90, 2.0));

        let dbscan = Dbscan::new(1.5, 4).expect("valid params");
        let c = reduce(&points, ReduceMode::Cluster, &dbscan)
            .expect("reduce")
            .expect("dense block forms a cluster");
        assert!((c.x - 21.5).abs() < 1e-12);
        assert!((c.y - 11.5).abs() < 1e-12);
    }

    #[test]
    fn cluster_mode_with_only_noise_is_absent() {
        let points = points_from_xy(&[(0, 0), (10, 10), (20, 20)]);
        let dbscan = Dbscan::new(1.5, 2).expect("valid params");
        assert_eq!(reduce(&points, ReduceMode::Cluster, &dbscan), Ok(None));
    }
}
