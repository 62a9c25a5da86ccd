use std::collections::BTreeMap;

use sm_core::{Error, Image, ImageView, ensure_same_dims};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentStats {
    pub label: u32,
    pub pixels: usize,
    pub mean_depth: f64,
}

/// Pixel count and mean depth of every non-zero label, sorted by label.
pub fn component_stats(
    labels: &ImageView<'_, u32>,
    depth: &ImageView<'_, f32>,
) -> Result<Vec<ComponentStats>, Error> {
    ensure_same_dims(labels, depth)?;

    let mut acc: BTreeMap<u32, (usize, f64)> = BTreeMap::new();
    for (label_row, depth_row) in labels.rows().zip(depth.rows()) {
        for (&label, &d) in label_row.iter().zip(depth_row) {
            if label == 0 {
                continue;
            }
            let entry = acc.entry(label).or_insert((0, 0.0));
            entry.0 += 1;
            entry.1 += f64::from(d);
        }
    }

    Ok(acc
        .into_iter()
        .map(|(label, (pixels, sum))| ComponentStats {
            label,
            pixels,
            mean_depth: sum / pixels as f64,
        })
        .collect())
}

/// Merges components whose mean depths differ by less than `threshold`.
///
/// Merging is transitive, and every merged group is relabeled to its smallest
/// label. Components with a non-finite mean depth are never merged. Labels
/// are not compacted afterwards.
pub fn merge_by_depth(
    labels: &ImageView<'_, u32>,
    depth: &ImageView<'_, f32>,
    threshold: f32,
) -> Result<Image<u32>, Error> {
    if threshold.is_nan() || threshold < 0.0 {
        return Err(Error::InvalidParameter(
            "depth merge threshold must be non-negative",
        ));
    }

    let stats = component_stats(labels, depth)?;
    let mut sets = DisjointSets::new(stats.len());
    let threshold = f64::from(threshold);
    for i in 0..stats.len() {
        for j in (i + 1)..stats.len() {
            if (stats[i].mean_depth - stats[j].mean_depth).abs() < threshold {
                sets.union(i, j);
            }
        }
    }

    let remap: BTreeMap<u32, u32> = stats
        .iter()
        .enumerate()
        .map(|(i, s)| (s.label, stats[sets.find(i)].label))
        .collect();

    let merged = remap.iter().filter(|(from, to)| from != to).count();
    tracing::debug!(
        components = stats.len(),
        merged,
        "merged components by mean depth"
    );

    Ok(labels.map(|label| remap.get(label).copied().unwrap_or(*label)))
}

/// Union-find whose representative is always the smallest index in the set.
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
        }
    }

    fn find(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let ra = self.find(a);
        let rb = self.find(b);
        if ra != rb {
            let (lo, hi) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[hi] = lo;
        }
    }
}

#[cfg(test)]
mod tests {
    use sm_core::{Error, Image};

    use super::{component_stats, merge_by_depth};

    fn fixture() -> (Image<u32>, Image<f32>) {
        // Four components in one row, separated by background.
        let labels = Image::from_vec(8, 1, vec![1u32, 1, 0, 2, 0, 3, 0, 4]).expect("labels");
        let depth = Image::from_vec(8, 1, vec![2.0f32, 4.0, 9.0, 3.2, 9.0, 7.0, 9.0, 3.5])
            .expect("depth");
        (labels, depth)
    }

    #[test]
    fn stats_average_depth_per_label() {
        let (labels, depth) = fixture();
        let stats = component_stats(&labels.as_view(), &depth.as_view()).expect("stats");

        assert_eq!(stats.len(), 4);
        assert_eq!(stats[0].label, 1);
        assert_eq!(stats[0].pixels, 2);
        assert!((stats[0].mean_depth - 3.0).abs() < 1e-9);
        assert!((stats[2].mean_depth - 7.0).abs() < 1e-9);
    }

    #[test]
    fn similar_depths_merge_into_smallest_label() {
        let (labels, depth) = fixture();
        let merged = merge_by_depth(&labels.as_view(), &depth.as_view(), 0.5).expect("merge");

        // Means: 1 -> 3.0, 2 -> 3.2, 3 -> 7.0, 4 -> 3.5. Label 4 joins through 2.
        assert_eq!(merged.data(), &[1, 1, 0, 1, 0, 3, 0, 1]);
    }

    #[test]
    fn zero_threshold_keeps_labels() {
        let (labels, depth) = fixture();
        let merged = merge_by_depth(&labels.as_view(), &depth.as_view(), 0.0).expect("merge");
        assert_eq!(merged, labels);
    }

    #[test]
    fn rejects_bad_inputs() {
        let (labels, depth) = fixture();
        assert!(matches!(
            merge_by_depth(&labels.as_view(), &depth.as_view(), f32::NAN),
            Err(Error::InvalidParameter(_))
        ));

        let short = Image::new_fill(7, 1, 0.0f32);
        assert!(matches!(
            merge_by_depth(&labels.as_view(), &short.as_view(), 0.5),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
