use sm_core::{Centroid, Error, ImageView, ensure_same_dims};

/// Physical width of the region along the centroid's row.
///
/// Takes the leftmost and rightmost non-background pixels of that row. With
/// `side` the depth under the centroid, each edge contributes the leg
/// `sqrt(edge_depth² - side²)` of the right triangle between camera, centroid
/// and edge; the width is the mean of both legs. A negative radicand clamps
/// to zero.
///
/// Returns `Ok(None)` when the row holds fewer than two region pixels.
pub fn estimate_width<L: Copy + PartialEq + Default>(
    mask: &ImageView<'_, L>,
    depth: &ImageView<'_, f32>,
    centroid: Centroid,
) -> Result<Option<f32>, Error> {
    ensure_same_dims(mask, depth)?;

    let (cx, cy) = centroid.pixel().ok_or(Error::OutOfBounds)?;
    if cx >= mask.width() || cy >= mask.height() {
        return Err(Error::OutOfBounds);
    }

    let background = L::default();
    let row = mask.row(cy);
    let depth_row = depth.row(cy);
    let left = row.iter().position(|v| *v != background);
    let right = row.iter().rposition(|v| *v != background);

    let (left, right) = match (left, right) {
        (Some(l), Some(r)) if l < r => (l, r),
        _ => {
            tracing::warn!(row = cy, "cannot find region edges at the centroid row");
            return Ok(None);
        }
    };

    let side = depth_row[cx];
    let leg = |edge: f32| (edge * edge - side * side).max(0.0).sqrt();
    let width = (leg(depth_row[left]) + leg(depth_row[right])) / 2.0;

    tracing::debug!(row = cy, left, right, width, "estimated region width");
    Ok(Some(width))
}

#[cfg(test)]
mod tests {
    use sm_core::{Centroid, Error, Image};

    use super::estimate_width;

    #[test]
    fn width_from_edge_depths() {
        // Row 1: region spans x = 1..=5, centroid at x = 3.
        let mask = Image::from_fn(7, 3, |x, y| u8::from(y == 1 && (1..=5).contains(&x)));
        let depth = Image::from_fn(7, 3, |x, _| match x {
            1 => 5.0f32,
            3 => 3.0,
            5 => 3.0f32.hypot(2.0),
            _ => 1.0,
        });

        let width = estimate_width(&mask.as_view(), &depth.as_view(), Centroid::new(3.4, 1.9))
            .expect("in bounds")
            .expect("two edges");
        // Legs are 4.0 and 2.0.
        assert!((width - 3.0).abs() < 1e-5);
    }

    #[test]
    fn single_pixel_row_has_no_width() {
        let mask = Image::from_fn(5, 2, |x, y| u8::from(x == 2 && y == 0));
        let depth = Image::new_fill(5, 2, 2.0f32);

        let width =
            estimate_width(&mask.as_view(), &depth.as_view(), Centroid::new(2.0, 0.0)).expect("ok");
        assert_eq!(width, None);
    }

    #[test]
    fn closer_edges_clamp_to_zero() {
        let mask = Image::new_fill(3, 1, 1u8);
        let depth = Image::from_vec(3, 1, vec![1.0f32, 4.0, 1.0]).expect("depth");

        let width = estimate_width(&mask.as_view(), &depth.as_view(), Centroid::new(1.0, 0.0))
            .expect("ok")
            .expect("two edges");
        assert_eq!(width, 0.0);
    }

    #[test]
    fn centroid_outside_image_is_rejected() {
        let mask = Image::new_fill(3, 3, 1u8);
        let depth = Image::new_fill(3, 3, 1.0f32);

        for c in [Centroid::new(3.0, 0.0), Centroid::new(0.0, -1.0)] {
            assert_eq!(
                estimate_width(&mask.as_view(), &depth.as_view(), c),
                Err(Error::OutOfBounds)
            );
        }
    }
}
