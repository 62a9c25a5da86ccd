use sm_core::{Error, Image, ImageView, ensure_same_dims};

/// Clears pixels whose depth strays from the target region's mean depth.
///
/// The mean is taken over pixels labeled `target`; every pixel, of any
/// class, whose depth differs from it by more than `threshold` is set to
/// `L::default()`. Pixels with a non-finite depth are kept. Without any target
/// pixel the mask is returned unchanged.
pub fn depth_clean_mask<L: Copy + PartialEq + Default>(
    mask: &ImageView<'_, L>,
    depth: &ImageView<'_, f32>,
    target: L,
    threshold: f32,
) -> Result<Image<L>, Error> {
    ensure_same_dims(mask, depth)?;
    if threshold.is_nan() || threshold < 0.0 {
        return Err(Error::InvalidParameter(
            "depth clean threshold must be non-negative",
        ));
    }

    let (mut count, mut sum) = (0usize, 0.0f64);
    for (mask_row, depth_row) in mask.rows().zip(depth.rows()) {
        for (&label, &d) in mask_row.iter().zip(depth_row) {
            if label == target {
                count += 1;
                sum += f64::from(d);
            }
        }
    }

    if count == 0 {
        tracing::warn!("no target pixels; skipping depth cleaning");
        return Ok(mask.to_image());
    }

    let mean = sum / count as f64;
    let threshold = f64::from(threshold);
    let mut data = Vec::with_capacity(mask.width() * mask.height());
    let mut removed = 0usize;
    for (mask_row, depth_row) in mask.rows().zip(depth.rows()) {
        for (&label, &d) in mask_row.iter().zip(depth_row) {
            if (f64::from(d) - mean).abs() > threshold {
                if label != L::default() {
                    removed += 1;
                }
                data.push(L::default());
            } else {
                data.push(label);
            }
        }
    }

    tracing::debug!(mean_depth = mean, removed, "depth-cleaned mask");

    Image::from_vec(mask.width(), mask.height(), data)
}
