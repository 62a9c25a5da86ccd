use sm_core::{Error, ImageView, MaskPoint, ensure_same_dims};

/// Collects every pixel labeled `target` together with its depth sample.
///
/// Points come out in raster order (row-major, left to right, top to bottom).
/// Dimensions are checked before any pixel is read; an empty result is valid.
pub fn extract_points<L: Copy + PartialEq>(
    mask: &ImageView<'_, L>,
    depth: &ImageView<'_, f32>,
    target: L,
) -> Result<Vec<MaskPoint>, Error> {
    ensure_same_dims(mask, depth)?;

    let mut points = Vec::new();
    for (y, (mask_row, depth_row)) in mask.rows().zip(depth.rows()).enumerate() {
        for (x, (&label, &d)) in mask_row.iter().zip(depth_row).enumerate() {
            if label == target {
                points.push(MaskPoint::new(x, y, d));
            }
        }
    }

    tracing::debug!(
        candidates = points.len(),
        "extracted target pixels from {}x{} mask",
        mask.width(),
        mask.height()
    );
    Ok(points)
}
