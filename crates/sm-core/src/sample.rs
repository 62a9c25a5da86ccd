use crate::Error;
use crate::image::{Image, ImageView};

/// Resizes with nearest-neighbor sampling.
///
/// Destination pixel `d` reads source pixel `floor(d * src_len / dst_len)` on
/// each axis, so upscaling repeats pixels and downscaling drops them.
pub fn resize_nearest<T: Copy>(
    src: &ImageView<'_, T>,
    width: usize,
    height: usize,
) -> Result<Image<T>, Error> {
    if width == 0 || height == 0 {
        return Image::from_vec(width, height, Vec::new());
    }
    if src.is_empty() {
        return Err(Error::OutOfBounds);
    }

    let xs: Vec<usize> = (0..width).map(|x| nearest_index(x, src.width(), width)).collect();
    let mut data = Vec::with_capacity(width * height);
    for y in 0..height {
        let row = src.row(nearest_index(y, src.height(), height));
        data.extend(xs.iter().map(|&sx| row[sx]));
    }

    Image::from_vec(width, height, data)
}

fn nearest_index(dst: usize, src_len: usize, dst_len: usize) -> usize {
    let idx = (dst as u128 * src_len as u128 / dst_len as u128) as usize;
    idx.min(src_len - 1)
}

#[cfg(test)]
mod tests {
    use super::resize_nearest;
    use crate::Image;

    #[test]
    fn upscale_repeats_pixels() {
        let img = Image::from_vec(2, 2, vec![1.0f32, 2.0, 3.0, 4.0]).expect("valid image");
        let out = resize_nearest(&img.as_view(), 4, 4).expect("resize");

        assert_eq!(
            out.data(),
            &[
                1.0, 1.0, 2.0, 2.0, //
                1.0, 1.0, 2.0, 2.0, //
                3.0, 3.0, 4.0, 4.0, //
                3.0, 3.0, 4.0, 4.0,
            ]
        );
    }

    #[test]
    fn downscale_picks_floor_samples() {
        let img = Image::from_fn(6, 3, |x, y| (x + 10 * y) as u8);
        let out = resize_nearest(&img.as_view(), 3, 1).expect("resize");

        assert_eq!(out.data(), &[0, 2, 4]);
    }

    #[test]
    fn empty_source_cannot_be_upscaled() {
        let img = Image::<u8>::from_vec(0, 0, Vec::new()).expect("empty image");
        assert!(resize_nearest(&img.as_view(), 2, 2).is_err());
        assert_eq!(resize_nearest(&img.as_view(), 0, 5).expect("empty out").dims(), (0, 5));
    }
}
