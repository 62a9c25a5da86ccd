//! Grayscale morphology over label masks.
//!
//! Erosion takes the minimum and dilation the maximum of a square window, so
//! on a multi-class label mask each class boundary moves independently and
//! labels are never blended. Windows are clipped at the image border: pixels
//! outside the image are ignored rather than treated as background, which
//! keeps regions touching the border intact under opening.
//!
//! The square window is separable, so every filter runs a 1D pass over rows
//! followed by one over columns.

use sm_core::{Error, Image, ImageView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SquareKernel {
    size: usize,
}

impl SquareKernel {
    pub fn new(size: usize) -> Result<Self, Error> {
        if size == 0 {
            return Err(Error::InvalidParameter("kernel size must be at least 1"));
        }
        Ok(Self { size })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Window extent before and after the anchor; the anchor sits at `size / 2`.
    fn reach(&self) -> (usize, usize) {
        let before = self.size / 2;
        (before, self.size - 1 - before)
    }
}

#[derive(Debug, Clone, Copy)]
enum Extremum {
    Min,
    Max,
}

impl Extremum {
    fn identity(self) -> u8 {
        match self {
            Self::Min => u8::MAX,
            Self::Max => u8::MIN,
        }
    }

    fn pick(self, a: u8, b: u8) -> u8 {
        match self {
            Self::Min => a.min(b),
            Self::Max => a.max(b),
        }
    }
}

pub fn erode_u8(src: &ImageView<'_, u8>, kernel: SquareKernel) -> Image<u8> {
    rank_filter(src, kernel, Extremum::Min)
}

pub fn dilate_u8(src: &ImageView<'_, u8>, kernel: SquareKernel) -> Image<u8> {
    rank_filter(src, kernel, Extremum::Max)
}

pub fn open_u8(src: &ImageView<'_, u8>, kernel: SquareKernel) -> Image<u8> {
    let eroded = erode_u8(src, kernel);
    dilate_u8(&eroded.as_view(), kernel)
}

pub fn close_u8(src: &ImageView<'_, u8>, kernel: SquareKernel) -> Image<u8> {
    let dilated = dilate_u8(src, kernel);
    erode_u8(&dilated.as_view(), kernel)
}

/// Opening followed by closing: removes specks smaller than the kernel, then
/// fills holes and gaps of the same scale.
pub fn clean_mask(mask: &ImageView<'_, u8>, kernel: SquareKernel) -> Image<u8> {
    let opened = open_u8(mask, kernel);
    let cleaned = close_u8(&opened.as_view(), kernel);

    let changed = mask
        .rows()
        .flatten()
        .zip(cleaned.data())
        .filter(|(a, b)| a != b)
        .count();
    tracing::debug!(
        kernel = kernel.size(),
        changed,
        "cleaned {}x{} mask",
        mask.width(),
        mask.height()
    );

    cleaned
}

fn rank_filter(src: &ImageView<'_, u8>, kernel: SquareKernel, op: Extremum) -> Image<u8> {
    let (width, height) = src.dims();
    if src.is_empty() {
        return Image::new_fill(width, height, 0u8);
    }

    let (before, after) = kernel.reach();

    let mut horizontal = Image::new_fill(width, height, 0u8);
    {
        let mut view = horizontal.as_view_mut();
        for y in 0..height {
            filter_line(src.row(y), view.row_mut(y), before, after, op);
        }
    }

    let mut out = Image::new_fill(width, height, 0u8);
    let mut column = vec![0u8; height];
    let mut filtered = vec![0u8; height];
    for x in 0..width {
        for (y, v) in column.iter_mut().enumerate() {
            *v = horizontal.data()[y * width + x];
        }
        filter_line(&column, &mut filtered, before, after, op);
        for (y, &v) in filtered.iter().enumerate() {
            out.data_mut()[y * width + x] = v;
        }
    }

    out
}

fn filter_line(src: &[u8], dst: &mut [u8], before: usize, after: usize, op: Extremum) {
    let last = src.len() - 1;
    for (i, out) in dst.iter_mut().enumerate() {
        let lo = i.saturating_sub(before);
        let hi = (i + after).min(last);
        *out = src[lo..=hi]
            .iter()
            .fold(op.identity(), |acc, &v| op.pick(acc, v));
    }
}
