//! Foundational primitives for segmentation mask post-processing.
//!
//! ## Image Views and Stride
//! Images use element stride (not byte stride). `stride` is the distance, in
//! elements, between adjacent row starts and may be greater than `width`.
//! Borrowed views over padded buffers and subviews read the same way as owned
//! images, and every pixel access is bounds-checked.
//!
//! ## Coordinates
//! `x` is the pixel column and `y` the pixel row. A label mask and its depth
//! map are co-registered: pixel `(x, y)` of one corresponds to pixel `(x, y)`
//! of the other, which [`ensure_same_dims`] enforces.

mod error;
mod geom;
mod image;
mod sample;

pub use error::Error;
pub use geom::{Centroid, MaskPoint};
pub use image::{Image, ImageView, ImageViewMut, ensure_same_dims};
pub use sample::resize_nearest;
