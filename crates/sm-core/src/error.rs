use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    SizeMismatch {
        expected: usize,
        actual: usize,
    },
    /// Mask and depth map differ in width or height, as `(width, height)`.
    DimensionMismatch {
        mask: (usize, usize),
        depth: (usize, usize),
    },
    /// Median of an empty point set.
    EmptyInput,
    OutOfBounds,
    InvalidStride,
    InvalidParameter(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { expected, actual } => {
                write!(f, "size mismatch: expected {expected}, got {actual}")
            }
            Self::DimensionMismatch { mask, depth } => write!(
                f,
                "dimension mismatch: mask is {}x{}, depth map is {}x{}",
                mask.0, mask.1, depth.0, depth.1
            ),
            Self::EmptyInput => write!(f, "no pixels matched the target label"),
            Self::OutOfBounds => write!(f, "out of bounds"),
            Self::InvalidStride => write!(f, "invalid stride"),
            Self::InvalidParameter(what) => write!(f, "invalid parameter: {what}"),
        }
    }
}

impl std::error::Error for Error {}
