/// A mask pixel promoted to geometric space: pixel column, pixel row and the
/// depth sample at that pixel.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MaskPoint {
    pub x: usize,
    pub y: usize,
    pub depth: f32,
}

impl MaskPoint {
    pub fn new(x: usize, y: usize, depth: f32) -> Self {
        Self { x, y, depth }
    }

    /// Coordinates as `[x, y, depth]`, the space clustering works in.
    pub fn to_array(self) -> [f64; 3] {
        [self.x as f64, self.y as f64, f64::from(self.depth)]
    }

    pub fn distance_sq(&self, other: &MaskPoint) -> f64 {
        let a = self.to_array();
        let b = other.to_array();
        a.iter().zip(b.iter()).map(|(p, q)| (p - q) * (p - q)).sum()
    }
}

/// Representative point of a region, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Centroid {
    pub x: f64,
    pub y: f64,
}

impl Centroid {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Integer pixel containing the centroid, or `None` for negative or
    /// non-finite coordinates.
    pub fn pixel(&self) -> Option<(usize, usize)> {
        if !(self.x.is_finite() && self.y.is_finite()) || self.x < 0.0 || self.y < 0.0 {
            return None;
        }
        Some((self.x.floor() as usize, self.y.floor() as usize))
    }
}

#[cfg(test)]
mod tests {
    use super::{Centroid, MaskPoint};

    #[test]
    fn distance_includes_depth_axis() {
        let a = MaskPoint::new(0, 0, 1.0);
        let b = MaskPoint::new(3, 4, 1.0);
        let c = MaskPoint::new(0, 0, 3.0);

        assert!((a.distance_sq(&b) - 25.0).abs() < 1e-12);
        assert!((a.distance_sq(&c) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn centroid_pixel_floors_and_rejects_invalid() {
        assert_eq!(Centroid::new(1.5, 2.99).pixel(), Some((1, 2)));
        assert_eq!(Centroid::new(-0.5, 1.0).pixel(), None);
        assert_eq!(Centroid::new(f64::NAN, 1.0).pixel(), None);
    }
}
