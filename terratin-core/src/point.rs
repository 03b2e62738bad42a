//! Sample points and error metrics

use serde::{Deserialize, Serialize};

/// Index of a sample point in its grid arena
pub type PointId = usize;

/// A single elevation sample on the grid.
///
/// Identity is the `(x, y)` coordinate pair; `estimate` and `error` are
/// interpolation state written by whichever TIN snapshot currently owns the
/// point's containing triangle. Both stay zero while the point is a
/// triangulation vertex.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    pub x: u32,
    pub y: u32,
    pub value: f64,
    pub estimate: f64,
    pub error: f64,
}

impl SamplePoint {
    pub fn new(x: u32, y: u32, value: f64) -> Self {
        Self {
            x,
            y,
            value,
            estimate: 0.0,
            error: 0.0,
        }
    }

    /// Planar position of the sample
    pub fn coords(&self) -> (f64, f64) {
        (self.x as f64, self.y as f64)
    }

    /// Record a fresh interpolation estimate, replacing any previous error
    pub fn set_estimate(&mut self, estimate: f64) {
        self.estimate = estimate;
        self.error = relative_error(self.value, estimate);
    }

    /// Clear interpolation state when the point becomes a triangulation vertex
    pub fn reset_error(&mut self) {
        self.estimate = 0.0;
        self.error = 0.0;
    }
}

/// Relative deviation of an estimate from the true sample value.
///
/// Zero-valued samples would make the relative formula divide by zero, so
/// they fall back to the absolute deviation.
pub fn relative_error(value: f64, estimate: f64) -> f64 {
    if value != 0.0 {
        ((estimate - value) / value).abs()
    } else {
        estimate.abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_set_estimate_computes_relative_error() {
        let mut point = SamplePoint::new(1, 2, 10.0);
        point.set_estimate(12.0);
        assert_eq!(point.estimate, 12.0);
        assert_relative_eq!(point.error, 0.2);
    }

    #[test]
    fn test_reset_error() {
        let mut point = SamplePoint::new(0, 0, 5.0);
        point.set_estimate(4.0);
        point.reset_error();
        assert_eq!(point.estimate, 0.0);
        assert_eq!(point.error, 0.0);
    }

    #[test]
    fn test_relative_error_zero_value_falls_back_to_absolute() {
        assert_eq!(relative_error(0.0, 3.0), 3.0);
        assert_eq!(relative_error(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_relative_error_negative_value() {
        assert_relative_eq!(relative_error(-4.0, -5.0), 0.25);
    }
}
