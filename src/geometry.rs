//! Angle bookkeeping for radar charts and the polar-to-pixel projection.

use std::f64::consts::PI;

use crate::error::{PipelineError, PipelineResult};

/// Evenly spaced axis angles for `n` indicators.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleSet {
    angles: Vec<f64>,
}

impl AngleSet {
    pub fn new(n: usize) -> PipelineResult<AngleSet> {
        if n < 3 {
            return Err(PipelineError::TooFewIndicators { count: n });
        }
        let angles = (0..n).map(|i| i as f64 / n as f64 * 2.0 * PI).collect();
        Ok(AngleSet { angles })
    }

    /// One angle per axis, starting at 0.
    pub fn angles(&self) -> &[f64] {
        &self.angles
    }

    /// Axis angles with the first repeated at the end, so a polygon closes.
    pub fn closed(&self) -> Vec<f64> {
        close_loop(&self.angles)
    }
}

// repeat the first value at the end
pub fn close_loop(values: &[f64]) -> Vec<f64> {
    let mut closed = values.to_vec();
    if let Some(&first) = values.first() {
        closed.push(first);
    }
    closed
}

/// Maps a polar point onto pixel space.
///
/// Angle 0 points east and angles grow counter-clockwise. Pixel y grows
/// downward, so the sine term is subtracted. `r` is clamped to `[0, r_max]`.
pub fn project(center: (i32, i32), radius_px: f64, angle: f64, r: f64, r_max: f64) -> (i32, i32) {
    let r = if r.is_finite() { r.clamp(0.0, r_max) } else { 0.0 };
    let dist = radius_px * r / r_max;
    let x = center.0 as f64 + dist * angle.cos();
    let y = center.1 as f64 - dist * angle.sin();
    (x.round() as i32, y.round() as i32)
}

/// Pixel outline of one group's closed polygon.
pub fn polygon_points(
    center: (i32, i32),
    radius_px: f64,
    angles: &AngleSet,
    values: &[f64],
    r_max: f64,
) -> Vec<(i32, i32)> {
    angles
        .closed()
        .iter()
        .zip(close_loop(values))
        .map(|(&angle, r)| project(center, radius_px, angle, r, r_max))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nine_indicators() {
        let set = AngleSet::new(9).unwrap();
        let closed = set.closed();

        assert_eq!(closed.len(), 10);
        assert_eq!(closed[0], 0.0);
        assert_eq!(closed[9], 0.0);
        assert!((closed[1] - 2.0 * PI / 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_even_spacing() {
        for n in 3..20 {
            let set = AngleSet::new(n).unwrap();
            let closed = set.closed();
            assert_eq!(closed.len(), n + 1);
            assert_eq!(closed.first(), closed.last());
            for pair in set.angles().windows(2) {
                assert!((pair[1] - pair[0] - 2.0 * PI / n as f64).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_too_few_indicators() {
        assert!(matches!(AngleSet::new(2), Err(PipelineError::TooFewIndicators { count: 2 })));
        assert!(AngleSet::new(0).is_err());
    }

    #[test]
    fn test_close_loop() {
        assert_eq!(close_loop(&[0.3, 1.0, 0.5]), vec![0.3, 1.0, 0.5, 0.3]);
        assert!(close_loop(&[]).is_empty());
    }

    #[test]
    fn test_project() {
        let center = (100, 100);
        // east, north and west at full radius
        assert_eq!(project(center, 50.0, 0.0, 1.0, 1.0), (150, 100));
        assert_eq!(project(center, 50.0, PI / 2.0, 1.0, 1.0), (100, 50));
        assert_eq!(project(center, 50.0, PI, 1.0, 1.0), (50, 100));
        // clamped on both ends
        assert_eq!(project(center, 50.0, 0.0, 5.0, 1.0), (150, 100));
        assert_eq!(project(center, 50.0, 0.0, -1.0, 1.0), center);
        assert_eq!(project(center, 50.0, 0.0, f64::NAN, 1.0), center);
    }

    #[test]
    fn test_polygon_is_closed() {
        let set = AngleSet::new(4).unwrap();
        let points = polygon_points((0, 0), 110.0, &set, &[1.1, 0.55, 1.1, 0.0], 1.1);

        assert_eq!(points.len(), 5);
        assert_eq!(points[0], points[4]);
        assert_eq!(points[0], (110, 0));
        assert_eq!(points[1], (0, -55));
        assert_eq!(points[3], (0, 0));
    }
}
