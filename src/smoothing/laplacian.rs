//! Laplacian smoothing: 1:2:1 weighted neighbor average.

use super::{validate_polylines, SmoothingStrategy};
use crate::error::BundlingError;
use crate::geometry::{Point2D, Polyline};

/// The cheapest smoothing strategy and the default.
///
/// Each interior point becomes `(prev + 2*current + next) / 4`. Tends to
/// shrink curvature slightly across many iterations. An already-straight,
/// evenly spaced polyline is a fixed point.
#[derive(Debug, Clone, Copy, Default)]
pub struct LaplacianSmoothing;

impl SmoothingStrategy for LaplacianSmoothing {
    fn name(&self) -> &'static str {
        "laplacian"
    }

    fn smooth(&self, polylines: &mut [Polyline], iterations: u32) -> Result<(), BundlingError> {
        validate_polylines(polylines)?;

        for _ in 0..iterations {
            for line in polylines.iter_mut() {
                let len = line.len();
                if len < 3 {
                    continue;
                }

                // Snapshot so every point reads the same pass's input.
                let prev: Vec<Point2D> = line.positions();
                for i in 1..len - 1 {
                    line.points[i].x = (prev[i - 1].x + 2.0 * prev[i].x + prev[i + 1].x) / 4.0;
                    line.points[i].y = (prev[i - 1].y + 2.0 * prev[i].y + prev[i + 1].y) / 4.0;
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::ControlPoint;

    fn zigzag() -> Polyline {
        Polyline::from_points(vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(1.0, 4.0),
            ControlPoint::new(2.0, -4.0),
            ControlPoint::new(3.0, 4.0),
            ControlPoint::new(4.0, 0.0),
        ])
    }

    #[test]
    fn test_pins_endpoints() {
        let mut lines = vec![zigzag()];
        LaplacianSmoothing.smooth(&mut lines, 10).unwrap();

        assert_eq!(lines[0].points[0].position(), Point2D::new(0.0, 0.0));
        assert_eq!(lines[0].points[4].position(), Point2D::new(4.0, 0.0));
    }

    #[test]
    fn test_reduces_jaggedness() {
        let mut lines = vec![zigzag()];
        let before: f32 = lines[0].points.iter().map(|p| p.y.abs()).sum();

        LaplacianSmoothing.smooth(&mut lines, 3).unwrap();
        let after: f32 = lines[0].points.iter().map(|p| p.y.abs()).sum();

        assert!(after < before);
    }

    #[test]
    fn test_straight_line_is_fixed_point() {
        // Evenly spaced collinear points: prev + next == 2 * current.
        let straight: Vec<ControlPoint> = (0..=10)
            .map(|i| ControlPoint::new(i as f32 * 5.0, i as f32 * 2.5))
            .collect();
        let mut lines = vec![Polyline::from_points(straight.clone())];

        LaplacianSmoothing.smooth(&mut lines, 25).unwrap();

        for (smoothed, original) in lines[0].points.iter().zip(&straight) {
            assert!((smoothed.x - original.x).abs() < 1e-4);
            assert!((smoothed.y - original.y).abs() < 1e-4);
        }
    }

    #[test]
    fn test_short_polylines_untouched() {
        let mut lines = vec![Polyline::from_points(vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(1.0, 1.0),
        ])];
        LaplacianSmoothing.smooth(&mut lines, 5).unwrap();
        assert_eq!(lines[0].points[0].position(), Point2D::new(0.0, 0.0));
        assert_eq!(lines[0].points[1].position(), Point2D::new(1.0, 1.0));
    }

    #[test]
    fn test_rejects_non_finite() {
        let mut lines = vec![Polyline::from_points(vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(f32::NAN, 0.0),
            ControlPoint::new(2.0, 0.0),
        ])];
        let err = LaplacianSmoothing.smooth(&mut lines, 1).unwrap_err();
        assert!(matches!(err, BundlingError::InvalidInput(_)));
    }

    #[test]
    fn test_zero_iterations_is_noop() {
        let mut lines = vec![zigzag()];
        let before = lines[0].positions();
        LaplacianSmoothing.smooth(&mut lines, 0).unwrap();
        assert_eq!(lines[0].positions(), before);
    }
}
