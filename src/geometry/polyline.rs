//! Polyline and control point types.
//!
//! Each edge is represented internally as an ordered polyline of control
//! points. The first and last point are pinned to the edge's source and
//! target and are never moved by the simulation or the smoothing stage.

use super::point::Point2D;

/// One vertex of an edge's internal polyline.
///
/// `vx`/`vy` are simulation velocity, used only for momentum integration.
/// They are internal state and are stripped by every export path.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ControlPoint {
    /// X position.
    pub x: f32,
    /// Y position.
    pub y: f32,
    /// X velocity (simulation-local).
    pub vx: f32,
    /// Y velocity (simulation-local).
    pub vy: f32,
}

impl ControlPoint {
    /// Create a control point at rest (zero velocity).
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            vx: 0.0,
            vy: 0.0,
        }
    }

    /// Create a control point at rest from a point.
    #[inline]
    pub fn at(point: Point2D) -> Self {
        Self::new(point.x, point.y)
    }

    /// Position without velocity.
    #[inline]
    pub fn position(self) -> Point2D {
        Point2D::new(self.x, self.y)
    }
}

/// Ordered control points for one edge.
#[derive(Debug, Clone, Default)]
pub struct Polyline {
    /// Control points; index 0 and `len - 1` are pinned to the edge endpoints.
    pub points: Vec<ControlPoint>,
}

impl Polyline {
    /// Create a polyline from existing control points.
    pub fn from_points(points: Vec<ControlPoint>) -> Self {
        Self { points }
    }

    /// Number of control points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the polyline has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The pinned source position (first point).
    pub fn source(&self) -> Option<Point2D> {
        self.points.first().map(|p| p.position())
    }

    /// The pinned target position (last point).
    pub fn target(&self) -> Option<Point2D> {
        self.points.last().map(|p| p.position())
    }

    /// Velocity-free positions, suitable for handing to a renderer.
    pub fn positions(&self) -> Vec<Point2D> {
        self.points.iter().map(|p| p.position()).collect()
    }

    /// Check that every point has finite coordinates.
    pub fn is_finite(&self) -> bool {
        self.points.iter().all(|p| p.position().is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions_strip_velocity() {
        let mut cp = ControlPoint::new(1.0, 2.0);
        cp.vx = 5.0;
        cp.vy = -3.0;
        let line = Polyline::from_points(vec![cp]);

        let positions = line.positions();
        assert_eq!(positions, vec![Point2D::new(1.0, 2.0)]);
    }

    #[test]
    fn test_source_target() {
        let line = Polyline::from_points(vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(5.0, 5.0),
            ControlPoint::new(10.0, 0.0),
        ]);
        assert_eq!(line.source(), Some(Point2D::new(0.0, 0.0)));
        assert_eq!(line.target(), Some(Point2D::new(10.0, 0.0)));
        assert_eq!(line.len(), 3);
    }

    #[test]
    fn test_is_finite() {
        let mut line = Polyline::from_points(vec![
            ControlPoint::new(0.0, 0.0),
            ControlPoint::new(1.0, 1.0),
        ]);
        assert!(line.is_finite());

        line.points[1].y = f32::NAN;
        assert!(!line.is_finite());
    }
}
