//! Control point initialization: subdivide edges into interpolated points.

use super::config::BundlingConfig;
use super::edge::Edge;
use crate::geometry::{ControlPoint, Polyline};

/// Edge length above which adaptive subdivision starts adding points.
const ADAPTIVE_LENGTH_THRESHOLD: f32 = 100.0;

/// Units of edge length per extra control point beyond the threshold.
const ADAPTIVE_UNITS_PER_POINT: f32 = 30.0;

/// Number of segments for one edge.
///
/// With adaptive subdivision enabled, edges longer than 100 units gain
/// `floor((length - 100) / 30)` extra segments so long edges stay smooth.
/// Edges of equal length always receive equal counts.
pub fn subdivision_count(edge: &Edge, base: u32, adaptive: bool) -> u32 {
    if !adaptive {
        return base;
    }
    let length = edge.length();
    if length > ADAPTIVE_LENGTH_THRESHOLD {
        base + ((length - ADAPTIVE_LENGTH_THRESHOLD) / ADAPTIVE_UNITS_PER_POINT).floor() as u32
    } else {
        base
    }
}

/// Subdivide an edge into `segments + 1` control points at `t = i / segments`,
/// all at rest (zero velocity).
///
/// The endpoints are written exactly from the edge, so they match the
/// source and target bit-for-bit regardless of interpolation rounding.
/// Zero-length edges produce coincident points without error.
pub fn initialize_polyline(edge: &Edge, segments: u32) -> Polyline {
    let segments = segments.max(1);
    let mut points = Vec::with_capacity(segments as usize + 1);

    for i in 0..=segments {
        let t = i as f32 / segments as f32;
        points.push(ControlPoint::at(edge.source.lerp(edge.target, t)));
    }

    points[0] = ControlPoint::at(edge.source);
    let last = points.len() - 1;
    points[last] = ControlPoint::at(edge.target);

    Polyline::from_points(points)
}

/// Initialize polylines for a whole edge set according to the config.
pub fn initialize_all(edges: &[Edge], config: &BundlingConfig) -> Vec<Polyline> {
    edges
        .iter()
        .map(|edge| {
            let segments =
                subdivision_count(edge, config.subdivisions, config.adaptive_subdivision);
            initialize_polyline(edge, segments)
        })
        .collect()
}
