//! Incremental endpoint updates.
//!
//! When node positions move (drag, force simulation), existing bundled
//! polylines are translated to follow the new endpoints instead of
//! re-running the simulation. Each point moves by the endpoint deltas
//! interpolated across the polyline, preserving the relative bundled
//! shape. Runs in O(edges × subdivisions) and is safe to call every
//! animation frame: it depends only on the previous polyline state and
//! the current endpoint deltas.

use crate::error::BundlingError;
use crate::geometry::{ControlPoint, Point2D, Polyline};

/// Move polylines to follow new endpoint positions.
///
/// `endpoints[i]` is the new `(source, target)` pair for polyline `i`.
/// Interior point `j` moves by `deltaSource*(1-t) + deltaTarget*t` with
/// `t = j/(len-1)`; the endpoints themselves are re-pinned exactly.
/// Neither the compatibility matrix nor the simulation is touched.
pub fn update_endpoints(
    polylines: &mut [Polyline],
    endpoints: &[(Point2D, Point2D)],
) -> Result<(), BundlingError> {
    if polylines.len() != endpoints.len() {
        return Err(BundlingError::InvalidInput(format!(
            "endpoint count {} does not match polyline count {}",
            endpoints.len(),
            polylines.len()
        )));
    }
    for (i, &(source, target)) in endpoints.iter().enumerate() {
        if !source.is_finite() || !target.is_finite() {
            return Err(BundlingError::InvalidInput(format!(
                "endpoint {i} contains a non-finite coordinate"
            )));
        }
    }

    for (line, &(source, target)) in polylines.iter_mut().zip(endpoints) {
        let len = line.len();
        if len == 0 {
            continue;
        }
        if len == 1 {
            line.points[0] = ControlPoint::at(source);
            continue;
        }

        let first = line.points[0].position();
        let last = line.points[len - 1].position();
        let delta_source = (source.x - first.x, source.y - first.y);
        let delta_target = (target.x - last.x, target.y - last.y);

        for (j, point) in line.points.iter_mut().enumerate() {
            let t = j as f32 / (len - 1) as f32;
            point.x += delta_source.0 * (1.0 - t) + delta_target.0 * t;
            point.y += delta_source.1 * (1.0 - t) + delta_target.1 * t;
        }

        // Re-pin exactly against interpolation rounding
        let (vx, vy) = (line.points[0].vx, line.points[0].vy);
        line.points[0] = ControlPoint {
            x: source.x,
            y: source.y,
            vx,
            vy,
        };
        let (vx, vy) = (line.points[len - 1].vx, line.points[len - 1].vy);
        line.points[len - 1] = ControlPoint {
            x: target.x,
            y: target.y,
            vx,
            vy,
        };
    }

    Ok(())
}
