//! Iterative force/momentum integrator.
//!
//! Each iteration is a pure, synchronous pass over all edges and all
//! interior control points: accumulate the averaged bundling attraction,
//! the straight-line spring, and the curvature bias, then integrate with
//! momentum. The step size cosine-decays across the pass so movement is
//! coarse early and settles late. Smoothing runs periodically between
//! iterations, plus a doubled final cleanup pass.

use std::f32::consts::PI;

use super::compatibility::CompatibilityMatrix;
use super::config::BundlingConfig;
use super::edge::Edge;
use crate::error::BundlingError;
use crate::geometry::{Point2D, Polyline};
use crate::smoothing::SmoothingStrategy;

/// Peak perpendicular offset of the curvature bias, before the per-edge
/// curve factor and scale are applied.
const CURVE_BASE: f32 = 80.0;

/// Global scale on the curvature bias.
const CURVE_SCALE: f32 = 0.15;

/// Curve factor for edges with no compatible partners. Stronger, so
/// isolated edges stay visually distinguishable from straight lines.
const CURVE_FACTOR_ISOLATED: f32 = 2.0;

/// Curve factor for edges that bundle with at least one partner.
const CURVE_FACTOR_BUNDLED: f32 = 0.7;

/// Distance decay rate of the bundling attraction.
const DISTANCE_DECAY: f32 = 0.001;

/// Minimum distance before a bundling pull contributes; guards the unit
/// vector against coincident points.
const MIN_PULL_DISTANCE: f32 = 1e-6;

/// Runs the bundling simulation over a polyline set.
///
/// Borrows the compatibility matrix and smoothing strategy; owns no
/// polyline state itself, so independent passes never share anything.
pub struct BundlingSimulator<'a> {
    config: &'a BundlingConfig,
    matrix: &'a CompatibilityMatrix,
    smoother: &'a dyn SmoothingStrategy,
}

impl<'a> BundlingSimulator<'a> {
    /// Create a simulator for one bundling pass.
    pub fn new(
        config: &'a BundlingConfig,
        matrix: &'a CompatibilityMatrix,
        smoother: &'a dyn SmoothingStrategy,
    ) -> Self {
        Self {
            config,
            matrix,
            smoother,
        }
    }

    /// Run all iterations plus the final smoothing pass.
    ///
    /// Mutates polylines in place; the pinned endpoints never move.
    pub fn run(&self, edges: &[Edge], polylines: &mut [Polyline]) -> Result<(), BundlingError> {
        self.config.validate()?;
        if edges.len() != polylines.len() {
            return Err(BundlingError::InvalidInput(format!(
                "edge count {} does not match polyline count {}",
                edges.len(),
                polylines.len()
            )));
        }

        let iterations = self.config.iterations;
        let compatible_counts = self
            .matrix
            .compatible_counts(self.config.compatibility_threshold);

        for iteration in 0..iterations {
            // Cosine decay: full stepSize at iteration 0, toward 0 at the end
            let step = self.config.step_size
                * (0.5 + 0.5 * (PI * iteration as f32 / iterations as f32).cos());

            if iteration > 0 && iteration % self.config.smoothing_frequency == 0 {
                self.smoother
                    .smooth(polylines, self.config.smoothing_iterations)?;
            }

            self.step_once(edges, polylines, &compatible_counts, step);
        }

        // Final cleanup: double the periodic smoothing amount
        self.smoother
            .smooth(polylines, self.config.smoothing_iterations * 2)?;

        Ok(())
    }

    /// One force-and-integrate pass over all interior points.
    ///
    /// Forces read a snapshot of positions taken at the start of the
    /// iteration, so results do not depend on edge processing order.
    fn step_once(
        &self,
        edges: &[Edge],
        polylines: &mut [Polyline],
        compatible_counts: &[usize],
        step: f32,
    ) {
        let snapshot: Vec<Vec<Point2D>> = polylines.iter().map(|line| line.positions()).collect();
        let momentum = self.config.momentum;
        let stiffness = self.config.stiffness;

        for (e, line) in polylines.iter_mut().enumerate() {
            let len = line.len();
            if len < 3 {
                continue;
            }

            let edge = &edges[e];
            let (normal_x, normal_y) = perpendicular_normal(edge);
            let curve_factor = if compatible_counts[e] == 0 {
                CURVE_FACTOR_ISOLATED
            } else {
                CURVE_FACTOR_BUNDLED
            };

            for p in 1..len - 1 {
                let t = p as f32 / (len - 1) as f32;
                let current = snapshot[e][p];

                let (mut fx, mut fy) = self.bundling_force(e, p, current, &snapshot);

                // Spring toward the straight-line interpolation keeps
                // unbundled edges roughly straight
                let rest = edge.source.lerp(edge.target, t);
                fx += (rest.x - current.x) * stiffness;
                fy += (rest.y - current.y) * stiffness;

                // Curvature bias along the perpendicular normal, peaking
                // mid-edge, so no edge renders perfectly straight
                let bias = (t * PI).sin() * CURVE_BASE * curve_factor * CURVE_SCALE;
                fx += normal_x * bias;
                fy += normal_y * bias;

                let point = &mut line.points[p];
                point.vx = point.vx * momentum + fx * step * (1.0 - momentum);
                point.vy = point.vy * momentum + fy * step * (1.0 - momentum);
                point.x += point.vx;
                point.y += point.vy;
            }
        }
    }

    /// Averaged, distance-decayed attraction toward compatible edges.
    ///
    /// The accumulated pull is divided by the number of contributing
    /// partners, so edges with many compatible partners are not pulled
    /// disproportionately hard.
    fn bundling_force(
        &self,
        e: usize,
        p: usize,
        current: Point2D,
        snapshot: &[Vec<Point2D>],
    ) -> (f32, f32) {
        let threshold = self.config.compatibility_threshold;
        let mut fx = 0.0;
        let mut fy = 0.0;
        let mut contributors = 0usize;

        for (j, other) in snapshot.iter().enumerate() {
            if j == e || other.is_empty() {
                continue;
            }
            let compatibility = self.matrix.get(e, j);
            if compatibility < threshold {
                continue;
            }

            // Same relative index, clamped when subdivision counts differ
            let q = p.min(other.len() - 1);
            let partner = other[q];
            let dx = partner.x - current.x;
            let dy = partner.y - current.y;
            let distance = (dx * dx + dy * dy).sqrt();
            if distance <= MIN_PULL_DISTANCE {
                continue;
            }

            let weight = compatibility / (1.0 + distance * DISTANCE_DECAY);
            fx += dx / distance * weight;
            fy += dy / distance * weight;
            contributors += 1;
        }

        if contributors > 0 {
            fx /= contributors as f32;
            fy /= contributors as f32;
        }
        (fx, fy)
    }
}

/// Unit perpendicular normal of an edge, or zero for degenerate edges
/// (which then receive no curvature bias).
fn perpendicular_normal(edge: &Edge) -> (f32, f32) {
    let (dx, dy) = edge.direction();
    let len = (dx * dx + dy * dy).sqrt();
    if len <= f32::EPSILON {
        return (0.0, 0.0);
    }
    (-dy / len, dx / len)
}
