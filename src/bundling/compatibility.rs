//! Pairwise edge compatibility scoring.
//!
//! For every unordered edge pair, a score in [0, 1] combines four
//! geometric sub-scores (angle, scale, position, visibility), optionally
//! multiplied by a caller-supplied function evaluated on the original
//! edges. The matrix is symmetric by construction and computed exactly
//! once per bundling pass — never per iteration and never during
//! incremental updates.
//!
//! Cost is O(n²) in the edge count. Callers with large graphs should cap
//! or pre-filter edges before invoking the engine; this is a documented
//! scaling limit of the algorithm.

use super::edge::Edge;
use crate::error::BundlingError;
use crate::geometry::Point2D;

/// Caller-supplied compatibility hook, evaluated once per edge pair.
///
/// The result is a multiplier on the geometric score, clamped to at most
/// 1 so it can only reduce compatibility. Errors propagate to the caller
/// unchanged; the engine does not sandbox user code.
pub type CompatibilityFn = dyn Fn(&Edge, &Edge) -> Result<f32, BundlingError>;

/// Symmetric n×n matrix of pairwise compatibility scores in [0, 1].
///
/// Stored row-major in a flat buffer; the diagonal is unused.
#[derive(Debug, Clone)]
pub struct CompatibilityMatrix {
    size: usize,
    values: Vec<f32>,
}

impl CompatibilityMatrix {
    /// Compute the matrix for an edge set.
    ///
    /// `custom` is invoked once per unordered pair with the original
    /// edges (not control points); its result is clamped to [0, 1] and
    /// multiplied into the geometric score.
    pub fn compute(
        edges: &[Edge],
        custom: Option<&CompatibilityFn>,
    ) -> Result<Self, BundlingError> {
        let n = edges.len();
        let mut values = vec![0.0_f32; n * n];

        for i in 0..n {
            for j in (i + 1)..n {
                let mut score = geometric_compatibility(&edges[i], &edges[j]);
                if let Some(hook) = custom {
                    score *= hook(&edges[i], &edges[j])?.clamp(0.0, 1.0);
                }
                values[i * n + j] = score;
                values[j * n + i] = score;
            }
        }

        Ok(Self { size: n, values })
    }

    /// Number of edges (matrix dimension).
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Score for the pair `(i, j)`. The diagonal reads as 0.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f32 {
        self.values[i * self.size + j]
    }

    /// Number of partners at or above `threshold` for each edge.
    pub fn compatible_counts(&self, threshold: f32) -> Vec<usize> {
        (0..self.size)
            .map(|i| {
                (0..self.size)
                    .filter(|&j| j != i && self.get(i, j) >= threshold)
                    .count()
            })
            .collect()
    }
}

/// Product of the four geometric sub-scores.
///
/// Degenerate (zero-length) edges score 0 against everything: they have
/// no direction to compare and nothing to bundle.
pub fn geometric_compatibility(a: &Edge, b: &Edge) -> f32 {
    let la = a.length();
    let lb = b.length();
    if la <= f32::EPSILON || lb <= f32::EPSILON {
        return 0.0;
    }

    let l_avg = (la + lb) / 2.0;
    angle_compatibility(a, b, la, lb)
        * scale_compatibility(la, lb, l_avg)
        * position_compatibility(a, b, l_avg)
        * visibility_compatibility(a, b, l_avg)
}

/// `|dot(v1, v2)| / (|v1| |v2|)`: parallel or anti-parallel edges score 1,
/// perpendicular edges score 0.
fn angle_compatibility(a: &Edge, b: &Edge, la: f32, lb: f32) -> f32 {
    let (ax, ay) = a.direction();
    let (bx, by) = b.direction();
    ((ax * bx + ay * by) / (la * lb)).abs()
}

/// `2 / (lAvg/min + max/lAvg)`: penalizes large length disparity.
fn scale_compatibility(la: f32, lb: f32, l_avg: f32) -> f32 {
    2.0 / (l_avg / la.min(lb) + la.max(lb) / l_avg)
}

/// Midpoint proximity relative to average length.
fn position_compatibility(a: &Edge, b: &Edge, l_avg: f32) -> f32 {
    l_avg / (l_avg + a.midpoint().distance_to(b.midpoint()))
}

/// Perpendicular-distance visibility: `1 / (1 + perpDist/lAvg)`.
///
/// Uses the mean of both midpoint-to-line distances so the score is
/// symmetric in its arguments, and handles nearly-parallel,
/// non-overlapping edges well. (An axis-aligned bounding-box overlap
/// variant exists in older revisions of this formula; the
/// perpendicular-distance form is canonical here.)
fn visibility_compatibility(a: &Edge, b: &Edge, l_avg: f32) -> f32 {
    let d_ab = perpendicular_distance(a.midpoint(), b.source, b.target);
    let d_ba = perpendicular_distance(b.midpoint(), a.source, a.target);
    let perp = (d_ab + d_ba) / 2.0;
    1.0 / (1.0 + perp / l_avg)
}

/// Distance from `p` to the infinite line through `a` and `b`.
fn perpendicular_distance(p: Point2D, a: Point2D, b: Point2D) -> f32 {
    let len = a.distance_to(b);
    if len <= f32::EPSILON {
        return p.distance_to(a);
    }
    let cross = (b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x);
    cross.abs() / len
}
