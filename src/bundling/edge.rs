//! Edge input type for the bundling engine.

use serde::{Deserialize, Serialize};

use crate::geometry::Point2D;

/// One edge to bundle: resolved endpoint coordinates plus optional opaque
/// metadata.
///
/// Endpoint resolution from node IDs to coordinates is the caller's
/// responsibility. The engine never inspects `metadata`; it is only
/// forwarded to custom compatibility callbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Source endpoint.
    pub source: Point2D,
    /// Target endpoint.
    pub target: Point2D,
    /// Opaque domain metadata (e.g. a JSON payload).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<String>,
}

impl Edge {
    /// Create an edge without metadata.
    pub fn new(source: Point2D, target: Point2D) -> Self {
        Self {
            source,
            target,
            metadata: None,
        }
    }

    /// Create an edge carrying opaque metadata.
    pub fn with_metadata(source: Point2D, target: Point2D, metadata: String) -> Self {
        Self {
            source,
            target,
            metadata: Some(metadata),
        }
    }

    /// Euclidean length.
    #[inline]
    pub fn length(&self) -> f32 {
        self.source.distance_to(self.target)
    }

    /// Midpoint of the edge.
    #[inline]
    pub fn midpoint(&self) -> Point2D {
        self.source.lerp(self.target, 0.5)
    }

    /// Unnormalized direction vector (target - source).
    #[inline]
    pub fn direction(&self) -> (f32, f32) {
        (
            self.target.x - self.source.x,
            self.target.y - self.source.y,
        )
    }

    /// Check that both endpoints are finite.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.source.is_finite() && self.target.is_finite()
    }
}
