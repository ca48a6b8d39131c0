//! Bundling pass orchestration.
//!
//! `BundlingEngine` owns the per-instance state of one call site: the
//! edge set, the bundled polylines, and the optional custom compatibility
//! hook. There is no process-wide state; independent engines never share
//! anything.

use super::compatibility::{CompatibilityFn, CompatibilityMatrix};
use super::config::BundlingConfig;
use super::edge::Edge;
use super::incremental;
use super::init;
use super::simulator::BundlingSimulator;
use crate::error::BundlingError;
use crate::geometry::{Point2D, Polyline};

/// Owns one edge set and its bundled polylines.
///
/// A full pass (`bundle`) runs initializer → compatibility matrix →
/// simulator → final smoothing, then commits the result. On failure
/// nothing is mutated, so callers never observe a half-bundled state.
pub struct BundlingEngine {
    config: BundlingConfig,
    edges: Vec<Edge>,
    polylines: Vec<Polyline>,
    custom_compatibility: Option<Box<CompatibilityFn>>,
}

impl BundlingEngine {
    /// Create an engine with the default configuration.
    pub fn new() -> Self {
        Self {
            config: BundlingConfig::default(),
            edges: Vec::new(),
            polylines: Vec::new(),
            custom_compatibility: None,
        }
    }

    /// Create an engine with an explicit, validated configuration.
    pub fn with_config(config: BundlingConfig) -> Result<Self, BundlingError> {
        config.validate()?;
        Ok(Self {
            config,
            edges: Vec::new(),
            polylines: Vec::new(),
            custom_compatibility: None,
        })
    }

    /// Replace the configuration. Fails fast on invalid values; existing
    /// polylines are kept until the next pass.
    pub fn set_config(&mut self, config: BundlingConfig) -> Result<(), BundlingError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    /// The active configuration.
    pub fn config(&self) -> &BundlingConfig {
        &self.config
    }

    // =========================================================================
    // Edge Management
    // =========================================================================

    /// Replace the edge set. Clears any previously bundled polylines.
    pub fn set_edges(&mut self, edges: Vec<Edge>) -> Result<(), BundlingError> {
        for (i, edge) in edges.iter().enumerate() {
            if !edge.is_finite() {
                return Err(BundlingError::InvalidInput(format!(
                    "edge {i} contains a non-finite coordinate"
                )));
            }
        }
        self.edges = edges;
        self.polylines.clear();
        Ok(())
    }

    /// Attach opaque metadata to an edge. Returns false if the index is
    /// out of range.
    pub fn set_edge_metadata(&mut self, index: usize, metadata: String) -> bool {
        match self.edges.get_mut(index) {
            Some(edge) => {
                edge.metadata = Some(metadata);
                true
            }
            None => false,
        }
    }

    /// Number of edges.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Install a custom compatibility hook, multiplied into the
    /// geometric score once per edge pair.
    pub fn set_custom_compatibility(&mut self, hook: Box<CompatibilityFn>) {
        self.custom_compatibility = Some(hook);
    }

    /// Remove the custom compatibility hook.
    pub fn clear_custom_compatibility(&mut self) {
        self.custom_compatibility = None;
    }

    // =========================================================================
    // Bundling
    // =========================================================================

    /// Run a full bundling pass over the current edge set.
    ///
    /// The previous polylines are replaced only if the whole pass
    /// succeeds.
    pub fn bundle(&mut self) -> Result<(), BundlingError> {
        self.config.validate()?;

        let mut polylines = init::initialize_all(&self.edges, &self.config);
        let matrix =
            CompatibilityMatrix::compute(&self.edges, self.custom_compatibility.as_deref())?;
        let smoother = self.config.smoothing.create();
        BundlingSimulator::new(&self.config, &matrix, smoother.as_ref())
            .run(&self.edges, &mut polylines)?;

        self.polylines = polylines;
        Ok(())
    }

    /// Translate existing polylines to follow moved endpoints, without
    /// re-running the simulation. Also updates the stored edges so a
    /// later full pass sees the current geometry.
    pub fn update_endpoints(
        &mut self,
        endpoints: &[(Point2D, Point2D)],
    ) -> Result<(), BundlingError> {
        if endpoints.len() != self.edges.len() {
            return Err(BundlingError::InvalidInput(format!(
                "endpoint count {} does not match edge count {}",
                endpoints.len(),
                self.edges.len()
            )));
        }

        incremental::update_endpoints(&mut self.polylines, endpoints)?;

        for (edge, &(source, target)) in self.edges.iter_mut().zip(endpoints) {
            edge.source = source;
            edge.target = target;
        }
        Ok(())
    }

    // =========================================================================
    // Exports (velocity-free)
    // =========================================================================

    /// Number of bundled polylines (0 before the first pass).
    pub fn polyline_count(&self) -> usize {
        self.polylines.len()
    }

    /// Velocity-free positions for one polyline.
    pub fn polyline_positions(&self, index: usize) -> Option<Vec<Point2D>> {
        self.polylines.get(index).map(|line| line.positions())
    }

    /// Per-polyline start offsets into the flat control point buffer,
    /// counted in points. `offsets.len() == polyline_count + 1`; the last
    /// entry is the total point count.
    pub fn polyline_offsets(&self) -> Vec<u32> {
        let mut offsets = Vec::with_capacity(self.polylines.len() + 1);
        let mut total = 0u32;
        offsets.push(0);
        for line in &self.polylines {
            total += line.len() as u32;
            offsets.push(total);
        }
        offsets
    }

    /// All control point positions interleaved as `[x0, y0, x1, y1, ...]`,
    /// polyline by polyline. Velocities are stripped.
    pub fn control_points_flat(&self) -> Vec<f32> {
        let total: usize = self.polylines.iter().map(|line| line.len()).sum();
        let mut flat = Vec::with_capacity(total * 2);
        for line in &self.polylines {
            for point in &line.points {
                flat.push(point.x);
                flat.push(point.y);
            }
        }
        flat
    }

    /// Clear edges, polylines, and the custom hook.
    pub fn clear(&mut self) {
        self.edges.clear();
        self.polylines.clear();
        self.custom_compatibility = None;
    }
}

impl Default for BundlingEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge(sx: f32, sy: f32, tx: f32, ty: f32) -> Edge {
        Edge::new(Point2D::new(sx, sy), Point2D::new(tx, ty))
    }

    fn test_config() -> BundlingConfig {
        BundlingConfig {
            subdivisions: 10,
            adaptive_subdivision: false,
            compatibility_threshold: 0.1,
            iterations: 30,
            ..Default::default()
        }
    }

    #[test]
    fn test_full_pass_pins_endpoints() {
        let mut engine = BundlingEngine::with_config(test_config()).unwrap();
        let edges = vec![edge(0.0, 0.0, 100.0, 0.0), edge(0.0, 10.0, 100.0, 10.0)];
        engine.set_edges(edges.clone()).unwrap();
        engine.bundle().unwrap();

        assert_eq!(engine.polyline_count(), 2);
        for (i, e) in edges.iter().enumerate() {
            let positions = engine.polyline_positions(i).unwrap();
            assert_eq!(positions[0], e.source);
            assert_eq!(*positions.last().unwrap(), e.target);
        }
    }

    #[test]
    fn test_set_edges_rejects_non_finite() {
        let mut engine = BundlingEngine::new();
        let err = engine
            .set_edges(vec![edge(f32::NAN, 0.0, 1.0, 1.0)])
            .unwrap_err();
        assert!(matches!(err, BundlingError::InvalidInput(_)));
        assert_eq!(engine.edge_count(), 0);
    }

    #[test]
    fn test_invalid_config_rejected_before_work() {
        let bad = BundlingConfig {
            step_size: f32::NAN,
            ..Default::default()
        };
        assert!(BundlingEngine::with_config(bad.clone()).is_err());

        let mut engine = BundlingEngine::new();
        assert!(engine.set_config(bad).is_err());
        // The engine keeps its previous (valid) config
        assert!(engine.config().step_size.is_finite());
    }

    #[test]
    fn test_failed_pass_commits_nothing() {
        let mut engine = BundlingEngine::with_config(test_config()).unwrap();
        engine
            .set_edges(vec![edge(0.0, 0.0, 100.0, 0.0), edge(0.0, 5.0, 100.0, 5.0)])
            .unwrap();
        engine.bundle().unwrap();
        let before = engine.polyline_positions(0).unwrap();

        // A failing custom hook aborts the next pass
        engine.set_custom_compatibility(Box::new(|_, _| {
            Err(BundlingError::CompatibilityCallback("boom".into()))
        }));
        assert!(engine.bundle().is_err());

        // Previous polylines are untouched
        assert_eq!(engine.polyline_positions(0).unwrap(), before);
    }

    #[test]
    fn test_flat_exports_are_consistent() {
        let mut engine = BundlingEngine::with_config(test_config()).unwrap();
        engine
            .set_edges(vec![edge(0.0, 0.0, 100.0, 0.0), edge(0.0, 10.0, 100.0, 10.0)])
            .unwrap();
        engine.bundle().unwrap();

        let offsets = engine.polyline_offsets();
        let flat = engine.control_points_flat();

        assert_eq!(offsets.len(), 3);
        assert_eq!(offsets[0], 0);
        assert_eq!(offsets[2] as usize * 2, flat.len());

        // First polyline's first point is edge 0's source
        assert_eq!(flat[0], 0.0);
        assert_eq!(flat[1], 0.0);
        // Second polyline starts at offsets[1]
        let start = offsets[1] as usize * 2;
        assert_eq!(flat[start], 0.0);
        assert_eq!(flat[start + 1], 10.0);
    }

    #[test]
    fn test_update_endpoints_moves_polylines_and_edges() {
        let mut engine = BundlingEngine::with_config(test_config()).unwrap();
        engine
            .set_edges(vec![edge(0.0, 0.0, 100.0, 0.0)])
            .unwrap();
        engine.bundle().unwrap();
        let before = engine.polyline_positions(0).unwrap();

        let endpoints = [(Point2D::new(10.0, 20.0), Point2D::new(110.0, 20.0))];
        engine.update_endpoints(&endpoints).unwrap();

        let after = engine.polyline_positions(0).unwrap();
        for (a, b) in after.iter().zip(&before) {
            assert!((a.x - (b.x + 10.0)).abs() < 1e-4);
            assert!((a.y - (b.y + 20.0)).abs() < 1e-4);
        }
        assert_eq!(after[0], Point2D::new(10.0, 20.0));
    }

    #[test]
    fn test_update_endpoints_count_mismatch() {
        let mut engine = BundlingEngine::with_config(test_config()).unwrap();
        engine
            .set_edges(vec![edge(0.0, 0.0, 100.0, 0.0)])
            .unwrap();
        engine.bundle().unwrap();

        let err = engine.update_endpoints(&[]).unwrap_err();
        assert!(matches!(err, BundlingError::InvalidInput(_)));
    }

    #[test]
    fn test_metadata_reaches_custom_hook() {
        let mut engine = BundlingEngine::with_config(test_config()).unwrap();
        engine
            .set_edges(vec![edge(0.0, 0.0, 100.0, 0.0), edge(0.0, 5.0, 100.0, 5.0)])
            .unwrap();
        assert!(engine.set_edge_metadata(0, "a".into()));
        assert!(engine.set_edge_metadata(1, "b".into()));
        assert!(!engine.set_edge_metadata(7, "x".into()));

        // Different metadata: compatibility zero, so the edges bundle as
        // if isolated and their midpoints keep a clear separation
        engine.set_custom_compatibility(Box::new(|a, b| {
            Ok(if a.metadata == b.metadata { 1.0 } else { 0.0 })
        }));
        engine.bundle().unwrap();

        let mid_a = engine.polyline_positions(0).unwrap()[5];
        let mid_b = engine.polyline_positions(1).unwrap()[5];
        assert!(mid_a.distance_to(mid_b) > 1.0);
    }

    #[test]
    fn test_clear() {
        let mut engine = BundlingEngine::with_config(test_config()).unwrap();
        engine
            .set_edges(vec![edge(0.0, 0.0, 100.0, 0.0)])
            .unwrap();
        engine.bundle().unwrap();

        engine.clear();
        assert_eq!(engine.edge_count(), 0);
        assert_eq!(engine.polyline_count(), 0);
    }
}
