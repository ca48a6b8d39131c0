//! Edge Bundler - WASM Module
//!
//! Force-directed edge bundling for knowledge-graph visualization. Takes
//! a set of edges (resolved source/target coordinates, optional opaque
//! metadata) and computes, per edge, a smooth polyline pulled toward
//! geometrically and semantically compatible edges, so dense crossing
//! connections render as legible bundles instead of a tangle of straight
//! lines. Compiled to WebAssembly and exposed via wasm-bindgen; the full
//! algorithm is also usable as a plain Rust library.
//!
//! # Architecture
//!
//! - `geometry`: point, control point, and polyline primitives
//! - `bundling`: initializer, compatibility matrix, simulator,
//!   incremental updater, and the per-instance engine
//! - `smoothing`: pluggable Laplacian/Gaussian/Bilateral strategies
//!
//! Rendering (basis splines, Catmull-Rom, canvas/WebGL backends) is the
//! caller's concern: this module hands back velocity-free control point
//! polylines and nothing else.

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod bundling;
pub mod error;
pub mod geometry;
pub mod smoothing;

use bundling::{BundlingEngine, Edge};
use error::BundlingError;
use geometry::Point2D;

/// Edge counts above this trigger a console warning about the O(n²)
/// compatibility matrix.
#[cfg(target_arch = "wasm32")]
const QUADRATIC_WARN_EDGE_COUNT: usize = 2000;

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Main entry point for the edge bundling engine.
///
/// Wraps the internal BundlingEngine and provides the public API exposed
/// to JavaScript. Each instance owns its own edge set and polylines;
/// instances share no state.
#[wasm_bindgen]
pub struct EdgeBundlerWasm {
    engine: BundlingEngine,
}

#[wasm_bindgen]
impl EdgeBundlerWasm {
    /// Create a bundler with the default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self {
            engine: BundlingEngine::new(),
        }
    }

    /// Create a bundler from a configuration object.
    ///
    /// The object uses camelCase keys (`subdivisions`,
    /// `compatibilityThreshold`, `stepSize`, ...); missing fields take
    /// their defaults. Throws on invalid values.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config: JsValue) -> Result<EdgeBundlerWasm, JsError> {
        let config: bundling::BundlingConfig =
            serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))?;
        Ok(Self {
            engine: BundlingEngine::with_config(config)?,
        })
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    /// Replace the configuration. Throws on invalid values; the previous
    /// configuration is kept in that case.
    #[wasm_bindgen(js_name = setConfig)]
    pub fn set_config(&mut self, config: JsValue) -> Result<(), JsError> {
        let config: bundling::BundlingConfig =
            serde_wasm_bindgen::from_value(config).map_err(|e| JsError::new(&e.to_string()))?;
        self.engine.set_config(config)?;
        Ok(())
    }

    /// Get the active configuration as a plain object.
    #[wasm_bindgen(js_name = getConfig)]
    pub fn get_config(&self) -> Result<JsValue, JsError> {
        serde_wasm_bindgen::to_value(self.engine.config()).map_err(|e| JsError::new(&e.to_string()))
    }

    // =========================================================================
    // Edge Operations
    // =========================================================================

    /// Replace the edge set from a flat Float32Array.
    ///
    /// The array is `[sx0, sy0, tx0, ty0, sx1, sy1, ...]` — four floats
    /// per edge, already resolved to coordinates. Clears any previously
    /// bundled polylines. Returns the number of edges.
    #[wasm_bindgen(js_name = setEdges)]
    pub fn set_edges(&mut self, endpoints: &[f32]) -> Result<u32, JsError> {
        let edges = parse_edge_array(endpoints)?;
        let count = edges.len() as u32;
        self.engine.set_edges(edges)?;
        Ok(count)
    }

    /// Attach opaque metadata (e.g. a JSON string) to one edge. The
    /// engine never inspects it; it is only forwarded to a custom
    /// compatibility callback. Returns false if the index is out of
    /// range.
    #[wasm_bindgen(js_name = setEdgeMetadata)]
    pub fn set_edge_metadata(&mut self, index: usize, metadata: String) -> bool {
        self.engine.set_edge_metadata(index, metadata)
    }

    /// Get the number of edges.
    #[wasm_bindgen(js_name = edgeCount)]
    pub fn edge_count(&self) -> u32 {
        self.engine.edge_count() as u32
    }

    /// Install a custom compatibility callback `(edgeA, edgeB) => number`.
    ///
    /// Each argument is `{ source: {x, y}, target: {x, y}, metadata? }`.
    /// The returned number multiplies the geometric compatibility score
    /// (clamped to at most 1, so it can only reduce it). Invoked once per
    /// edge pair during the compatibility stage, never during the
    /// simulation loop. Exceptions abort the bundling pass.
    #[wasm_bindgen(js_name = setCustomCompatibility)]
    pub fn set_custom_compatibility(&mut self, callback: js_sys::Function) {
        let hook = move |a: &Edge, b: &Edge| -> Result<f32, BundlingError> {
            let a_value = serde_wasm_bindgen::to_value(a)
                .map_err(|e| BundlingError::CompatibilityCallback(e.to_string()))?;
            let b_value = serde_wasm_bindgen::to_value(b)
                .map_err(|e| BundlingError::CompatibilityCallback(e.to_string()))?;
            let result = callback
                .call2(&JsValue::NULL, &a_value, &b_value)
                .map_err(|e| {
                    BundlingError::CompatibilityCallback(
                        e.as_string().unwrap_or_else(|| format!("{e:?}")),
                    )
                })?;
            result.as_f64().map(|v| v as f32).ok_or_else(|| {
                BundlingError::CompatibilityCallback("callback did not return a number".to_string())
            })
        };
        self.engine.set_custom_compatibility(Box::new(hook));
    }

    /// Remove the custom compatibility callback.
    #[wasm_bindgen(js_name = clearCustomCompatibility)]
    pub fn clear_custom_compatibility(&mut self) {
        self.engine.clear_custom_compatibility();
    }

    // =========================================================================
    // Bundling
    // =========================================================================

    /// Run a full bundling pass over the current edge set.
    ///
    /// On success the bundled polylines are available through the export
    /// methods. On failure the previous polylines are untouched.
    pub fn bundle(&mut self) -> Result<(), JsError> {
        warn_quadratic_cost(self.engine.edge_count());
        self.engine.bundle()?;
        Ok(())
    }

    /// Translate existing polylines to follow moved endpoints, without
    /// re-running the simulation.
    ///
    /// Takes the same `[sx, sy, tx, ty]` layout as `setEdges` and runs in
    /// O(edges × subdivisions); intended to be called every animation
    /// frame while nodes are dragged or force-simulated.
    #[wasm_bindgen(js_name = updateEndpoints)]
    pub fn update_endpoints(&mut self, endpoints: &[f32]) -> Result<(), JsError> {
        let pairs = parse_endpoint_array(endpoints)?;
        self.engine.update_endpoints(&pairs)?;
        Ok(())
    }

    // =========================================================================
    // Polyline Exports (velocity-free)
    // =========================================================================

    /// Number of bundled polylines (0 before the first pass).
    #[wasm_bindgen(js_name = polylineCount)]
    pub fn polyline_count(&self) -> u32 {
        self.engine.polyline_count() as u32
    }

    /// Per-polyline start offsets into the flat control point buffer,
    /// counted in points. Has `polylineCount + 1` entries; the last entry
    /// is the total point count.
    #[wasm_bindgen(js_name = getPolylineOffsets)]
    pub fn get_polyline_offsets(&self) -> Vec<u32> {
        self.engine.polyline_offsets()
    }

    /// All control points interleaved as `[x0, y0, x1, y1, ...]`,
    /// polyline by polyline. Use with `getPolylineOffsets` to slice per
    /// edge before handing to a curve renderer.
    #[wasm_bindgen(js_name = getControlPoints)]
    pub fn get_control_points(&self) -> Float32Array {
        Float32Array::from(&self.engine.control_points_flat()[..])
    }

    /// Control points for one polyline as `[x0, y0, x1, y1, ...]`.
    /// Throws if the index is out of range.
    #[wasm_bindgen(js_name = getPolylinePoints)]
    pub fn get_polyline_points(&self, index: usize) -> Result<Float32Array, JsError> {
        let positions = self
            .engine
            .polyline_positions(index)
            .ok_or_else(|| JsError::new("polyline index out of range"))?;

        let mut flat = Vec::with_capacity(positions.len() * 2);
        for p in positions {
            flat.push(p.x);
            flat.push(p.y);
        }
        Ok(Float32Array::from(&flat[..]))
    }

    /// Clear edges, polylines, and any custom compatibility callback.
    pub fn clear(&mut self) {
        self.engine.clear();
    }
}

impl Default for EdgeBundlerWasm {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `[sx, sy, tx, ty]` quads into edges.
fn parse_edge_array(endpoints: &[f32]) -> Result<Vec<Edge>, BundlingError> {
    let pairs = parse_endpoint_array(endpoints)?;
    Ok(pairs
        .into_iter()
        .map(|(source, target)| Edge::new(source, target))
        .collect())
}

/// Parse `[sx, sy, tx, ty]` quads into endpoint pairs.
fn parse_endpoint_array(endpoints: &[f32]) -> Result<Vec<(Point2D, Point2D)>, BundlingError> {
    if endpoints.len() % 4 != 0 {
        return Err(BundlingError::InvalidInput(format!(
            "endpoint array length {} is not a multiple of 4",
            endpoints.len()
        )));
    }
    Ok(endpoints
        .chunks_exact(4)
        .map(|quad| {
            (
                Point2D::new(quad[0], quad[1]),
                Point2D::new(quad[2], quad[3]),
            )
        })
        .collect())
}

fn warn_quadratic_cost(edge_count: usize) {
    #[cfg(target_arch = "wasm32")]
    if edge_count > QUADRATIC_WARN_EDGE_COUNT {
        web_sys::console::warn_1(
            &format!(
                "bundling {edge_count} edges: compatibility is O(n\u{b2}); consider capping or pre-filtering the edge set"
            )
            .into(),
        );
    }
    #[cfg(not(target_arch = "wasm32"))]
    let _ = edge_count;
}

#[cfg(test)]
mod integration_tests {
    use super::*;
    use bundling::BundlingConfig;

    /// Test the full pipeline without JS types: flat edge array →
    /// engine → bundle → offsets + flat control points.
    #[test]
    fn test_flat_array_pipeline() {
        let endpoints = [
            0.0, 0.0, 100.0, 0.0, // edge 0
            0.0, 10.0, 100.0, 10.0, // edge 1
            0.0, 20.0, 100.0, 20.0, // edge 2
        ];
        let edges = parse_edge_array(&endpoints).unwrap();
        assert_eq!(edges.len(), 3);

        let config = BundlingConfig {
            subdivisions: 10,
            adaptive_subdivision: false,
            compatibility_threshold: 0.1,
            iterations: 50,
            ..Default::default()
        };
        let mut engine = BundlingEngine::with_config(config).unwrap();
        engine.set_edges(edges.clone()).unwrap();
        engine.bundle().unwrap();

        let offsets = engine.polyline_offsets();
        let flat = engine.control_points_flat();

        // 3 polylines of 11 points each
        assert_eq!(offsets, vec![0, 11, 22, 33]);
        assert_eq!(flat.len(), 66);

        // Endpoints pinned through the whole pipeline
        for (i, edge) in edges.iter().enumerate() {
            let start = offsets[i] as usize * 2;
            let end = offsets[i + 1] as usize * 2;
            assert_eq!(flat[start], edge.source.x);
            assert_eq!(flat[start + 1], edge.source.y);
            assert_eq!(flat[end - 2], edge.target.x);
            assert_eq!(flat[end - 1], edge.target.y);
        }

        // Everything finite
        assert!(flat.iter().all(|v| v.is_finite()));
    }

    /// The outer two of three parallel edges pull toward the middle one.
    #[test]
    fn test_three_parallel_edges_bundle_toward_center() {
        let endpoints = [
            0.0, 0.0, 100.0, 0.0, //
            0.0, 10.0, 100.0, 10.0, //
            0.0, 20.0, 100.0, 20.0,
        ];
        let config = BundlingConfig {
            subdivisions: 10,
            adaptive_subdivision: false,
            compatibility_threshold: 0.1,
            iterations: 50,
            ..Default::default()
        };
        let mut engine = BundlingEngine::with_config(config).unwrap();
        engine
            .set_edges(parse_edge_array(&endpoints).unwrap())
            .unwrap();
        engine.bundle().unwrap();

        let top = engine.polyline_positions(2).unwrap()[5];
        let bottom = engine.polyline_positions(0).unwrap()[5];
        assert!(
            top.distance_to(bottom) < 20.0,
            "outer edges did not converge: {}",
            top.distance_to(bottom)
        );
    }

    /// Bundle, then drag every node by the same delta: the bundled shape
    /// must translate rigidly through the incremental path.
    #[test]
    fn test_bundle_then_incremental_drag() {
        let endpoints = [
            0.0, 0.0, 100.0, 0.0, //
            0.0, 10.0, 100.0, 10.0,
        ];
        let config = BundlingConfig {
            subdivisions: 10,
            adaptive_subdivision: false,
            compatibility_threshold: 0.1,
            iterations: 40,
            ..Default::default()
        };
        let mut engine = BundlingEngine::with_config(config).unwrap();
        engine
            .set_edges(parse_edge_array(&endpoints).unwrap())
            .unwrap();
        engine.bundle().unwrap();

        let before: Vec<Vec<Point2D>> = (0..2)
            .map(|i| engine.polyline_positions(i).unwrap())
            .collect();

        // Drag everything by (50, -25)
        let moved = [
            50.0, -25.0, 150.0, -25.0, //
            50.0, -15.0, 150.0, -15.0,
        ];
        engine
            .update_endpoints(&parse_endpoint_array(&moved).unwrap())
            .unwrap();

        for i in 0..2 {
            let after = engine.polyline_positions(i).unwrap();
            for (a, b) in after.iter().zip(&before[i]) {
                assert!((a.x - (b.x + 50.0)).abs() < 1e-3);
                assert!((a.y - (b.y - 25.0)).abs() < 1e-3);
            }
        }
    }

    /// Smoothing strategy selection changes the result but never the
    /// pinned endpoints.
    #[test]
    fn test_all_smoothing_strategies_run() {
        for name in ["laplacian", "gaussian", "bilateral", "unknown"] {
            let config = BundlingConfig {
                subdivisions: 8,
                adaptive_subdivision: false,
                compatibility_threshold: 0.1,
                iterations: 20,
                smoothing: smoothing::SmoothingKind::from_name(name),
                ..Default::default()
            };
            let mut engine = BundlingEngine::with_config(config).unwrap();
            engine
                .set_edges(parse_edge_array(&[0.0, 0.0, 100.0, 0.0]).unwrap())
                .unwrap();
            engine.bundle().unwrap();

            let positions = engine.polyline_positions(0).unwrap();
            assert_eq!(positions[0], Point2D::new(0.0, 0.0));
            assert_eq!(*positions.last().unwrap(), Point2D::new(100.0, 0.0));
            assert!(positions.iter().all(|p| p.is_finite()));
        }
    }

    #[test]
    fn test_malformed_flat_array_rejected() {
        let err = parse_edge_array(&[0.0, 0.0, 100.0]).unwrap_err();
        assert!(matches!(err, BundlingError::InvalidInput(_)));
    }

    #[test]
    fn test_empty_edge_set_is_fine() {
        let mut engine = BundlingEngine::new();
        engine.set_edges(Vec::new()).unwrap();
        engine.bundle().unwrap();

        assert_eq!(engine.polyline_count(), 0);
        assert_eq!(engine.polyline_offsets(), vec![0]);
        assert!(engine.control_points_flat().is_empty());
    }
}
