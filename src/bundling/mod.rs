//! Force-directed edge bundling.
//!
//! The full pipeline, leaves first:
//! - `init`: subdivide each edge into interpolated control points
//! - `compatibility`: O(n²) pairwise compatibility matrix, computed once
//!   per bundling pass
//! - `simulator`: iterative force/momentum integrator pulling interior
//!   control points toward compatible edges
//! - `incremental`: cheap per-frame polyline translation when endpoints
//!   move, without re-running the simulation
//! - `engine`: orchestrator that owns the per-instance edge and polyline
//!   state and runs full passes

mod compatibility;
mod config;
mod edge;
mod engine;
mod incremental;
mod init;
mod simulator;

pub use compatibility::{CompatibilityFn, CompatibilityMatrix};
pub use config::BundlingConfig;
pub use edge::Edge;
pub use engine::BundlingEngine;
pub use incremental::update_endpoints;
pub use init::{initialize_all, initialize_polyline, subdivision_count};
pub use simulator::BundlingSimulator;
