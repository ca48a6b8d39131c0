//! Geometric primitives for the bundling pipeline.
//!
//! This module provides the point and polyline types shared by every stage
//! of the engine. `ControlPoint` carries simulation velocity; the export
//! helpers on `Polyline` strip it so velocity never crosses the module
//! boundary.

mod point;
mod polyline;

pub use point::Point2D;
pub use polyline::{ControlPoint, Polyline};
