//! Bundling configuration and validation.

use serde::{Deserialize, Serialize};

use crate::error::BundlingError;
use crate::smoothing::SmoothingKind;

/// Configuration for a full bundling pass.
///
/// Deserializes from camelCase keys with every field defaulted, so a JS
/// caller can pass a partial object. Validation happens before any
/// simulation work begins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BundlingConfig {
    /// Base number of segments each edge is subdivided into (default: 10).
    pub subdivisions: u32,
    /// Give long edges extra control points: one per 30 units of length
    /// beyond the first 100 (default: true).
    pub adaptive_subdivision: bool,
    /// Minimum pairwise compatibility for two edges to attract each
    /// other, in [0, 1] (default: 0.6).
    pub compatibility_threshold: f32,
    /// Number of simulation iterations per pass (default: 60).
    pub iterations: u32,
    /// Initial integration step size; cosine-decays toward 0 over the
    /// pass (default: 0.2).
    pub step_size: f32,
    /// Spring strength pulling control points back toward the straight
    /// line between their edge's endpoints (default: 0.45).
    pub stiffness: f32,
    /// Velocity carry-over between iterations, in [0, 1) (default: 0.5).
    ///
    /// The default step/momentum pair keeps the approach to the bundled
    /// equilibrium overdamped: compatible edges close their separation
    /// without overshooting and rebounding.
    pub momentum: f32,
    /// Smoothing strategy to run (default: laplacian).
    pub smoothing: SmoothingKind,
    /// Smoothing passes per periodic invocation; the final cleanup pass
    /// runs double this amount (default: 2).
    pub smoothing_iterations: u32,
    /// Run smoothing every this many simulation iterations (default: 20).
    pub smoothing_frequency: u32,
}

impl Default for BundlingConfig {
    fn default() -> Self {
        Self {
            subdivisions: 10,
            adaptive_subdivision: true,
            compatibility_threshold: 0.6,
            iterations: 60,
            step_size: 0.2,
            stiffness: 0.45,
            momentum: 0.5,
            smoothing: SmoothingKind::Laplacian,
            smoothing_iterations: 2,
            smoothing_frequency: 20,
        }
    }
}

impl BundlingConfig {
    /// Validate all fields, failing fast before any simulation work.
    pub fn validate(&self) -> Result<(), BundlingError> {
        if self.subdivisions == 0 {
            return Err(BundlingError::InvalidConfiguration(
                "subdivisions must be at least 1".into(),
            ));
        }
        if !self.step_size.is_finite() || self.step_size < 0.0 {
            return Err(BundlingError::InvalidConfiguration(format!(
                "stepSize must be finite and non-negative, got {}",
                self.step_size
            )));
        }
        if !self.compatibility_threshold.is_finite()
            || !(0.0..=1.0).contains(&self.compatibility_threshold)
        {
            return Err(BundlingError::InvalidConfiguration(format!(
                "compatibilityThreshold must be in [0, 1], got {}",
                self.compatibility_threshold
            )));
        }
        if !self.stiffness.is_finite() || self.stiffness < 0.0 {
            return Err(BundlingError::InvalidConfiguration(format!(
                "stiffness must be finite and non-negative, got {}",
                self.stiffness
            )));
        }
        if !self.momentum.is_finite() || !(0.0..1.0).contains(&self.momentum) {
            return Err(BundlingError::InvalidConfiguration(format!(
                "momentum must be in [0, 1), got {}",
                self.momentum
            )));
        }
        if self.smoothing_frequency == 0 {
            return Err(BundlingError::InvalidConfiguration(
                "smoothingFrequency must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
