//! Polyline smoothing strategies.
//!
//! Three interchangeable strategies behind one trait:
//! - `Laplacian`: 1:2:1 neighbor average — cheap, the default
//! - `Gaussian`: normalized windowed convolution over index offsets
//! - `Bilateral`: Gaussian weighted by actual point distance, preserving
//!   sharp bends while smoothing flat regions
//!
//! All strategies mutate polylines in place and pin the first and last
//! point of every polyline unconditionally.

mod bilateral;
mod gaussian;
mod laplacian;

pub use bilateral::BilateralSmoothing;
pub use gaussian::GaussianSmoothing;
pub use laplacian::LaplacianSmoothing;

use serde::{Deserialize, Serialize};

use crate::error::BundlingError;
use crate::geometry::Polyline;

/// Interface shared by all smoothing strategies.
///
/// Implementations may assume polylines have already been validated via
/// [`validate_polylines`], which every built-in strategy calls first.
pub trait SmoothingStrategy {
    /// Strategy name, as accepted by [`SmoothingKind::from_name`].
    fn name(&self) -> &'static str;

    /// Run `iterations` smoothing passes over every polyline in place.
    ///
    /// Endpoints are never moved. Fails with `InvalidInput` if any point
    /// has a non-finite coordinate.
    fn smooth(&self, polylines: &mut [Polyline], iterations: u32) -> Result<(), BundlingError>;
}

/// The closed set of built-in smoothing strategies.
///
/// Serialized as a lowercase name; unknown names deserialize to
/// `Laplacian` rather than failing, so stale config payloads degrade
/// gracefully.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum SmoothingKind {
    /// 1:2:1 weighted neighbor average.
    #[default]
    Laplacian,
    /// Windowed Gaussian convolution.
    Gaussian,
    /// Edge-preserving bilateral filter.
    Bilateral,
}

impl SmoothingKind {
    /// Parse a strategy name. Unknown names fall back to Laplacian.
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "gaussian" => Self::Gaussian,
            "bilateral" => Self::Bilateral,
            _ => Self::Laplacian,
        }
    }

    /// The canonical lowercase name.
    pub fn name(self) -> &'static str {
        match self {
            Self::Laplacian => "laplacian",
            Self::Gaussian => "gaussian",
            Self::Bilateral => "bilateral",
        }
    }

    /// Instantiate the strategy with its default parameters.
    pub fn create(self) -> Box<dyn SmoothingStrategy> {
        match self {
            Self::Laplacian => Box::new(LaplacianSmoothing),
            Self::Gaussian => Box::new(GaussianSmoothing::default()),
            Self::Bilateral => Box::new(BilateralSmoothing::default()),
        }
    }
}

impl From<String> for SmoothingKind {
    fn from(name: String) -> Self {
        Self::from_name(&name)
    }
}

impl From<SmoothingKind> for String {
    fn from(kind: SmoothingKind) -> Self {
        kind.name().to_string()
    }
}

/// Validate that every point of every polyline has finite coordinates.
pub(crate) fn validate_polylines(polylines: &[Polyline]) -> Result<(), BundlingError> {
    for (i, line) in polylines.iter().enumerate() {
        if !line.is_finite() {
            return Err(BundlingError::InvalidInput(format!(
                "polyline {i} contains a non-finite coordinate"
            )));
        }
    }
    Ok(())
}
