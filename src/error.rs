//! Error types for the bundling engine.

use thiserror::Error;

/// Errors surfaced by the edge bundling engine.
///
/// The algorithm is deterministic given its inputs, so none of these are
/// retryable: a bundling pass either fully computes or fails before
/// mutating any polyline.
#[derive(Error, Debug)]
pub enum BundlingError {
    /// A configuration value is non-finite, negative, or out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Input geometry is malformed (non-finite coordinate, mismatched
    /// array lengths).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A caller-supplied compatibility callback failed or returned a
    /// non-numeric value.
    #[error("compatibility callback: {0}")]
    CompatibilityCallback(String),
}
