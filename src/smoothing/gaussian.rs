//! Gaussian smoothing: normalized windowed convolution.

use super::{validate_polylines, SmoothingStrategy};
use crate::error::BundlingError;
use crate::geometry::{Point2D, Polyline};

/// Windowed Gaussian convolution over index offsets.
///
/// Each interior point becomes the weighted average of its neighbors
/// within `±kernel_size`, with weight `exp(-offset² / (2σ²))`.
/// Out-of-range neighbors are excluded from the sum (not zero-padded)
/// and the remaining weights renormalized.
#[derive(Debug, Clone, Copy)]
pub struct GaussianSmoothing {
    /// Half-width of the convolution window in index offsets.
    pub kernel_size: usize,
    /// Standard deviation of the spatial kernel.
    pub sigma: f32,
}

impl GaussianSmoothing {
    /// Create a Gaussian smoother with an explicit window and sigma.
    pub fn new(kernel_size: usize, sigma: f32) -> Self {
        Self { kernel_size, sigma }
    }
}

impl Default for GaussianSmoothing {
    fn default() -> Self {
        Self {
            kernel_size: 2,
            sigma: 1.0,
        }
    }
}

impl SmoothingStrategy for GaussianSmoothing {
    fn name(&self) -> &'static str {
        "gaussian"
    }

    fn smooth(&self, polylines: &mut [Polyline], iterations: u32) -> Result<(), BundlingError> {
        validate_polylines(polylines)?;

        let k = self.kernel_size as isize;
        let two_sigma_sq = 2.0 * self.sigma * self.sigma;

        for _ in 0..iterations {
            for line in polylines.iter_mut() {
                let len = line.len();
                if len < 3 {
                    continue;
                }

                let prev: Vec<Point2D> = line.positions();
                for i in 1..len - 1 {
                    let mut sum_x = 0.0;
                    let mut sum_y = 0.0;
                    let mut total_weight = 0.0;

                    for offset in -k..=k {
                        let j = i as isize + offset;
                        if j < 0 || j >= len as isize {
                            continue;
                        }
                        let weight = (-(offset * offset) as f32 / two_sigma_sq).exp();
                        let neighbor = prev[j as usize];
                        sum_x += neighbor.x * weight;
                        sum_y += neighbor.y * weight;
                        total_weight += weight;
                    }

                    // offset 0 always contributes, so total_weight >= 1
                    line.points[i].x = sum_x / total_weight;
                    line.points[i].y = sum_y / total_weight;
                }
            }
        }

        Ok(())
    }
}
