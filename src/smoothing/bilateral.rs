//! Bilateral smoothing: edge-preserving Gaussian.

use super::{validate_polylines, SmoothingStrategy};
use crate::error::BundlingError;
use crate::geometry::{Point2D, Polyline};

/// Gaussian smoothing weighted by actual point distance.
///
/// The weight of each neighbor is the product of a spatial kernel on the
/// index offset and an intensity kernel `exp(-d² / (2σᵢ²))` on the
/// Euclidean distance between the neighbor and the center point. Distant
/// neighbors get near-zero weight, so sharp bends survive while flat
/// regions are smoothed. If the total weight degenerates to zero the
/// original point is kept unmodified.
#[derive(Debug, Clone, Copy)]
pub struct BilateralSmoothing {
    /// Half-width of the convolution window in index offsets.
    pub kernel_size: usize,
    /// Standard deviation of the spatial (index offset) kernel.
    pub spatial_sigma: f32,
    /// Standard deviation of the intensity (point distance) kernel.
    pub intensity_sigma: f32,
}

impl BilateralSmoothing {
    /// Create a bilateral smoother with explicit parameters.
    pub fn new(kernel_size: usize, spatial_sigma: f32, intensity_sigma: f32) -> Self {
        Self {
            kernel_size,
            spatial_sigma,
            intensity_sigma,
        }
    }
}

impl Default for BilateralSmoothing {
    fn default() -> Self {
        Self {
            kernel_size: 2,
            spatial_sigma: 1.0,
            intensity_sigma: 10.0,
        }
    }
}

impl SmoothingStrategy for BilateralSmoothing {
    fn name(&self) -> &'static str {
        "bilateral"
    }

    fn smooth(&self, polylines: &mut [Polyline], iterations: u32) -> Result<(), BundlingError> {
        validate_polylines(polylines)?;

        let k = self.kernel_size as isize;
        let two_spatial_sq = 2.0 * self.spatial_sigma * self.spatial_sigma;
        let two_intensity_sq = 2.0 * self.intensity_sigma * self.intensity_sigma;

        for _ in 0..iterations {
            for line in polylines.iter_mut() {
                let len = line.len();
                if len < 3 {
                    continue;
                }

                let prev: Vec<Point2D> = line.positions();
                for i in 1..len - 1 {
                    let center = prev[i];
                    let mut sum_x = 0.0;
                    let mut sum_y = 0.0;
                    let mut total_weight = 0.0;

                    for offset in -k..=k {
                        let j = i as isize + offset;
                        if j < 0 || j >= len as isize {
                            continue;
                        }
                        let neighbor = prev[j as usize];
                        let spatial = (-(offset * offset) as f32 / two_spatial_sq).exp();
                        let distance = neighbor.distance_to(center);
                        let intensity = (-(distance * distance) / two_intensity_sq).exp();
                        let weight = spatial * intensity;

                        sum_x += neighbor.x * weight;
                        sum_y += neighbor.y * weight;
                        total_weight += weight;
                    }

                    if total_weight > f32::EPSILON {
                        line.points[i].x = sum_x / total_weight;
                        line.points[i].y = sum_y / total_weight;
                    }
                    // zero total weight: keep the original point
                }
            }
        }

        Ok(())
    }
}
