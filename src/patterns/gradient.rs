use ndarray::{Array2, Zip};
use serde::{Deserialize, Serialize};

use super::PatternGenerator;
use crate::error::Result;
use crate::zernike::evaluator::check_radius;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientParams {
    pub amplitude_lambda: f64,
    pub offset_lambda: f64,
    pub radius_px: f64,
}

impl PatternGenerator {
    /// Linear ramp along x in wavelengths, `offset` beyond `radius_px`.
    ///
    /// The ramp reaches `offset ± amplitude` at `x = ±radius_px`. Cells past the
    /// radius are held at the offset rather than masked; masking to the device
    /// aperture happens when the grid is unwrapped.
    pub fn gradient_surface(&self, params: &GradientParams) -> Result<Array2<f64>> {
        check_radius(params.radius_px)?;
        let geometry = self.geometry();
        let n = geometry.size();
        let mut surface = Array2::from_elem((n, n), params.offset_lambda);
        Zip::from(&mut surface)
            .and(geometry.x_px())
            .and(geometry.r_px())
            .for_each(|s, &x, &r| {
                if r <= params.radius_px {
                    *s += params.amplitude_lambda * (x / params.radius_px);
                }
            });
        Ok(surface)
    }

    pub fn gradient(&self, params: &GradientParams, clip: bool) -> Result<Array2<f64>> {
        let surface = self.gradient_surface(params)?;
        self.finish(&surface.view(), clip)
    }

    pub fn column_gradient(
        &self,
        amplitude_lambda: f64,
        offset_lambda: f64,
        radius_px: f64,
    ) -> Result<Array2<f64>> {
        let params = GradientParams {
            amplitude_lambda,
            offset_lambda,
            radius_px,
        };
        self.gradient(&params, true)
    }
}
