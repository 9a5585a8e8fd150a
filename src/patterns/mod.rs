//! # DM command patterns
//!
//! `PatternGenerator` turns optical surface descriptions given in wavelengths
//! into normalized actuator commands on an `N x N` grid:
//!
//! * column gradients (`gradient`)
//! * single Zernike modes (`single_mode`)
//! * superpositions of Zernike modes with per-mode radii (`superposition`)
//!
//! Every pattern is built as a surface in wavelengths, converted to commands
//! once, then validated once against `[0, 1]`.

pub mod gradient;
pub mod profile;
pub mod superposition;

#[cfg(test)]
mod tests;

use log::info;
use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::GeneratorConfig;
use crate::error::{DmError, Result};
use crate::ops::{validate, GeometryGrid, OpticalUnits};
use crate::zernike::{modes_up_to, ZernikeEvaluator, ZernikeMode};

pub use self::gradient::GradientParams;
pub use self::profile::ProfileShape;
pub use self::superposition::{GeneralSettings, ModeTerm, SuperpositionSpec};

/// Parameters of a single Zernike pattern.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZernikeParams {
    pub n: i32,
    pub m: i32,
    pub amplitude_lambda: f64,
    #[serde(default)]
    pub offset_lambda: f64,
    pub radius_px: f64,
}

pub struct PatternGenerator {
    units: OpticalUnits,
    evaluator: ZernikeEvaluator,
}

impl PatternGenerator {
    /// Generator for an `n x n` layout, wavelength in nm and stroke in µm.
    pub fn new(n: usize, wavelength_nm: f64, stroke_um: f64) -> Result<Self> {
        Ok(Self::with_units(
            GeometryGrid::new(n)?,
            OpticalUnits::from_nm_um(wavelength_nm, stroke_um)?,
        ))
    }

    pub fn with_units(geometry: GeometryGrid, units: OpticalUnits) -> Self {
        Self {
            units,
            evaluator: ZernikeEvaluator::new(geometry),
        }
    }

    pub fn from_config(config: &GeneratorConfig) -> Result<Self> {
        let geometry = config.geometry()?;
        if let Some(expected) = config.n_actuators {
            if geometry.n_inside() != expected {
                return Err(DmError::ActuatorCountMismatch {
                    expected,
                    found: geometry.n_inside(),
                });
            }
        }
        Ok(Self::with_units(geometry, config.units()?))
    }

    pub fn geometry(&self) -> &GeometryGrid {
        self.evaluator.geometry()
    }

    pub fn units(&self) -> &OpticalUnits {
        &self.units
    }

    pub fn evaluator(&self) -> &ZernikeEvaluator {
        &self.evaluator
    }

    /// Converts a surface in wavelengths to a validated command grid.
    pub(crate) fn finish(&self, surface_lambda: &ArrayView2<f64>, clip: bool) -> Result<Array2<f64>> {
        let cmd = self.units.lambda_to_command(surface_lambda);
        let checked = validate(&cmd, clip)?;
        Ok(checked.into_command())
    }

    /// `offset + amplitude * Z(n, m)` in wavelengths, before conversion.
    pub fn zernike_surface(&self, params: &ZernikeParams) -> Result<Array2<f64>> {
        let phi = self.evaluator.evaluate(params.n, params.m, params.radius_px)?;
        Ok(phi.mapv(|z| params.offset_lambda + params.amplitude_lambda * z))
    }

    pub fn zernike(&self, params: &ZernikeParams, clip: bool) -> Result<Array2<f64>> {
        let surface = self.zernike_surface(params)?;
        self.finish(&surface.view(), clip)
    }

    pub fn single_mode(
        &self,
        n: i32,
        m: i32,
        amplitude_lambda: f64,
        offset_lambda: f64,
        radius_px: f64,
    ) -> Result<Array2<f64>> {
        let params = ZernikeParams {
            n,
            m,
            amplitude_lambda,
            offset_lambda,
            radius_px,
        };
        self.zernike(&params, true)
    }

    /// Every mode up to radial order `n_max`, in Noll order, one pattern each.
    pub fn mode_atlas(
        &self,
        n_max: u32,
        amplitude_lambda: f64,
        offset_lambda: f64,
        radius_px: f64,
    ) -> Result<Vec<(ZernikeMode, Array2<f64>)>> {
        let modes: Vec<ZernikeMode> = (1..=modes_up_to(n_max))
            .map(ZernikeMode::from_noll)
            .collect::<Result<_>>()?;
        info!(
            "generating {} Zernike patterns up to order {}",
            modes.len(),
            n_max
        );
        modes
            .into_par_iter()
            .map(|mode| {
                let params = ZernikeParams {
                    n: mode.n() as i32,
                    m: mode.m(),
                    amplitude_lambda,
                    offset_lambda,
                    radius_px,
                };
                self.zernike(&params, true).map(|grid| (mode, grid))
            })
            .collect()
    }
}
