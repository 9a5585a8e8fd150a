use ndarray::{Array, ArrayBase, Data, Dimension};

use crate::error::{DmError, Result};

/// Unit of a surface height handed to [`OpticalUnits::surface_to_command`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceUnit {
    /// Multiples of the illumination wavelength.
    Lambda,
    /// Physical height in meters.
    Meters,
}

/// Wavelength and actuator stroke of one DM / optical setup.
///
/// A command of 1 drives an actuator through its full stroke, so
/// `command = surface_lambda * wavelength / stroke`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpticalUnits {
    wavelength_m: f64,
    stroke_m: f64,
}

impl OpticalUnits {
    pub fn new(wavelength_m: f64, stroke_m: f64) -> Result<Self> {
        if wavelength_m <= 0.0 || !wavelength_m.is_finite() {
            return Err(DmError::NonPositiveWavelength(wavelength_m));
        }
        if stroke_m <= 0.0 || !stroke_m.is_finite() {
            return Err(DmError::NonPositiveStroke(stroke_m));
        }
        Ok(Self {
            wavelength_m,
            stroke_m,
        })
    }

    /// Lab convention: wavelength in nanometers, stroke in micrometers.
    pub fn from_nm_um(wavelength_nm: f64, stroke_um: f64) -> Result<Self> {
        Self::new(wavelength_nm * 1e-9, stroke_um * 1e-6)
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength_m
    }

    pub fn stroke(&self) -> f64 {
        self.stroke_m
    }

    /// Height in meters of a surface given in wavelengths.
    pub fn lambda_to_meters(&self, value_lambda: f64) -> f64 {
        value_lambda * self.wavelength_m
    }

    pub fn surface_to_command(&self, value: f64, unit: SurfaceUnit) -> f64 {
        let height_m = match unit {
            SurfaceUnit::Lambda => self.lambda_to_meters(value),
            SurfaceUnit::Meters => value,
        };
        height_m / self.stroke_m
    }

    pub fn lambda_to_command<S, D>(&self, surface_lambda: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let scale = self.wavelength_m / self.stroke_m;
        surface_lambda.mapv(|v| v * scale)
    }

    pub fn command_to_lambda<S, D>(&self, command: &ArrayBase<S, D>) -> Array<f64, D>
    where
        S: Data<Elem = f64>,
        D: Dimension,
    {
        let scale = self.stroke_m / self.wavelength_m;
        command.mapv(|v| v * scale)
    }

    /// Optical path range of the full stroke in wavelengths, counting the
    /// reflection twice.
    pub fn max_phase_lambda(&self) -> f64 {
        2.0 * self.stroke_m / self.wavelength_m
    }
}
