use std::path::PathBuf;

use ndarray::{Array1, Array2};

use crate::config::ProfileConfig;
use crate::error::Result;
use crate::export;
use crate::ops::{GeometryGrid, GridVectorMapper, OpticalUnits};

/// Rounds to two decimals, ties to even.
pub(crate) fn round_cents(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

/// Column gradient profiles centered on mid-stroke, exported as flat files.
///
/// Unlike [`PatternGenerator`](super::PatternGenerator) the gradient spans the
/// whole grid and is expressed directly in commands around 0.5.
#[derive(Debug, Clone)]
pub struct ProfileShape {
    config: ProfileConfig,
    units: OpticalUnits,
    mapper: GridVectorMapper,
    map: Array2<f64>,
}

impl ProfileShape {
    pub fn new(config: ProfileConfig) -> Result<Self> {
        let units = config.units()?;
        let geometry = GeometryGrid::new(config.grid_size)?;
        let mapper = GridVectorMapper::new(geometry, config.n_actuators)?;
        let n = config.grid_size;
        Ok(Self {
            config,
            units,
            mapper,
            map: Array2::zeros((n, n)),
        })
    }

    pub fn map(&self) -> &Array2<f64> {
        &self.map
    }

    pub fn units(&self) -> &OpticalUnits {
        &self.units
    }

    /// Stroke range in wavelengths of optical path.
    pub fn max_phase_lambda(&self) -> f64 {
        self.units.max_phase_lambda()
    }

    /// Column-wise gradient of `k_lambda` wavelengths of optical path.
    ///
    /// Heights are halved for the reflection and capped at half the stroke, so
    /// columns run from `0.5 + h` on the left to `0.5 - h` on the right, rounded
    /// to two decimals.
    pub fn gradient(&mut self, k_lambda: f64) {
        let stroke = self.units.stroke();
        let wavelength = self.units.wavelength();
        let max_height = (stroke / 2.0).min(k_lambda * wavelength / 2.0) / stroke;

        let n = self.config.grid_size;
        let columns = Array1::linspace(0.5 + max_height, 0.5 - max_height, n)
            .mapv(round_cents);
        self.map = Array2::from_shape_fn((n, n), |(_, j)| columns[j]);
    }

    pub fn apply_circular_mask(&mut self) -> Result<()> {
        self.map = self.mapper.geometry().apply_mask(&self.map.view())?;
        Ok(())
    }

    /// Aperture cells of the current map in row-major order.
    pub fn unwrap(&self) -> Result<Array1<f64>> {
        self.mapper.grid_to_vector(&self.map.view())
    }

    pub fn unwrap_and_save(&self) -> Result<PathBuf> {
        let vector = self.unwrap()?;
        export::save(&self.config.paths, &vector.view())
    }

    pub fn generate_gradient_file(&mut self, k_lambda: f64) -> Result<PathBuf> {
        self.gradient(k_lambda);
        self.apply_circular_mask()?;
        self.unwrap_and_save()
    }
}
