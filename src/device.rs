use log::info;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

use crate::error::{DmError, Result};
use crate::ops::{validate, GeometryGrid, GridVectorMapper};
use crate::render::{describe, ColorMapSpec, PatternParams, RenderDescriptor};

/// Connection to a physical DM.
///
/// Implementations report failures as [`DmError::Driver`]; nothing here retries.
pub trait DmDriver {
    /// Opens the device and returns its actuator count.
    fn open(&mut self, serial: &str) -> Result<usize>;
    fn close(&mut self) -> Result<()>;
    /// Sends one command per actuator, each in `[0, 1]`.
    fn send_data(&mut self, values: &[f64]) -> Result<()>;
}

/// A DM behind a driver, addressed either by actuator vector or by grid.
pub struct DeformableMirror<D: DmDriver> {
    driver: D,
    serial: String,
    geometry: GeometryGrid,
    cmap: ColorMapSpec,
    mapper: Option<GridVectorMapper>,
    last_vector: Option<Array1<f64>>,
    last_grid_masked: Option<Array2<f64>>,
}

impl<D: DmDriver> DeformableMirror<D> {
    pub fn new(driver: D, serial: &str, grid_size: usize) -> Result<Self> {
        Ok(Self {
            driver,
            serial: serial.to_string(),
            geometry: GeometryGrid::new(grid_size)?,
            cmap: ColorMapSpec::default(),
            mapper: None,
            last_vector: None,
            last_grid_masked: None,
        })
    }

    pub fn with_cmap(mut self, cmap: ColorMapSpec) -> Self {
        self.cmap = cmap;
        self
    }

    /// Opens the driver; the aperture of the layout must match its actuator count.
    pub fn open(&mut self) -> Result<()> {
        let n_act = self.driver.open(&self.serial)?;
        self.mapper = Some(GridVectorMapper::new(self.geometry.clone(), n_act)?);
        self.last_vector = Some(Array1::zeros(n_act));
        info!("opened DM {} with {} actuators", self.serial, n_act);
        Ok(())
    }

    pub fn close(&mut self) -> Result<()> {
        self.driver.close()?;
        self.mapper = None;
        info!("closed DM {}", self.serial);
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.mapper.is_some()
    }

    pub fn n_actuators(&self) -> Option<usize> {
        self.mapper.as_ref().map(GridVectorMapper::n_actuators)
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    fn mapper(&self) -> Result<&GridVectorMapper> {
        self.mapper.as_ref().ok_or(DmError::NotOpen)
    }

    /// Sends a raw actuator vector; NaN and values outside `[0, 1]` are refused.
    pub fn send(&mut self, vector: &ArrayView1<f64>) -> Result<()> {
        let expected = self.mapper()?.n_actuators();
        if vector.len() != expected {
            return Err(DmError::ActuatorCountMismatch {
                expected,
                found: vector.len(),
            });
        }
        let checked = validate(vector, false)?.into_command();
        self.driver.send_data(&checked.to_vec())?;
        self.last_vector = Some(checked);
        Ok(())
    }

    /// Masks `grid` to the aperture, unwraps it and sends it.
    pub fn send_grid(&mut self, grid: &ArrayView2<f64>) -> Result<()> {
        let mapper = self.mapper()?;
        let masked = mapper.geometry().apply_mask(grid)?;
        let vector = mapper.grid_to_vector(&masked.view())?;
        self.send(&vector.view())?;
        self.last_grid_masked = Some(masked);
        Ok(())
    }

    pub fn last_vector(&self) -> Option<&Array1<f64>> {
        self.last_vector.as_ref()
    }

    pub fn last_grid(&self) -> Option<&Array2<f64>> {
        self.last_grid_masked.as_ref()
    }

    pub fn render_last(&self, params: Option<&PatternParams>) -> Result<RenderDescriptor> {
        let grid = self.last_grid_masked.as_ref().ok_or(DmError::NothingSent)?;
        Ok(describe(&grid.view(), &self.cmap, params))
    }
}
