use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::ops::{GeometryGrid, OpticalUnits};

fn default_grid_size() -> usize {
    13
}

fn default_wavelength_nm() -> f64 {
    632.8
}

fn default_stroke_um() -> f64 {
    1.5
}

fn default_profile_grid_size() -> usize {
    12
}

/// Settings of a [`PatternGenerator`](crate::patterns::PatternGenerator).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    #[serde(default = "default_grid_size")]
    pub grid_size: usize,
    #[serde(default = "default_wavelength_nm")]
    pub wavelength_nm: f64,
    #[serde(default = "default_stroke_um")]
    pub stroke_um: f64,
    /// Actuator count of the device; checked against the aperture when set.
    #[serde(default)]
    pub n_actuators: Option<usize>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            grid_size: default_grid_size(),
            wavelength_nm: default_wavelength_nm(),
            stroke_um: default_stroke_um(),
            n_actuators: None,
        }
    }
}

impl GeneratorConfig {
    pub fn units(&self) -> Result<OpticalUnits> {
        OpticalUnits::from_nm_um(self.wavelength_nm, self.stroke_um)
    }

    pub fn geometry(&self) -> Result<GeometryGrid> {
        GeometryGrid::new(self.grid_size)
    }
}

/// Where an exported profile is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputPaths {
    pub directory: PathBuf,
    pub filename: String,
}

impl OutputPaths {
    pub fn full_path(&self) -> PathBuf {
        self.directory.join(&self.filename)
    }
}

/// Settings of a [`ProfileShape`](crate::patterns::ProfileShape); lengths in meters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileConfig {
    pub n_actuators: usize,
    pub stroke: f64,
    pub wavelength: f64,
    #[serde(rename = "N", alias = "grid_size", default = "default_profile_grid_size")]
    pub grid_size: usize,
    pub paths: OutputPaths,
}

impl ProfileConfig {
    pub fn units(&self) -> Result<OpticalUnits> {
        OpticalUnits::new(self.wavelength, self.stroke)
    }
}
