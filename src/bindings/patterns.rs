// src/bindings/patterns.rs

//! # Python bindings for `PatternGenerator`
//!
//! Exposes the generator as a Python class returning numpy arrays. Errors
//! become `ValueError`.

use numpy::{IntoPyArray, PyArray1, PyArray2, PyReadonlyArray1, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyModule;

use crate::error::DmError;
use crate::ops::GridVectorMapper;
use crate::patterns::{GradientParams, PatternGenerator as RustPatternGenerator, SuperpositionSpec, ZernikeParams};

fn to_py_err(err: DmError) -> PyErr {
    PyValueError::new_err(err.to_string())
}

#[pyclass(name = "PatternGenerator", module = "dm_patterns._rust")]
pub struct PyPatternGenerator {
    inner: RustPatternGenerator,
    mapper: GridVectorMapper,
}

#[pymethods]
impl PyPatternGenerator {
    #[new]
    #[pyo3(signature = (n, wavelength_nm=632.8, stroke_um=1.5))]
    fn new(n: usize, wavelength_nm: f64, stroke_um: f64) -> PyResult<Self> {
        let inner = RustPatternGenerator::new(n, wavelength_nm, stroke_um).map_err(to_py_err)?;
        let mapper = GridVectorMapper::for_geometry(inner.geometry().clone());
        Ok(Self { inner, mapper })
    }

    #[getter]
    fn n_actuators(&self) -> usize {
        self.mapper.n_actuators()
    }

    #[pyo3(signature = (amplitude_lambda, offset_lambda, radius_px, clip=true))]
    fn column_gradient<'py>(
        &self,
        py: Python<'py>,
        amplitude_lambda: f64,
        offset_lambda: f64,
        radius_px: f64,
        clip: bool,
    ) -> PyResult<&'py PyArray2<f64>> {
        let params = GradientParams {
            amplitude_lambda,
            offset_lambda,
            radius_px,
        };
        let cmd = self.inner.gradient(&params, clip).map_err(to_py_err)?;
        Ok(cmd.into_pyarray(py))
    }

    #[pyo3(signature = (n, m, amplitude_lambda, radius_px, offset_lambda=0.0, clip=true))]
    fn zernike<'py>(
        &self,
        py: Python<'py>,
        n: i32,
        m: i32,
        amplitude_lambda: f64,
        radius_px: f64,
        offset_lambda: f64,
        clip: bool,
    ) -> PyResult<&'py PyArray2<f64>> {
        let params = ZernikeParams {
            n,
            m,
            amplitude_lambda,
            offset_lambda,
            radius_px,
        };
        let cmd = self.inner.zernike(&params, clip).map_err(to_py_err)?;
        Ok(cmd.into_pyarray(py))
    }

    /// Superposition from a TOML document with `[general]` and `[modes]` tables.
    #[pyo3(signature = (spec_toml, clip=true))]
    fn sup_zernike<'py>(
        &self,
        py: Python<'py>,
        spec_toml: &str,
        clip: bool,
    ) -> PyResult<&'py PyArray2<f64>> {
        let spec: SuperpositionSpec =
            toml::from_str(spec_toml).map_err(|e| PyValueError::new_err(e.to_string()))?;
        let cmd = self.inner.superposition(&spec, clip).map_err(to_py_err)?;
        Ok(cmd.into_pyarray(py))
    }

    fn unwrap<'py>(&self, py: Python<'py>, grid: PyReadonlyArray2<f64>) -> PyResult<&'py PyArray1<f64>> {
        let vector = self
            .mapper
            .grid_to_vector(&grid.as_array())
            .map_err(to_py_err)?;
        Ok(vector.into_pyarray(py))
    }

    fn wrap<'py>(&self, py: Python<'py>, vector: PyReadonlyArray1<f64>) -> PyResult<&'py PyArray2<f64>> {
        let grid = self
            .mapper
            .vector_to_grid(&vector.as_array())
            .map_err(to_py_err)?;
        Ok(grid.into_pyarray(py))
    }
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_class::<PyPatternGenerator>()?;
    Ok(())
}
