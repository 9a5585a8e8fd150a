use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};

use super::geometry::{GeometryGrid, OUTSIDE_APERTURE};
use crate::error::{DmError, Result};

/// Unwraps a command grid into the device's actuator vector and back.
///
/// Aperture cells are taken in row-major order (left to right, top to bottom),
/// which is the order the driver expects its actuators in.
#[derive(Debug, Clone)]
pub struct GridVectorMapper {
    geometry: GeometryGrid,
    n_actuators: usize,
}

impl GridVectorMapper {
    /// Fails when the layout's aperture does not hold exactly `n_actuators` cells.
    pub fn new(geometry: GeometryGrid, n_actuators: usize) -> Result<Self> {
        if geometry.n_inside() != n_actuators {
            return Err(DmError::ActuatorCountMismatch {
                expected: n_actuators,
                found: geometry.n_inside(),
            });
        }
        Ok(Self {
            geometry,
            n_actuators,
        })
    }

    /// Mapper whose actuator count is whatever the aperture holds.
    pub fn for_geometry(geometry: GeometryGrid) -> Self {
        let n_actuators = geometry.n_inside();
        Self {
            geometry,
            n_actuators,
        }
    }

    pub fn geometry(&self) -> &GeometryGrid {
        &self.geometry
    }

    pub fn n_actuators(&self) -> usize {
        self.n_actuators
    }

    pub fn grid_to_vector(&self, grid: &ArrayView2<f64>) -> Result<Array1<f64>> {
        self.geometry.check_shape(grid)?;
        let vector: Array1<f64> = grid
            .iter()
            .zip(self.geometry.inside().iter())
            .filter_map(|(&v, &keep)| keep.then_some(v))
            .collect();
        if vector.len() != self.n_actuators {
            return Err(DmError::ActuatorCountMismatch {
                expected: self.n_actuators,
                found: vector.len(),
            });
        }
        Ok(vector)
    }

    pub fn vector_to_grid(&self, vector: &ArrayView1<f64>) -> Result<Array2<f64>> {
        if vector.len() != self.n_actuators {
            return Err(DmError::ActuatorCountMismatch {
                expected: self.n_actuators,
                found: vector.len(),
            });
        }
        let n = self.geometry.size();
        let mut grid = Array2::from_elem((n, n), OUTSIDE_APERTURE);
        let mut values = vector.iter();
        Zip::from(&mut grid)
            .and(self.geometry.inside())
            .for_each(|cell, &keep| {
                if keep {
                    if let Some(&v) = values.next() {
                        *cell = v;
                    }
                }
            });
        Ok(grid)
    }
}
