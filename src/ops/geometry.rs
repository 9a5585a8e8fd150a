use ndarray::{Array2, ArrayView2};

use crate::error::{DmError, Result};

/// Value written into cells that have no actuator behind them.
pub const OUTSIDE_APERTURE: f64 = -1.0;

/// Centered pixel coordinates and circular aperture of an `N x N` actuator layout.
///
/// The pixel center is at `((N-1)/2, (N-1)/2)` and a cell is inside the aperture
/// when `r^2 <= (N/2)^2`. That radius is what makes the cell count match the
/// device, e.g. 137 actuators for `N = 13`.
#[derive(Debug, Clone)]
pub struct GeometryGrid {
    n: usize,
    x_px: Array2<f64>,
    y_px: Array2<f64>,
    r_px: Array2<f64>,
    inside: Array2<bool>,
    n_inside: usize,
}

impl GeometryGrid {
    pub fn new(n: usize) -> Result<Self> {
        if n == 0 {
            return Err(DmError::InvalidGridSize);
        }
        let c = (n as f64 - 1.0) / 2.0;
        let x_px = Array2::from_shape_fn((n, n), |(_, j)| j as f64 - c);
        let y_px = Array2::from_shape_fn((n, n), |(i, _)| i as f64 - c);
        let r_px = Array2::from_shape_fn((n, n), |(i, j)| x_px[[i, j]].hypot(y_px[[i, j]]));

        let radius2 = (n as f64 / 2.0).powi(2);
        let inside = Array2::from_shape_fn((n, n), |(i, j)| {
            x_px[[i, j]].powi(2) + y_px[[i, j]].powi(2) <= radius2
        });
        let n_inside = inside.iter().filter(|&&v| v).count();

        Ok(Self {
            n,
            x_px,
            y_px,
            r_px,
            inside,
            n_inside,
        })
    }

    pub fn size(&self) -> usize {
        self.n
    }

    pub fn x_px(&self) -> ArrayView2<f64> {
        self.x_px.view()
    }

    pub fn y_px(&self) -> ArrayView2<f64> {
        self.y_px.view()
    }

    pub fn r_px(&self) -> ArrayView2<f64> {
        self.r_px.view()
    }

    /// Aperture mask, `true` where an actuator exists.
    pub fn inside(&self) -> ArrayView2<bool> {
        self.inside.view()
    }

    /// Number of aperture cells, i.e. the actuator count of this layout.
    pub fn n_inside(&self) -> usize {
        self.n_inside
    }

    /// Half the grid width, in pixels.
    pub fn aperture_radius(&self) -> f64 {
        self.n as f64 / 2.0
    }

    /// Cells with `r <= radius`.
    pub fn within(&self, radius: f64) -> Array2<bool> {
        self.r_px.mapv(|r| r <= radius)
    }

    /// Copy of `grid` with [`OUTSIDE_APERTURE`] written outside the aperture.
    pub fn apply_mask(&self, grid: &ArrayView2<f64>) -> Result<Array2<f64>> {
        self.check_shape(grid)?;
        let mut masked = grid.to_owned();
        masked.zip_mut_with(&self.inside, |v, &keep| {
            if !keep {
                *v = OUTSIDE_APERTURE;
            }
        });
        Ok(masked)
    }

    pub(crate) fn check_shape(&self, grid: &ArrayView2<f64>) -> Result<()> {
        let (rows, cols) = grid.dim();
        if rows != self.n || cols != self.n {
            return Err(DmError::GridShapeMismatch {
                expected: self.n,
                rows,
                cols,
            });
        }
        Ok(())
    }
}
