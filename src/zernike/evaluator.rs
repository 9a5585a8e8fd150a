use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, warn};
use ndarray::{Array2, Zip};

use super::basis::ZernikeBasis;
use super::mode::ZernikeMode;
use crate::error::{DmError, Result};
use crate::ops::GeometryGrid;

/// Evaluates peak-normalized Zernike modes over an actuator layout.
///
/// Basis objects are built once per radial order and shared between calls;
/// the evaluator can be used from several threads at once.
#[derive(Debug)]
pub struct ZernikeEvaluator {
    geometry: GeometryGrid,
    cache: RwLock<HashMap<u32, Arc<ZernikeBasis>>>,
}

pub(crate) fn check_radius(radius_px: f64) -> Result<()> {
    if radius_px <= 0.0 || !radius_px.is_finite() {
        return Err(DmError::InvalidRadius(radius_px));
    }
    Ok(())
}

impl ZernikeEvaluator {
    pub fn new(geometry: GeometryGrid) -> Self {
        Self {
            geometry,
            cache: RwLock::new(HashMap::new()),
        }
    }

    pub fn geometry(&self) -> &GeometryGrid {
        &self.geometry
    }

    /// Basis of radial order `n_max`, built on first use.
    pub fn basis(&self, n_max: u32) -> Arc<ZernikeBasis> {
        if let Some(basis) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&n_max)
        {
            return Arc::clone(basis);
        }
        debug!("building Zernike basis of order {}", n_max);
        let basis = Arc::new(ZernikeBasis::new(n_max));
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(cache.entry(n_max).or_insert(basis))
    }

    /// Radial orders currently cached.
    pub fn cached_orders(&self) -> Vec<u32> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        let mut orders: Vec<u32> = cache.keys().copied().collect();
        orders.sort_unstable();
        orders
    }

    pub fn evaluate(&self, n: i32, m: i32, radius_px: f64) -> Result<Array2<f64>> {
        self.evaluate_mode(ZernikeMode::new(n, m)?, radius_px)
    }

    /// Mode `(n, m)` over the grid with `rho = r / radius_px`.
    ///
    /// Cells beyond `radius_px` or outside the device aperture are zero. Inside
    /// that support the result is scaled so that its largest magnitude is 1; a
    /// mode that vanishes over the whole support is returned unscaled.
    pub fn evaluate_mode(&self, mode: ZernikeMode, radius_px: f64) -> Result<Array2<f64>> {
        check_radius(radius_px)?;
        let basis = self.basis(mode.n());
        let index = mode.index();
        basis.check_index(index)?;

        let geometry = &self.geometry;
        let n = geometry.size();
        let mut phi = Array2::<f64>::zeros((n, n));
        let mut peak = 0f64;
        Zip::from(&mut phi)
            .and(geometry.x_px())
            .and(geometry.y_px())
            .and(geometry.r_px())
            .and(geometry.inside())
            .for_each(|p, &x, &y, &r, &inside| {
                if inside && r <= radius_px {
                    *p = basis.eval(index, r / radius_px, y.atan2(x));
                    peak = peak.max(p.abs());
                }
            });

        if peak > 0.0 {
            phi /= peak;
        } else {
            warn!(
                "Zernike mode {} vanishes inside radius {} px, normalization skipped",
                mode, radius_px
            );
        }
        Ok(phi)
    }
}
