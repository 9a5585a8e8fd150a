use super::mode::{modes_up_to, ZernikeMode};
use crate::error::{DmError, Result};

/// Radial polynomial `R_n^|m|`.
///
/// Evaluated as `rho^|m| P_k^(0,|m|)(2 rho^2 - 1)` with `k = (n - |m|) / 2`,
/// running the three-term Jacobi recurrence in `f64`.
#[derive(Debug, Clone, Copy)]
struct RadialPolynomial {
    k: u32,
    m_abs: u32,
}

impl RadialPolynomial {
    fn new(n: u32, m_abs: u32) -> Self {
        Self {
            k: (n - m_abs) / 2,
            m_abs,
        }
    }

    fn eval(&self, rho: f64) -> f64 {
        let x = 2.0 * rho * rho - 1.0;
        let b = self.m_abs as f64;
        let mut prev = 1.0;
        let mut curr = 1.0 + (b + 2.0) * (x - 1.0) / 2.0;
        let jacobi = match self.k {
            0 => prev,
            1 => curr,
            k => {
                for i in 2..=k {
                    let i = i as f64;
                    let s = 2.0 * i + b;
                    let a1 = 2.0 * i * (i + b) * (s - 2.0);
                    let a2 = (s - 1.0) * (s * (s - 2.0) * x - b * b);
                    let a3 = 2.0 * (i - 1.0) * (i + b - 1.0) * s;
                    let next = (a2 * curr - a3 * prev) / a1;
                    prev = curr;
                    curr = next;
                }
                curr
            }
        };
        rho.powi(self.m_abs as i32) * jacobi
    }
}

/// Every Zernike polynomial up to a radial order, in Noll order.
///
/// Polynomials carry Noll's normalization so that each has unit variance over
/// the unit disk.
#[derive(Debug, Clone)]
pub struct ZernikeBasis {
    n_max: u32,
    modes: Vec<ZernikeMode>,
    radial: Vec<RadialPolynomial>,
}

impl ZernikeBasis {
    pub fn new(n_max: u32) -> Self {
        let nk = modes_up_to(n_max);
        let modes: Vec<ZernikeMode> = (1..=nk)
            .filter_map(|j| ZernikeMode::from_noll(j).ok())
            .collect();
        let radial = modes
            .iter()
            .map(|mode| RadialPolynomial::new(mode.n(), mode.m().unsigned_abs()))
            .collect();
        Self {
            n_max,
            modes,
            radial,
        }
    }

    pub fn n_max(&self) -> u32 {
        self.n_max
    }

    /// Number of polynomials in the basis.
    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }

    pub fn modes(&self) -> &[ZernikeMode] {
        &self.modes
    }

    pub fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(DmError::BasisSize {
                index,
                size: self.len(),
            });
        }
        Ok(())
    }

    /// Value of polynomial `index` at polar coordinates on the unit disk.
    ///
    /// `index` must have passed [`check_index`](Self::check_index).
    pub fn eval(&self, index: usize, rho: f64, theta: f64) -> f64 {
        let mode = self.modes[index];
        let n = mode.n() as f64;
        let m = mode.m();
        let radial = self.radial[index].eval(rho);
        if m == 0 {
            (n + 1.0).sqrt() * radial
        } else if m > 0 {
            (2.0 * (n + 1.0)).sqrt() * radial * (m as f64 * theta).cos()
        } else {
            (2.0 * (n + 1.0)).sqrt() * radial * (-m as f64 * theta).sin()
        }
    }
}
