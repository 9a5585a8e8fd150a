//! Zernike polynomials over a circular actuator layout.
//!
//! Modes are addressed by `(n, m)` and stored in Noll order. Evaluation is
//! peak-normalized so that a mode scaled by an amplitude in wavelengths has
//! exactly that amplitude at its extremum.

pub mod basis;
pub mod evaluator;
pub mod mode;

pub use self::basis::ZernikeBasis;
pub use self::evaluator::ZernikeEvaluator;
pub use self::mode::{is_valid, modes_up_to, ZernikeMode};
