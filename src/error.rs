use thiserror::Error;

/// Errors raised by pattern generation, mapping and device I/O.
#[derive(Debug, Error)]
pub enum DmError {
    #[error("stroke must be > 0, got {0}")]
    NonPositiveStroke(f64),
    #[error("wavelength must be > 0, got {0}")]
    NonPositiveWavelength(f64),
    #[error("grid size must be >= 1")]
    InvalidGridSize,
    #[error("radius_px must be > 0, got {0}")]
    InvalidRadius(f64),
    #[error("invalid Zernike indices n={n}, m={m}")]
    InvalidMode { n: i32, m: i32 },
    #[error("cannot parse Zernike mode from {0:?}, expected \"(n,m)\"")]
    ModeParse(String),
    #[error("Zernike mode {0} listed more than once")]
    DuplicateMode(String),
    #[error("Noll index {index} exceeds basis size {size}")]
    BasisSize { index: usize, size: usize },
    #[error("expected {expected} actuators, got {found}")]
    ActuatorCountMismatch { expected: usize, found: usize },
    #[error("grid has wrong shape: expected {expected}x{expected}, got {rows}x{cols}")]
    GridShapeMismatch {
        expected: usize,
        rows: usize,
        cols: usize,
    },
    #[error("DM command out of range (min={min:.3}, max={max:.3}): {below} below 0, {above} above 1")]
    OutOfRange {
        min: f64,
        max: f64,
        below: usize,
        above: usize,
    },
    #[error("DM command has {0} NaN entries")]
    NanCommand(usize),
    #[error("DM is not open")]
    NotOpen,
    #[error("no grid has been sent yet")]
    NothingSent,
    #[error("DM driver error: {0}")]
    Driver(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DmError>;
