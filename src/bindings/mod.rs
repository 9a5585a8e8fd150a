mod patterns;

pub use patterns::*;

use pyo3::prelude::*;
use pyo3::types::PyModule;

/// DM pattern generation for Python
#[pymodule]
pub fn _rust(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    patterns::register(m)?;
    Ok(())
}
