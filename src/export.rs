use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use ndarray::ArrayView1;

use crate::config::OutputPaths;
use crate::error::{DmError, Result};

/// Writes one value per line with six decimals, replacing any existing file.
///
/// Parent directories are created as needed.
pub fn write_vector(path: &Path, values: &ArrayView1<f64>) -> Result<()> {
    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() {
            fs::create_dir_all(dir)?;
        }
    }
    let mut out = BufWriter::new(File::create(path)?);
    for v in values.iter() {
        writeln!(out, "{:.6}", v)?;
    }
    out.flush()?;
    info!("saved {} DM values to {}", values.len(), path.display());
    Ok(())
}

pub fn save(paths: &OutputPaths, values: &ArrayView1<f64>) -> Result<PathBuf> {
    let path = paths.full_path();
    write_vector(&path, values)?;
    Ok(path)
}

/// Reads back a file written by [`write_vector`].
pub fn read_vector(path: &Path) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path)?;
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            line.parse::<f64>().map_err(|e| {
                DmError::from(std::io::Error::new(
                    std::io::ErrorKind::InvalidData,
                    format!("{}: {:?}: {}", path.display(), line, e),
                ))
            })
        })
        .collect()
}
