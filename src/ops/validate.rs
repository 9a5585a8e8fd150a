use log::warn;
use ndarray::{Array, ArrayBase, Data, Dimension};

use crate::error::{DmError, Result};

/// Command array after validation, with the number of entries that were clipped.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated<D: Dimension> {
    pub command: Array<f64, D>,
    pub below: usize,
    pub above: usize,
}

impl<D: Dimension> Validated<D> {
    pub fn adjusted(&self) -> usize {
        self.below + self.above
    }

    pub fn into_command(self) -> Array<f64, D> {
        self.command
    }
}

/// Checks that every command lies in `[0, 1]`.
///
/// With `clip` out-of-range entries are clamped and counted; without it they
/// are an [`DmError::OutOfRange`] error. NaN entries have no clamped value and
/// are refused either way. The input is left untouched.
pub fn validate<S, D>(cmd: &ArrayBase<S, D>, clip: bool) -> Result<Validated<D>>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let nan = cmd.iter().filter(|v| v.is_nan()).count();
    if nan > 0 {
        warn!("DM command has {} NaN entries", nan);
        return Err(DmError::NanCommand(nan));
    }
    let below = cmd.iter().filter(|&&v| v < 0.0).count();
    let above = cmd.iter().filter(|&&v| v > 1.0).count();

    if below + above == 0 {
        return Ok(Validated {
            command: cmd.to_owned(),
            below,
            above,
        });
    }

    warn!(
        "DM command out of range: {} below 0, {} above 1",
        below, above
    );
    if !clip {
        let (min, max) = cmd
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        return Err(DmError::OutOfRange {
            min,
            max,
            below,
            above,
        });
    }

    warn!("clipping applied to {} commands", below + above);
    Ok(Validated {
        command: cmd.mapv(|v| v.clamp(0.0, 1.0)),
        below,
        above,
    })
}
