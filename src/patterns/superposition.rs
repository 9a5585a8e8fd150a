use std::collections::btree_map::{BTreeMap, Entry};
use std::fmt;

use log::debug;
use ndarray::Array2;
use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

use super::PatternGenerator;
use crate::error::{DmError, Result};
use crate::zernike::evaluator::check_radius;
use crate::zernike::ZernikeMode;

/// Settings shared by every mode of a superposition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeneralSettings {
    #[serde(default)]
    pub offset_lambda: f64,
    /// Radius used by modes that do not set their own.
    pub radius_px: f64,
}

/// Amplitude of one mode, optionally on its own radius.
///
/// Deserializes from a bare amplitude or from a table with `amplitude_lambda`
/// and `radius_px`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "ModeTermRepr")]
pub struct ModeTerm {
    pub amplitude_lambda: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius_px: Option<f64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ModeTermRepr {
    Amplitude(f64),
    Full {
        amplitude_lambda: f64,
        #[serde(default)]
        radius_px: Option<f64>,
    },
}

impl From<ModeTermRepr> for ModeTerm {
    fn from(repr: ModeTermRepr) -> Self {
        match repr {
            ModeTermRepr::Amplitude(amplitude_lambda) => Self {
                amplitude_lambda,
                radius_px: None,
            },
            ModeTermRepr::Full {
                amplitude_lambda,
                radius_px,
            } => Self {
                amplitude_lambda,
                radius_px,
            },
        }
    }
}

impl ModeTerm {
    pub fn radius_or(&self, default_radius_px: f64) -> f64 {
        self.radius_px.unwrap_or(default_radius_px)
    }
}

/// Zernike modes to sum, keyed by mode, plus their shared settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SuperpositionSpec {
    pub general: GeneralSettings,
    #[serde(default, deserialize_with = "distinct_modes")]
    pub modes: BTreeMap<ZernikeMode, ModeTerm>,
}

/// Mode table whose keys must name distinct modes, so `"(2,0)"` and `"(2, 0)"`
/// cannot both appear.
fn distinct_modes<'de, D>(
    deserializer: D,
) -> std::result::Result<BTreeMap<ZernikeMode, ModeTerm>, D::Error>
where
    D: Deserializer<'de>,
{
    struct ModesVisitor;

    impl<'de> Visitor<'de> for ModesVisitor {
        type Value = BTreeMap<ZernikeMode, ModeTerm>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a table of \"(n,m)\" keys")
        }

        fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut modes = BTreeMap::new();
            while let Some((key, term)) = access.next_entry::<String, ModeTerm>()? {
                let mode: ZernikeMode = key
                    .parse()
                    .map_err(<A::Error as de::Error>::custom)?;
                match modes.entry(mode) {
                    Entry::Vacant(slot) => {
                        slot.insert(term);
                    }
                    Entry::Occupied(_) => {
                        return Err(<A::Error as de::Error>::custom(DmError::DuplicateMode(key)));
                    }
                }
            }
            Ok(modes)
        }
    }

    deserializer.deserialize_map(ModesVisitor)
}

impl SuperpositionSpec {
    pub fn new(offset_lambda: f64, radius_px: f64) -> Self {
        Self {
            general: GeneralSettings {
                offset_lambda,
                radius_px,
            },
            modes: BTreeMap::new(),
        }
    }

    /// Adds `(n, m)` on the shared radius, replacing any previous entry.
    pub fn with_mode(mut self, n: i32, m: i32, amplitude_lambda: f64) -> Result<Self> {
        self.modes.insert(
            ZernikeMode::new(n, m)?,
            ModeTerm {
                amplitude_lambda,
                radius_px: None,
            },
        );
        Ok(self)
    }

    /// Adds `(n, m)` on its own radius, replacing any previous entry.
    pub fn with_mode_radius(
        mut self,
        n: i32,
        m: i32,
        amplitude_lambda: f64,
        radius_px: f64,
    ) -> Result<Self> {
        self.modes.insert(
            ZernikeMode::new(n, m)?,
            ModeTerm {
                amplitude_lambda,
                radius_px: Some(radius_px),
            },
        );
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.modes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modes.is_empty()
    }
}

impl PatternGenerator {
    /// Sum of the modes of `spec` in wavelengths, offset included once.
    ///
    /// Each mode resolves its radius from its own override or the shared
    /// default; nothing is clipped here.
    pub fn superposition_surface(&self, spec: &SuperpositionSpec) -> Result<Array2<f64>> {
        let default_radius = spec.general.radius_px;
        check_radius(default_radius)?;

        let n = self.geometry().size();
        let mut surface = Array2::from_elem((n, n), spec.general.offset_lambda);
        for (&mode, term) in &spec.modes {
            let radius_px = term.radius_or(default_radius);
            debug!(
                "mode {}: amplitude {} lambda, radius {} px",
                mode, term.amplitude_lambda, radius_px
            );
            let phi = self.evaluator().evaluate_mode(mode, radius_px)?;
            surface.scaled_add(term.amplitude_lambda, &phi);
        }
        Ok(surface)
    }

    pub fn superposition(&self, spec: &SuperpositionSpec, clip: bool) -> Result<Array2<f64>> {
        let surface = self.superposition_surface(spec)?;
        self.finish(&surface.view(), clip)
    }
}
