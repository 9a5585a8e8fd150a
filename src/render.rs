//! Plot descriptions for actuator maps.
//!
//! Nothing here draws: `describe` turns a command grid into everything a
//! plotting front end needs (masked cells, color map, range, title).

use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::patterns::{GradientParams, SuperpositionSpec, ZernikeParams};

pub const DEFAULT_TITLE: &str = "DM Actuator Map";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorMapSpec {
    pub name: String,
    /// Color of cells without an actuator.
    pub bad_color: String,
    pub vmin: f64,
    pub vmax: f64,
}

impl Default for ColorMapSpec {
    fn default() -> Self {
        Self {
            name: "jet".to_string(),
            bad_color: "lightgray".to_string(),
            vmin: 0.0,
            vmax: 1.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderDescriptor {
    pub title: String,
    pub cmap: ColorMapSpec,
    pub colorbar_label: String,
    /// `None` for cells outside the aperture.
    pub cells: Array2<Option<f64>>,
}

/// Parameters a pattern was generated from, used for plot titles.
#[derive(Debug, Clone, PartialEq)]
pub enum PatternParams {
    Gradient(GradientParams),
    Zernike(ZernikeParams),
    Superposition(SuperpositionSpec),
}

impl PatternParams {
    /// One parameter group per line.
    ///
    /// Superpositions only list modes with a non-zero amplitude.
    pub fn title(&self) -> String {
        let lines: Vec<Vec<String>> = match self {
            PatternParams::Gradient(p) => vec![
                vec![format!("amplitude_lambda={}", p.amplitude_lambda)],
                vec![
                    format!("offset_lambda={}", p.offset_lambda),
                    format!("radius_px={}", p.radius_px),
                ],
            ],
            PatternParams::Zernike(p) => vec![
                vec![format!("n={}", p.n), format!("m={}", p.m)],
                vec![format!("amplitude_lambda={}", p.amplitude_lambda)],
                vec![
                    format!("offset_lambda={}", p.offset_lambda),
                    format!("radius_px={}", p.radius_px),
                ],
            ],
            PatternParams::Superposition(spec) => {
                let general = vec![
                    format!("offset_lambda={}", spec.general.offset_lambda),
                    format!("radius_px={}", spec.general.radius_px),
                ];
                let modes = spec
                    .modes
                    .iter()
                    .filter(|(_, term)| term.amplitude_lambda != 0.0)
                    .map(|(mode, term)| match term.radius_px {
                        Some(r) => format!("{}={} (r={})", mode, term.amplitude_lambda, r),
                        None => format!("{}={}", mode, term.amplitude_lambda),
                    })
                    .collect::<Vec<_>>();
                vec![general, modes]
            }
        };
        lines
            .into_iter()
            .filter(|line| !line.is_empty())
            .map(|line| line.join(", "))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render description of `grid`; negative cells are treated as masked.
pub fn describe(
    grid: &ArrayView2<f64>,
    cmap: &ColorMapSpec,
    params: Option<&PatternParams>,
) -> RenderDescriptor {
    let title = match params {
        Some(p) => format!("{}\n{}", DEFAULT_TITLE, p.title()),
        None => DEFAULT_TITLE.to_string(),
    };
    RenderDescriptor {
        title,
        cmap: cmap.clone(),
        colorbar_label: "Normalized Command".to_string(),
        cells: grid.mapv(|v| if v < 0.0 { None } else { Some(v) }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ops::OUTSIDE_APERTURE;
    use ndarray::arr2;

    #[test]
    fn test_masked_cells() {
        let grid = arr2(&[[OUTSIDE_APERTURE, 0.5], [0.0, 1.0]]);
        let desc = describe(&grid.view(), &ColorMapSpec::default(), None);
        assert_eq!(desc.title, DEFAULT_TITLE);
        assert_eq!(desc.cells, arr2(&[[None, Some(0.5)], [Some(0.0), Some(1.0)]]));
        assert_eq!(desc.cmap.bad_color, "lightgray");
    }

    #[test]
    fn test_zernike_title() {
        let params = PatternParams::Zernike(ZernikeParams {
            n: 2,
            m: 0,
            amplitude_lambda: 0.9,
            offset_lambda: 1.1,
            radius_px: 6.5,
        });
        assert_eq!(
            params.title(),
            "n=2, m=0\namplitude_lambda=0.9\noffset_lambda=1.1, radius_px=6.5"
        );
    }

    #[test]
    fn test_superposition_title_skips_zero_modes() {
        let spec = SuperpositionSpec::new(0.0, 5.5)
            .with_mode(1, 1, 0.0)
            .unwrap()
            .with_mode(2, 0, 0.25)
            .unwrap()
            .with_mode_radius(0, 0, 0.5, 6.5)
            .unwrap();
        let desc = describe(
            &arr2(&[[0.5]]).view(),
            &ColorMapSpec::default(),
            Some(&PatternParams::Superposition(spec)),
        );
        assert_eq!(
            desc.title,
            "DM Actuator Map\noffset_lambda=0, radius_px=5.5\n(0,0)=0.5 (r=6.5), (2,0)=0.25"
        );
    }
}
