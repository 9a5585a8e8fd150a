//! # dm_patterns
//!
//! Actuator command patterns for a deformable mirror with a circular actuator
//! layout: gradients, Zernike modes and their superpositions, converted from
//! wavelengths to normalized commands in `[0, 1]` and unwrapped into the
//! device's actuator order.

pub mod config;
pub mod device;
pub mod error;
pub mod export;
pub mod ops;
pub mod patterns;
pub mod render;
pub mod zernike;

#[cfg(feature = "python")]
mod bindings;

pub use config::{GeneratorConfig, OutputPaths, ProfileConfig};
pub use device::{DeformableMirror, DmDriver};
pub use error::{DmError, Result};
pub use ops::{
    validate, GeometryGrid, GridVectorMapper, OpticalUnits, SurfaceUnit, Validated,
    OUTSIDE_APERTURE,
};
pub use patterns::{
    GradientParams, ModeTerm, PatternGenerator, ProfileShape, SuperpositionSpec, ZernikeParams,
};
pub use render::{describe, ColorMapSpec, PatternParams, RenderDescriptor};
pub use zernike::{ZernikeEvaluator, ZernikeMode};
