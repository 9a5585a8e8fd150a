pub mod geometry;
pub mod mapping;
pub mod units;
pub mod validate;

pub use self::geometry::{GeometryGrid, OUTSIDE_APERTURE};
pub use self::mapping::GridVectorMapper;
pub use self::units::{OpticalUnits, SurfaceUnit};
pub use self::validate::{validate, Validated};
