use std::path::PathBuf;

use crate::config::{OutputPaths, ProfileConfig};
use crate::error::DmError;
use crate::export::read_vector;
use crate::ops::OUTSIDE_APERTURE;
use crate::patterns::profile::round_cents;
use crate::patterns::ProfileShape;
use approx::assert_relative_eq;

fn config(directory: PathBuf, grid_size: usize, n_actuators: usize) -> ProfileConfig {
    ProfileConfig {
        n_actuators,
        stroke: 1.5e-6,
        wavelength: 514e-9,
        grid_size,
        paths: OutputPaths {
            directory,
            filename: "dm_gradient_k6.csv".to_string(),
        },
    }
}

#[test]
fn test_gradient_is_capped_at_half_stroke() {
    let mut shape = ProfileShape::new(config(PathBuf::from("unused"), 13, 137)).unwrap();
    shape.gradient(6.0);
    let map = shape.map();
    assert_eq!(map[[0, 0]], 1.0);
    assert_eq!(map[[5, 1]], 0.92);
    assert_eq!(map[[12, 6]], 0.5);
    assert_eq!(map[[3, 12]], 0.0);
    // every row carries the same columns
    assert_eq!(map.row(0), map.row(12));
}

#[test]
fn test_column_rounding_ties_to_even() {
    assert_eq!(round_cents(0.625), 0.62);
    assert_eq!(round_cents(0.375), 0.38);
    assert_eq!(round_cents(0.125), 0.12);
    assert_eq!(round_cents(0.6667), 0.67);
    assert_eq!(round_cents(1.0), 1.0);
}

#[test]
fn test_small_gradient() {
    let mut shape = ProfileShape::new(config(PathBuf::from("unused"), 13, 137)).unwrap();
    shape.gradient(1.0);
    assert_eq!(shape.map()[[0, 0]], 0.67);
    assert_eq!(shape.map()[[0, 12]], 0.33);
    assert_relative_eq!(shape.max_phase_lambda(), 2.0 * 1.5e-6 / 514e-9);
}

#[test]
fn test_generate_gradient_file() {
    let tmp = tempfile::tempdir().unwrap();
    let mut shape = ProfileShape::new(config(tmp.path().join("output_shapes"), 13, 137)).unwrap();
    let path = shape.generate_gradient_file(6.0).unwrap();
    assert!(path.ends_with("output_shapes/dm_gradient_k6.csv"));
    assert_eq!(shape.map()[[0, 0]], OUTSIDE_APERTURE);

    let values = read_vector(&path).unwrap();
    assert_eq!(values.len(), 137);
    // first actuator sits in row 0, column 4
    assert_eq!(values[0], 0.67);
    assert!(values.iter().all(|&v| (0.0..=1.0).contains(&v)));
}

#[test]
fn test_actuator_count_checked_up_front() {
    let result = ProfileShape::new(config(PathBuf::from("unused"), 12, 137));
    assert!(matches!(
        result,
        Err(DmError::ActuatorCountMismatch { expected: 137, found: 112 })
    ));
}
