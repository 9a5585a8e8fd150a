mod profile_test;

use super::*;
use crate::error::DmError;
use crate::ops::{GridVectorMapper, OUTSIDE_APERTURE};
use approx::{assert_abs_diff_eq, assert_relative_eq};

const EPSILON: f64 = 1e-12;

// 500 nm over 1.5 µm: one wavelength is a third of the stroke
fn generator() -> PatternGenerator {
    PatternGenerator::new(13, 500.0, 1.5).unwrap()
}

#[test]
fn test_gradient_ramp_and_flat_rim() {
    let gen = generator();
    let params = GradientParams {
        amplitude_lambda: 0.3,
        offset_lambda: 0.6,
        radius_px: 4.0,
    };
    let cmd = gen.gradient(&params, true).unwrap();
    let third = 1.0 / 3.0;
    // center: offset only
    assert_relative_eq!(cmd[[6, 6]], 0.6 * third, epsilon = EPSILON);
    // x = +4 on the radius: offset + amplitude
    assert_relative_eq!(cmd[[6, 10]], 0.9 * third, epsilon = EPSILON);
    // x = -2
    assert_relative_eq!(cmd[[6, 4]], (0.6 - 0.15) * third, epsilon = EPSILON);
    // beyond the radius the offset is held, even inside the aperture
    assert_relative_eq!(cmd[[6, 12]], 0.6 * third, epsilon = EPSILON);
    // rows are identical along y within the radius
    assert_relative_eq!(cmd[[4, 8]], cmd[[8, 8]], epsilon = EPSILON);
}

#[test]
fn test_gradient_rejects_bad_radius() {
    let gen = generator();
    assert!(matches!(
        gen.column_gradient(0.3, 0.7, 0.0),
        Err(DmError::InvalidRadius(_))
    ));
    assert!(matches!(
        gen.column_gradient(0.3, 0.7, -4.0),
        Err(DmError::InvalidRadius(_))
    ));
}

#[test]
fn test_gradient_clipping_policy() {
    let gen = generator();
    let params = GradientParams {
        amplitude_lambda: 3.0,
        offset_lambda: 1.5,
        radius_px: 6.0,
    };
    assert!(matches!(gen.gradient(&params, false), Err(DmError::OutOfRange { .. })));
    let cmd = gen.gradient(&params, true).unwrap();
    assert_eq!(cmd[[6, 0]], 0.0);
    assert_eq!(cmd[[6, 12]], 1.0);
}

#[test]
fn test_single_mode_scales_peak() {
    let gen = generator();
    let cmd = gen.single_mode(2, 0, 0.9, 1.5, 6.5).unwrap();
    let deviation = cmd.iter().fold(0f64, |acc, &v| acc.max((v - 0.5).abs()));
    assert_relative_eq!(deviation, 0.9 / 3.0, epsilon = EPSILON);
}

#[test]
fn test_single_mode_rejects_invalid_input() {
    let gen = generator();
    assert!(matches!(
        gen.single_mode(1, 2, 0.1, 0.0, 6.5),
        Err(DmError::InvalidMode { n: 1, m: 2 })
    ));
    assert!(matches!(
        gen.single_mode(2, 0, 0.1, 0.0, 0.0),
        Err(DmError::InvalidRadius(_))
    ));
}

#[test]
fn test_zero_superposition_is_uniform_mid_stroke() {
    let gen = generator();
    // 1.5 lambda = 0.75 µm = half the stroke
    let mut spec = SuperpositionSpec::new(1.5, 5.5).with_mode_radius(0, 0, 0.0, 6.5).unwrap();
    for n in 1..=3 {
        for m in (-n..=n).step_by(2) {
            spec = spec.with_mode(n, m, 0.0).unwrap();
        }
    }
    assert_eq!(spec.len(), 10);

    let cmd = gen.superposition(&spec, false).unwrap();
    for &v in cmd.iter() {
        assert_relative_eq!(v, 0.5, epsilon = EPSILON);
    }
    let single = gen.single_mode(2, 0, 0.0, 1.5, 5.5).unwrap();
    assert_eq!(cmd, single);

    let masked = gen.geometry().apply_mask(&cmd.view()).unwrap();
    assert_eq!(masked[[0, 0]], OUTSIDE_APERTURE);
    assert_relative_eq!(masked[[6, 6]], 0.5, epsilon = EPSILON);
    let vector = GridVectorMapper::new(gen.geometry().clone(), 137)
        .unwrap()
        .grid_to_vector(&masked.view())
        .unwrap();
    assert_eq!(vector.len(), 137);
}

#[test]
fn test_superposition_clips_once_after_summing() {
    let gen = generator();
    // on their own, the tilt with this offset would clip to 0 everywhere
    let spec = SuperpositionSpec::new(-1.5, 6.5)
        .with_mode_radius(0, 0, 3.0, 100.0)
        .unwrap()
        .with_mode(1, 1, 0.3)
        .unwrap();
    let cmd = gen.superposition(&spec, true).unwrap();

    let ev = gen.evaluator();
    let piston = ev.evaluate(0, 0, 100.0).unwrap();
    let tilt = ev.evaluate(1, 1, 6.5).unwrap();
    let inside = gen.geometry().inside();
    for ((idx, &v), &keep) in cmd.indexed_iter().zip(inside.iter()) {
        if keep {
            let surface = -1.5 + 3.0 * piston[idx] + 0.3 * tilt[idx];
            assert_relative_eq!(v, surface / 3.0, epsilon = EPSILON);
            assert!(v > 0.35 && v < 0.65);
        } else {
            assert_eq!(v, 0.0);
        }
    }
}

#[test]
fn test_radius_override_does_not_leak() {
    let gen = generator();
    let spec = SuperpositionSpec::new(0.0, 6.5)
        .with_mode_radius(0, 0, 0.0, 3.0)
        .unwrap()
        .with_mode(2, 0, 1.0)
        .unwrap();
    let surface = gen.superposition_surface(&spec).unwrap();
    let defocus = gen.evaluator().evaluate(2, 0, 6.5).unwrap();
    assert_abs_diff_eq!(surface, defocus, epsilon = EPSILON);
    assert_eq!(spec.general.radius_px, 6.5);
}

#[test]
fn test_superposition_is_order_independent() {
    let gen = generator();
    let a = SuperpositionSpec::new(1.5, 6.5)
        .with_mode(2, 2, 0.2)
        .unwrap()
        .with_mode_radius(3, -1, -0.1, 5.0)
        .unwrap();
    let b = SuperpositionSpec::new(1.5, 6.5)
        .with_mode_radius(3, -1, -0.1, 5.0)
        .unwrap()
        .with_mode(2, 2, 0.2)
        .unwrap();
    assert_eq!(
        gen.superposition(&a, true).unwrap(),
        gen.superposition(&b, true).unwrap()
    );
}

#[test]
fn test_superposition_rejects_bad_radius() {
    let gen = generator();
    let spec = SuperpositionSpec::new(0.0, 0.0);
    assert!(matches!(
        gen.superposition(&spec, true),
        Err(DmError::InvalidRadius(_))
    ));
    let spec = SuperpositionSpec::new(0.0, 6.5).with_mode_radius(2, 0, 0.1, -1.0).unwrap();
    assert!(matches!(
        gen.superposition(&spec, true),
        Err(DmError::InvalidRadius(_))
    ));
}

#[test]
fn test_superposition_spec_from_toml() {
    let spec: SuperpositionSpec = toml::from_str(
        r#"
        [general]
        radius_px = 5.5

        [modes]
        "(0,0)" = { amplitude_lambda = 0.0, radius_px = 6.5 }
        "(1,-1)" = 0
        "(2,0)" = 0.25
        "#,
    )
    .unwrap();
    assert_eq!(spec.general.offset_lambda, 0.0);
    assert_eq!(spec.len(), 3);
    let defocus = ZernikeMode::new(2, 0).unwrap();
    assert_eq!(spec.modes[&defocus].amplitude_lambda, 0.25);
    assert_eq!(spec.modes[&defocus].radius_or(5.5), 5.5);
    let piston = ZernikeMode::new(0, 0).unwrap();
    assert_eq!(spec.modes[&piston].radius_px, Some(6.5));

    let bad = toml::from_str::<SuperpositionSpec>(
        r#"
        [general]
        radius_px = 5.5
        [modes]
        "(1,2)" = 0.1
        "#,
    );
    assert!(bad.is_err());
}

#[test]
fn test_superposition_spec_rejects_repeated_mode() {
    let repeated = toml::from_str::<SuperpositionSpec>(
        r#"
        [general]
        radius_px = 5.5
        [modes]
        "(2,0)" = 0.25
        "(2, 0)" = 0.5
        "#,
    );
    let err = repeated.unwrap_err().to_string();
    assert!(err.contains("listed more than once"), "{}", err);
}

#[test]
fn test_mode_atlas() {
    let gen = generator();
    let atlas = gen.mode_atlas(3, 1.0, 1.5, 6.5).unwrap();
    assert_eq!(atlas.len(), 10);
    for (j, (mode, cmd)) in atlas.iter().enumerate() {
        assert_eq!(mode.noll(), j + 1);
        let deviation = cmd.iter().fold(0f64, |acc, &v| acc.max((v - 0.5).abs()));
        assert_relative_eq!(deviation, 1.0 / 3.0, epsilon = EPSILON);
    }
    assert_eq!(gen.evaluator().cached_orders(), vec![0, 1, 2, 3]);
}

#[test]
fn test_from_config_checks_actuator_count() {
    let config = crate::config::GeneratorConfig {
        n_actuators: Some(137),
        ..Default::default()
    };
    assert!(PatternGenerator::from_config(&config).is_ok());
    let config = crate::config::GeneratorConfig {
        grid_size: 12,
        n_actuators: Some(137),
        ..Default::default()
    };
    assert!(matches!(
        PatternGenerator::from_config(&config),
        Err(DmError::ActuatorCountMismatch { expected: 137, found: 112 })
    ));
}
