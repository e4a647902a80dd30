use std::f64::consts::{FRAC_PI_4, TAU};

use approx::assert_relative_eq;
use frame_sync::config::{OrbitConfig, SceneConfig};
use frame_sync::kinematics::frame_rotation;
use frame_sync::kinematics::orbit::OrbitModel;
use frame_sync::vector::norm;

fn default_orbit() -> OrbitModel {
    OrbitModel::from_config(&SceneConfig::default(), &OrbitConfig::default())
}

#[test]
fn integrate_and_advance_are_pure() {
    let orbit = default_orbit();
    let before = orbit.clone();
    for &(value, rate) in &[(0.0, 0.002), (1.3, -0.01), (1.0e6, 0.02)] {
        assert_eq!(
            frame_rotation::integrate(value, rate),
            frame_rotation::integrate(value, rate)
        );
        assert_eq!(orbit.advance(value, rate), orbit.advance(value, rate));
    }
    assert_eq!(orbit, before, "advancing must not touch the model");
    assert_relative_eq!(frame_rotation::integrate(0.5, 0.002), 0.502, epsilon = 1e-15);
    assert_relative_eq!(orbit.advance(0.5, 0.002), 0.503, epsilon = 1e-15);
}

#[test]
fn local_position_stays_on_the_circle() {
    let orbit = default_orbit();
    let radius = (6_378.0 + 600.0) / 6_378.0;
    assert_relative_eq!(orbit.radius(), radius, epsilon = 1e-12);
    for i in -500..=500 {
        let anomaly = i as f64 * 0.0371;
        let (x, y) = orbit.position(anomaly);
        assert_relative_eq!((x * x + y * y).sqrt(), radius, epsilon = 1e-12);
    }
    assert_eq!(orbit.position(0.0), (radius, 0.0));
}

#[test]
fn plane_tilt_preserves_distance_and_tilts_out_of_the_equator() {
    let orbit = default_orbit();
    for i in 0..64 {
        let p = orbit.inertial_position(i as f64 / 64.0 * TAU);
        assert_relative_eq!(norm(&p), orbit.radius(), epsilon = 1e-12);
    }
    // -45° about +X lifts local +y halfway between scene +Y and -Z.
    let top = orbit.inertial_position(TAU / 4.0);
    let r = orbit.radius();
    assert_relative_eq!(top[0], 0.0, epsilon = 1e-12);
    assert_relative_eq!(top[1], r * FRAC_PI_4.cos(), epsilon = 1e-12);
    assert_relative_eq!(top[2], -r * FRAC_PI_4.sin(), epsilon = 1e-12);
}

#[test]
fn body_to_inertial_turns_about_the_vertical() {
    let v = frame_rotation::rotate_to_inertial(TAU / 4.0, &[0.0, 0.0, 1.0]);
    assert_relative_eq!(v[0], 1.0, epsilon = 1e-12);
    assert_relative_eq!(v[1], 0.0, epsilon = 1e-12);
    assert_relative_eq!(v[2], 0.0, epsilon = 1e-12);
}

#[test]
fn orbit_path_matches_configured_segments() {
    let orbit = default_orbit();
    let path = orbit.path(OrbitConfig::default().path_segments);
    assert_eq!(path.len(), 129);
    assert!(path.iter().all(|p| (norm(p) - orbit.radius()).abs() < 1e-12));
}
