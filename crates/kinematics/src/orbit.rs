//! Circular orbit embedded in a fixed, tilted orbital plane.

use frames_config::{OrbitConfig, SceneConfig};
use frames_core::constants::FULL_TURN;
use frames_core::units::deg_to_rad;
use nalgebra::{UnitQuaternion, Vector3};

/// Fixed circular orbit. The plane orientation is set once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitModel {
    radius: f64,
    rate_coupling: f64,
    plane: UnitQuaternion<f64>,
}

impl OrbitModel {
    /// Build an orbit of `radius` scene units in the plane given by `inclination`
    /// and `raan` (radians).
    ///
    /// The plane rotation is RAAN about the scene vertical (+Y) applied outside
    /// the inclination about +X. Swapping the order tilts the plane differently.
    pub fn new(radius: f64, inclination: f64, raan: f64, rate_coupling: f64) -> Self {
        let raan_q = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), raan);
        let inclination_q = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), inclination);
        Self {
            radius,
            rate_coupling,
            plane: raan_q * inclination_q,
        }
    }

    /// Build the orbit described by the viewer configuration.
    pub fn from_config(scene: &SceneConfig, orbit: &OrbitConfig) -> Self {
        Self::new(
            scene.orbit_radius_scene(),
            deg_to_rad(orbit.inclination_deg),
            deg_to_rad(orbit.raan_deg),
            orbit.rate_coupling,
        )
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Position in the plane's local coordinates. Anomaly 0 sits on the local +x axis.
    pub fn position(&self, anomaly: f64) -> (f64, f64) {
        (self.radius * anomaly.cos(), self.radius * anomaly.sin())
    }

    /// Position in the inertial frame, after the plane tilt.
    pub fn inertial_position(&self, anomaly: f64) -> [f64; 3] {
        let (x, y) = self.position(anomaly);
        let p = self.plane * Vector3::new(x, y, 0.0);
        [p.x, p.y, p.z]
    }

    /// Advance the anomaly by one tick at body-fixed `rate`.
    #[inline]
    pub fn advance(&self, anomaly: f64, rate: f64) -> f64 {
        anomaly + self.rate_coupling * rate
    }

    /// Closed loop of `segments + 1` inertial points tracing the orbit; the last repeats the first.
    pub fn path(&self, segments: usize) -> Vec<[f64; 3]> {
        let segments = segments.max(1);
        (0..=segments)
            .map(|i| self.inertial_position(i as f64 / segments as f64 * FULL_TURN))
            .collect()
    }
}

/// Fold an angle into `(-2π, 2π)`, keeping its sign.
#[inline]
pub fn wrap_anomaly(anomaly: f64) -> f64 {
    anomaly % FULL_TURN
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn zero_tilt_keeps_plane_in_xy() {
        let orbit = OrbitModel::new(2.0, 0.0, 0.0, 1.5);
        let p = orbit.inertial_position(FRAC_PI_2);
        assert_relative_eq!(p[0], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn raan_is_applied_outside_inclination() {
        // Inclination 90° about +X takes local +y to +z; RAAN 90° about +Y then takes +z to +x.
        let orbit = OrbitModel::new(1.0, FRAC_PI_2, FRAC_PI_2, 1.5);
        let p = orbit.inertial_position(FRAC_PI_2);
        assert_relative_eq!(p[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(p[1], 0.0, epsilon = 1e-12);
        assert_relative_eq!(p[2], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn wrap_keeps_angle_congruent() {
        let raw = 3.0 * FULL_TURN + 0.25;
        assert_relative_eq!(wrap_anomaly(raw), 0.25, epsilon = 1e-9);
        assert_relative_eq!(wrap_anomaly(-raw), -0.25, epsilon = 1e-9);
    }

    #[test]
    fn path_closes_on_itself() {
        let orbit = OrbitModel::new(1.1, -0.7, 0.3, 1.5);
        let path = orbit.path(128);
        assert_eq!(path.len(), 129);
        let (first, last) = (path[0], path[128]);
        for k in 0..3 {
            assert_relative_eq!(first[k], last[k], epsilon = 1e-12);
        }
    }
}
