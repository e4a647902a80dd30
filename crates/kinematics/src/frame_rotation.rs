//! Body-fixed frame orientation about the inertial vertical axis.

use nalgebra::{UnitQuaternion, Vector3};

/// Advance the body-fixed orientation by one tick at `rate` radians per tick.
#[inline]
pub fn integrate(current: f64, rate: f64) -> f64 {
    current + rate
}

/// Rotation taking body-fixed scene coordinates into the inertial frame.
pub fn body_to_inertial(orientation: f64) -> UnitQuaternion<f64> {
    UnitQuaternion::from_axis_angle(&Vector3::y_axis(), orientation)
}

/// Express a body-fixed scene vector in the inertial frame.
pub fn rotate_to_inertial(orientation: f64, v: &[f64; 3]) -> [f64; 3] {
    let r = body_to_inertial(orientation) * Vector3::new(v[0], v[1], v[2]);
    [r.x, r.y, r.z]
}
