//! Core units, constants, and shared primitives for the frame_sync workspace.

/// Physical and scene constants.
pub mod constants {
    use std::f64::consts::TAU;

    /// Seconds for one full rotation of the body-fixed frame.
    pub const SECONDS_PER_DAY: f64 = 86_400.0;
    /// One full turn in radians.
    pub const FULL_TURN: f64 = TAU;
}

/// Basic unit conversion helpers.
pub mod units {
    /// Convert degrees to radians.
    #[inline]
    pub fn deg_to_rad(v: f64) -> f64 {
        v.to_radians()
    }

    /// Scale a length in kilometres into scene units, given the reference radius pair.
    #[inline]
    pub fn km_to_scene(km: f64, reference_km: f64, reference_scene: f64) -> f64 {
        reference_scene * km / reference_km
    }
}

/// Lightweight time utilities shared across crates.
pub mod time {
    use super::constants::FULL_TURN;

    /// Simulated seconds elapsed while a frame with the given period turns by `radians`.
    #[inline]
    pub fn rotation_to_seconds(radians: f64, period_seconds: f64) -> f64 {
        radians / FULL_TURN * period_seconds
    }
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D vector in scene units or service units depending on context.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm of a vector.
    #[inline]
    pub fn norm(v: &Vector3) -> f64 {
        dot(v, v).sqrt()
    }

    /// Dot product of two vectors.
    #[inline]
    pub fn dot(a: &Vector3, b: &Vector3) -> f64 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    /// Scale a vector by a scalar.
    #[inline]
    pub fn scale(v: &Vector3, s: f64) -> Vector3 {
        [v[0] * s, v[1] * s, v[2] * s]
    }

    /// Unit vector in the direction of `v`.
    ///
    /// Returns `None` for zero-length or non-finite input, where the
    /// direction is undefined.
    pub fn normalize(v: &Vector3) -> Option<Vector3> {
        let n = norm(v);
        if !n.is_finite() || n <= f64::EPSILON {
            return None;
        }
        Some(scale(v, 1.0 / n))
    }

    /// Reorder a vector from the ephemeris service's axis convention to the scene's.
    ///
    /// Service `(x, y, z)` becomes scene `(y, z, x)`: the service's polar
    /// axis lands on the scene's vertical axis.
    #[inline]
    pub fn service_to_scene(v: &Vector3) -> Vector3 {
        [v[1], v[2], v[0]]
    }

    /// Inverse of [`service_to_scene`].
    #[inline]
    pub fn scene_to_service(v: &Vector3) -> Vector3 {
        [v[2], v[0], v[1]]
    }
}
