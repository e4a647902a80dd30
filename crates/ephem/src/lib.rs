//! Client side of the ephemeris/rotation service.
//!
//! The service owns the astronomy (geodetic to body-fixed positions, the
//! body rotation angle, the sun direction). This crate only knows how to
//! ask for those values and how to map the answers into scene axes.

use std::future::Future;

use frames_core::vector::{self, Vector3};
use thiserror::Error;

pub mod endpoint;
pub mod http;

pub use endpoint::Endpoint;
pub use http::HttpEphemeris;

/// Errors surfaced while querying the ephemeris service or interpreting its answers.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("{endpoint} returned HTTP {status}: {message}")]
    Status {
        endpoint: &'static str,
        status: u16,
        message: String,
    },
    #[error("failed to decode {endpoint} response: {source}")]
    Decode {
        endpoint: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("unexpected {endpoint} response: {detail}")]
    Shape {
        endpoint: &'static str,
        detail: String,
    },
    #[error("direction vector has zero or non-finite length")]
    DegenerateDirection,
    #[error("invalid service URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("ephemeris service unavailable: {0}")]
    Unavailable(String),
}

/// Source of absolute positions and angles for a timestamp or surface point.
///
/// Futures must be `Send` so requests can be spawned as independent tasks
/// next to the animation loop.
pub trait EphemerisSource: Clone + Send + Sync + 'static {
    /// Body-fixed position of a geodetic point, in the service's axis order.
    fn ecef_position(
        &self,
        lat: f64,
        lon: f64,
    ) -> impl Future<Output = Result<Vector3, EphemerisError>> + Send;

    /// Body rotation angle at `timestamp` (ISO-8601), in the service's unit.
    fn earth_rotation_angle(
        &self,
        timestamp: &str,
    ) -> impl Future<Output = Result<f64, EphemerisError>> + Send;

    /// Sun position at `timestamp` (ISO-8601), in the service's axis order.
    fn sun_position(
        &self,
        timestamp: &str,
    ) -> impl Future<Output = Result<Vector3, EphemerisError>> + Send;
}

/// Convert a service-frame vector into a scene-frame unit direction.
pub fn direction_from_service(v: &Vector3) -> Result<Vector3, EphemerisError> {
    vector::normalize(&vector::service_to_scene(v)).ok_or(EphemerisError::DegenerateDirection)
}

/// Source that fails every request; lets the viewer run with no backend.
#[derive(Debug, Clone, Default)]
pub struct OfflineEphemeris;

impl EphemerisSource for OfflineEphemeris {
    async fn ecef_position(&self, _lat: f64, _lon: f64) -> Result<Vector3, EphemerisError> {
        Err(EphemerisError::Unavailable("offline mode".to_string()))
    }

    async fn earth_rotation_angle(&self, _timestamp: &str) -> Result<f64, EphemerisError> {
        Err(EphemerisError::Unavailable("offline mode".to_string()))
    }

    async fn sun_position(&self, _timestamp: &str) -> Result<Vector3, EphemerisError> {
        Err(EphemerisError::Unavailable("offline mode".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn direction_permutes_then_normalizes() {
        let dir = direction_from_service(&[0.0, 0.0, 2.0]).unwrap();
        assert_eq!(dir, [0.0, 1.0, 0.0]);

        let dir = direction_from_service(&[0.1, 0.2, 0.97]).unwrap();
        let n = (0.1f64.powi(2) + 0.2f64.powi(2) + 0.97f64.powi(2)).sqrt();
        assert_relative_eq!(dir[0], 0.2 / n, epsilon = 1e-12);
        assert_relative_eq!(dir[1], 0.97 / n, epsilon = 1e-12);
        assert_relative_eq!(dir[2], 0.1 / n, epsilon = 1e-12);
    }

    #[test]
    fn zero_vector_is_degenerate() {
        assert!(matches!(
            direction_from_service(&[0.0, 0.0, 0.0]),
            Err(EphemerisError::DegenerateDirection)
        ));
    }
}
