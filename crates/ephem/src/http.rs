//! `reqwest`-backed implementation of [`EphemerisSource`].

use frames_core::vector::Vector3;
use log::debug;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::endpoint::{Endpoint, parse_base_url};
use crate::{EphemerisError, EphemerisSource};

/// HTTP client for the ephemeris service.
#[derive(Debug, Clone)]
pub struct HttpEphemeris {
    client: Client,
    base: Url,
}

#[derive(Debug, Deserialize)]
struct RotationAngle {
    angle: f64,
}

#[derive(Debug, Deserialize)]
struct ServiceError {
    error: String,
}

impl HttpEphemeris {
    /// Build a client rooted at `base_url` (e.g. `http://127.0.0.1:5001/api/`).
    pub fn new(base_url: &str) -> Result<Self, EphemerisError> {
        Self::with_client(Client::builder().build()?, base_url)
    }

    /// Use a preconfigured client, e.g. one with timeouts or proxy settings.
    pub fn with_client(client: Client, base_url: &str) -> Result<Self, EphemerisError> {
        Ok(Self {
            client,
            base: parse_base_url(base_url)?,
        })
    }

    /// Base URL every endpoint is resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    async fn fetch(&self, endpoint: Endpoint<'_>) -> Result<Vec<u8>, EphemerisError> {
        let url = endpoint.url(&self.base)?;
        debug!("GET {url}");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if !status.is_success() {
            let message = serde_json::from_slice::<ServiceError>(&body)
                .map(|err| err.error)
                .unwrap_or_else(|_| String::from_utf8_lossy(&body).trim().to_string());
            return Err(EphemerisError::Status {
                endpoint: endpoint.path(),
                status: status.as_u16(),
                message,
            });
        }
        Ok(body.to_vec())
    }
}

impl EphemerisSource for HttpEphemeris {
    async fn ecef_position(&self, lat: f64, lon: f64) -> Result<Vector3, EphemerisError> {
        let endpoint = Endpoint::EcefPosition { lat, lon };
        let body = self.fetch(endpoint).await?;
        parse_vector(endpoint.path(), &body)
    }

    async fn earth_rotation_angle(&self, timestamp: &str) -> Result<f64, EphemerisError> {
        let endpoint = Endpoint::EarthRotationAngle { timestamp };
        let body = self.fetch(endpoint).await?;
        parse_angle(endpoint.path(), &body)
    }

    async fn sun_position(&self, timestamp: &str) -> Result<Vector3, EphemerisError> {
        let endpoint = Endpoint::SunPosition { timestamp };
        let body = self.fetch(endpoint).await?;
        parse_vector(endpoint.path(), &body)
    }
}

/// Decode a `[x, y, z]` body. Exactly three finite numbers are accepted.
pub fn parse_vector(endpoint: &'static str, body: &[u8]) -> Result<Vector3, EphemerisError> {
    let values: Vec<f64> = serde_json::from_slice(body)
        .map_err(|source| EphemerisError::Decode { endpoint, source })?;
    match values.as_slice() {
        [x, y, z] if values.iter().all(|v| v.is_finite()) => Ok([*x, *y, *z]),
        [_, _, _] => Err(EphemerisError::Shape {
            endpoint,
            detail: "vector contains non-finite components".to_string(),
        }),
        other => Err(EphemerisError::Shape {
            endpoint,
            detail: format!("expected 3 components, got {}", other.len()),
        }),
    }
}

/// Decode a `{"angle": value}` body.
pub fn parse_angle(endpoint: &'static str, body: &[u8]) -> Result<f64, EphemerisError> {
    let parsed: RotationAngle = serde_json::from_slice(body)
        .map_err(|source| EphemerisError::Decode { endpoint, source })?;
    if !parsed.angle.is_finite() {
        return Err(EphemerisError::Shape {
            endpoint,
            detail: format!("angle is not finite ({})", parsed.angle),
        });
    }
    Ok(parsed.angle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    #[test]
    fn vector_body_requires_three_components() {
        assert_eq!(
            parse_vector("get_sun_position", b"[0.1, 0.2, 0.97]").unwrap(),
            [0.1, 0.2, 0.97]
        );
        assert!(matches!(
            parse_vector("get_sun_position", b"[1, 2]"),
            Err(EphemerisError::Shape { .. })
        ));
        assert!(matches!(
            parse_vector("get_sun_position", b"{\"error\": \"nope\"}"),
            Err(EphemerisError::Decode { .. })
        ));
    }

    #[test]
    fn angle_body_reads_the_angle_field() {
        let angle = parse_angle("get_earth_rotation_angle", br#"{"angle": 1.25}"#).unwrap();
        assert_eq!(angle, 1.25);
        assert!(parse_angle("get_earth_rotation_angle", b"[1.0]").is_err());
    }

    /// Answer one request with a canned response and hand back its request line.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (HttpEphemeris, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}/api", listener.local_addr().unwrap());
        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request)
                .lines()
                .next()
                .unwrap_or_default()
                .to_string()
        });
        let client = Client::builder().no_proxy().build().unwrap();
        (HttpEphemeris::with_client(client, &base).unwrap(), server)
    }

    #[tokio::test]
    async fn ecef_request_carries_the_query_and_decodes_the_vector() {
        let (ephemeris, server) = serve_once("200 OK", "[0.1,0.2,0.97]").await;
        let position = ephemeris.ecef_position(29.95, -90.07).await.unwrap();
        assert_eq!(position, [0.1, 0.2, 0.97]);
        assert_eq!(
            server.await.unwrap(),
            "GET /api/get_ecef_position?lat=29.95&lon=-90.07 HTTP/1.1"
        );
    }

    #[tokio::test]
    async fn error_status_surfaces_the_service_message() {
        let (ephemeris, server) =
            serve_once("400 Bad Request", r#"{"error":"Timestamp is required"}"#).await;
        let err = ephemeris.sun_position("").await.unwrap_err();
        match err {
            EphemerisError::Status {
                endpoint,
                status,
                message,
            } => {
                assert_eq!(endpoint, "get_sun_position");
                assert_eq!(status, 400);
                assert_eq!(message, "Timestamp is required");
            }
            other => panic!("expected a status error, got {other:?}"),
        }
        assert!(server.await.unwrap().starts_with("GET /api/get_sun_position?timestamp="));
    }

    #[tokio::test]
    async fn rotation_angle_is_read_from_a_live_response() {
        let (ephemeris, server) = serve_once("200 OK", r#"{"angle": 4.2}"#).await;
        let angle = ephemeris
            .earth_rotation_angle("2025-08-17T22:01:00.000Z")
            .await
            .unwrap();
        assert_eq!(angle, 4.2);
        assert!(
            server
                .await
                .unwrap()
                .starts_with("GET /api/get_earth_rotation_angle?timestamp=2025-08-17T22")
        );
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        let client = HttpEphemeris::new("http://localhost:5001/api").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:5001/api/");
    }
}
