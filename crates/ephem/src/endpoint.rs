//! The three service endpoints and their query strings.

use reqwest::Url;

use crate::EphemerisError;

/// One request against the ephemeris service.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint<'a> {
    EcefPosition { lat: f64, lon: f64 },
    EarthRotationAngle { timestamp: &'a str },
    SunPosition { timestamp: &'a str },
}

impl Endpoint<'_> {
    /// Path segment relative to the service base URL.
    pub fn path(&self) -> &'static str {
        match self {
            Self::EcefPosition { .. } => "get_ecef_position",
            Self::EarthRotationAngle { .. } => "get_earth_rotation_angle",
            Self::SunPosition { .. } => "get_sun_position",
        }
    }

    /// Query parameters, in the order the service documents them.
    pub fn query(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::EcefPosition { lat, lon } => {
                vec![("lat", lat.to_string()), ("lon", lon.to_string())]
            }
            Self::EarthRotationAngle { timestamp } | Self::SunPosition { timestamp } => {
                vec![("timestamp", timestamp.to_string())]
            }
        }
    }

    /// Full request URL under `base`.
    pub fn url(&self, base: &Url) -> Result<Url, EphemerisError> {
        let mut url = base
            .join(self.path())
            .map_err(|err| EphemerisError::InvalidUrl {
                url: base.to_string(),
                reason: err.to_string(),
            })?;
        url.query_pairs_mut().extend_pairs(self.query());
        Ok(url)
    }
}

/// Parse a base URL, making sure it ends with `/` so endpoint paths append.
pub fn parse_base_url(base: &str) -> Result<Url, EphemerisError> {
    let with_slash = if base.ends_with('/') {
        base.to_string()
    } else {
        format!("{base}/")
    };
    Url::parse(&with_slash).map_err(|err| EphemerisError::InvalidUrl {
        url: base.to_string(),
        reason: err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ecef_query_uses_plain_decimal_formatting() {
        let base = parse_base_url("http://127.0.0.1:5001/api").unwrap();
        let url = Endpoint::EcefPosition {
            lat: 29.95,
            lon: -90.07,
        }
        .url(&base)
        .unwrap();
        assert_eq!(
            url.as_str(),
            "http://127.0.0.1:5001/api/get_ecef_position?lat=29.95&lon=-90.07"
        );
    }

    #[test]
    fn timestamp_endpoints_share_the_query_key() {
        let base = parse_base_url("http://localhost/api/").unwrap();
        let rotation = Endpoint::EarthRotationAngle {
            timestamp: "2025-08-17T22:01:00.000Z",
        }
        .url(&base)
        .unwrap();
        assert_eq!(rotation.path(), "/api/get_earth_rotation_angle");
        let pairs: Vec<_> = rotation.query_pairs().into_owned().collect();
        assert_eq!(
            pairs,
            vec![("timestamp".to_string(), "2025-08-17T22:01:00.000Z".to_string())]
        );
    }
}
