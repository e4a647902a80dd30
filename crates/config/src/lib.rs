//! Configuration models and loaders for the frame_sync viewer.
//!
//! Everything that used to be a free-floating scene constant lives here so
//! constructors can be handed a non-default scale in tests.

use std::path::Path;

use chrono::{DateTime, Utc};
use frames_core::units::km_to_scene;
use serde::Deserialize;
use thiserror::Error;

/// Epoch the simulated clock starts from unless overridden.
pub const DEFAULT_INITIAL_TIMESTAMP: &str = "2025-08-17T22:01:00.000Z";

/// Top-level viewer configuration, immutable once loaded.
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(default)]
pub struct ViewerConfig {
    pub scene: SceneConfig,
    pub animation: AnimationConfig,
    pub orbit: OrbitConfig,
    pub service: ServiceConfig,
}

/// Physical sizes and their mapping into scene units.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SceneConfig {
    pub earth_radius_scene: f64,
    pub earth_radius_km: f64,
    pub sun_radius_km: f64,
    pub sun_distance_km: f64,
    pub satellite_altitude_km: f64,
    /// Length of the line drawn from the origin toward the queried surface point.
    pub line_length: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            earth_radius_scene: 1.0,
            earth_radius_km: 6_378.0,
            sun_radius_km: 696_340.0,
            sun_distance_km: 151_447_880.0,
            satellite_altitude_km: 600.0,
            line_length: 2.0,
        }
    }
}

impl SceneConfig {
    /// Radius of the satellite's circular path in scene units.
    pub fn orbit_radius_scene(&self) -> f64 {
        km_to_scene(
            self.earth_radius_km + self.satellite_altitude_km,
            self.earth_radius_km,
            self.earth_radius_scene,
        )
    }

    /// Sun distance in scene units.
    pub fn sun_distance_scene(&self) -> f64 {
        km_to_scene(
            self.sun_distance_km,
            self.earth_radius_km,
            self.earth_radius_scene,
        )
    }

    /// Sun radius in scene units.
    pub fn sun_radius_scene(&self) -> f64 {
        km_to_scene(
            self.sun_radius_km,
            self.earth_radius_km,
            self.earth_radius_scene,
        )
    }
}

/// Clock and rate-slider settings.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct AnimationConfig {
    pub initial_timestamp: String,
    /// Body-fixed radians advanced per tick at startup.
    pub default_rate: f64,
    pub rate_min: f64,
    pub rate_max: f64,
    /// Simulated seconds for one full body-fixed rotation.
    pub rotation_period_s: f64,
    pub fps: u32,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            initial_timestamp: DEFAULT_INITIAL_TIMESTAMP.to_string(),
            default_rate: 0.002,
            rate_min: 0.0,
            rate_max: 0.02,
            rotation_period_s: frames_core::constants::SECONDS_PER_DAY,
            fps: 60,
        }
    }
}

impl AnimationConfig {
    /// Parse the configured initial timestamp.
    pub fn initial_epoch(&self) -> Result<DateTime<Utc>, ConfigError> {
        DateTime::parse_from_rfc3339(&self.initial_timestamp)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|err| {
                ConfigError::Invalid(format!(
                    "initial_timestamp `{}`: {err}",
                    self.initial_timestamp
                ))
            })
    }

    /// Clamp a requested rate into the slider range.
    pub fn clamp_rate(&self, rate: f64) -> f64 {
        rate.clamp(self.rate_min, self.rate_max)
    }
}

/// Fixed orbital-plane orientation and the orbit/rotation coupling.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct OrbitConfig {
    pub inclination_deg: f64,
    pub raan_deg: f64,
    /// Anomaly radians advanced per body-fixed radian.
    pub rate_coupling: f64,
    pub path_segments: usize,
}

impl Default for OrbitConfig {
    fn default() -> Self {
        Self {
            inclination_deg: -45.0,
            raan_deg: 0.0,
            rate_coupling: 1.5,
            path_segments: 128,
        }
    }
}

/// Unit the rotation-angle endpoint reports in.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
}

impl AngleUnit {
    /// Convert a value expressed in this unit to radians.
    pub fn to_radians(self, value: f64) -> f64 {
        match self {
            Self::Radians => value,
            Self::Degrees => value.to_radians(),
        }
    }
}

/// Ephemeris service location and startup query.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub base_url: String,
    pub angle_unit: AngleUnit,
    pub initial_lat: f64,
    pub initial_lon: f64,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5001/api/".to_string(),
            angle_unit: AngleUnit::Radians,
            initial_lat: 29.95,
            initial_lon: -90.07,
        }
    }
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ViewerConfig {
    /// Parse a YAML document. An empty document yields the defaults.
    pub fn from_yaml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = if contents.trim().is_empty() {
            Self::default()
        } else {
            serde_yaml::from_str(contents)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scene = &self.scene;
        for (name, value) in [
            ("scene.earth_radius_scene", scene.earth_radius_scene),
            ("scene.earth_radius_km", scene.earth_radius_km),
            ("scene.sun_distance_km", scene.sun_distance_km),
            ("animation.rotation_period_s", self.animation.rotation_period_s),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be positive (got {value})"
                )));
            }
        }
        if scene.satellite_altitude_km < 0.0 || !scene.satellite_altitude_km.is_finite() {
            return Err(ConfigError::Invalid(
                "scene.satellite_altitude_km must be non-negative".to_string(),
            ));
        }

        let animation = &self.animation;
        if !(animation.rate_min <= animation.rate_max) {
            return Err(ConfigError::Invalid(format!(
                "animation.rate_min ({}) exceeds rate_max ({})",
                animation.rate_min, animation.rate_max
            )));
        }
        if !(animation.rate_min..=animation.rate_max).contains(&animation.default_rate) {
            return Err(ConfigError::Invalid(format!(
                "animation.default_rate {} outside [{}, {}]",
                animation.default_rate, animation.rate_min, animation.rate_max
            )));
        }
        if animation.fps == 0 {
            return Err(ConfigError::Invalid("animation.fps must be non-zero".to_string()));
        }
        animation.initial_epoch()?;
        Ok(())
    }
}

/// Load and validate a viewer configuration from a YAML or TOML file.
///
/// Files ending in `.toml` are parsed as TOML, everything else as YAML.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ViewerConfig, ConfigError> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)?;
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        ViewerConfig::from_toml_str(&contents)
    } else {
        ViewerConfig::from_yaml_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orbit_radius_follows_altitude() {
        let scene = SceneConfig::default();
        let expected = (6_378.0 + 600.0) / 6_378.0;
        assert!((scene.orbit_radius_scene() - expected).abs() < 1e-12);
    }

    #[test]
    fn degrees_convert_to_radians() {
        assert_eq!(AngleUnit::Radians.to_radians(1.5), 1.5);
        assert!((AngleUnit::Degrees.to_radians(180.0) - std::f64::consts::PI).abs() < 1e-12);
    }
}
