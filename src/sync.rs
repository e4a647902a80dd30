//! One-shot startup sync of absolute orientation and sun direction.

use std::fmt;

use frames_config::AngleUnit;
use frames_core::vector::{self, Vector3};
use frames_ephem::{EphemerisError, EphemerisSource, direction_from_service};
use log::{info, warn};

use crate::completion::{Completion, CompletionSender, spawn_request};

/// Progress of one startup seed.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SeedStatus {
    #[default]
    Pending,
    Applied,
    Failed(String),
}

impl SeedStatus {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for SeedStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Applied => write!(f, "applied"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Status of both startup seeds.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SyncStatus {
    pub rotation: SeedStatus,
    pub sun: SeedStatus,
}

impl SyncStatus {
    /// True when either seed failed and the scene is running on defaults.
    pub fn is_degraded(&self) -> bool {
        self.rotation.is_failed() || self.sun.is_failed()
    }
}

/// Directional light anchored toward the sun; it always targets the origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub direction: Vector3,
    pub position: Vector3,
}

/// Fetches the two absolute seeds for the initial timestamp and applies them once.
#[derive(Debug)]
pub struct EphemerisSync {
    timestamp: String,
    angle_unit: AngleUnit,
    sun_distance: f64,
    status: SyncStatus,
    light: Option<LightSource>,
}

impl EphemerisSync {
    /// `sun_distance` is the scene distance the light is placed at.
    pub fn new(timestamp: impl Into<String>, angle_unit: AngleUnit, sun_distance: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            angle_unit,
            sun_distance,
            status: SyncStatus::default(),
            light: None,
        }
    }

    /// Issue both requests and return how many were sent. Each runs
    /// independently of the other and of the loop.
    pub fn start<S: EphemerisSource>(&self, source: &S, tx: &CompletionSender) -> usize {
        let rotation_source = source.clone();
        let timestamp = self.timestamp.clone();
        spawn_request(tx, async move {
            Completion::RotationSeed(rotation_source.earth_rotation_angle(&timestamp).await)
        });

        let sun_source = source.clone();
        let timestamp = self.timestamp.clone();
        spawn_request(tx, async move {
            Completion::SunSeed(sun_source.sun_position(&timestamp).await)
        });
        2
    }

    /// Record the rotation answer. Returns the seed angle in radians the first
    /// time a valid one arrives, and `None` otherwise.
    pub fn apply_rotation(&mut self, result: Result<f64, EphemerisError>) -> Option<f64> {
        if self.status.rotation == SeedStatus::Applied {
            return None;
        }
        match result {
            Ok(angle) => {
                let radians = self.angle_unit.to_radians(angle);
                info!("body-fixed orientation seeded at {radians:.6} rad for {}", self.timestamp);
                self.status.rotation = SeedStatus::Applied;
                Some(radians)
            }
            Err(err) => {
                warn!(
                    "rotation seed for {} failed: {err}; orientation stays at default",
                    self.timestamp
                );
                self.status.rotation = SeedStatus::Failed(err.to_string());
                None
            }
        }
    }

    /// Record the sun answer, placing the light on success.
    pub fn apply_sun(&mut self, result: Result<Vector3, EphemerisError>) {
        if self.status.sun == SeedStatus::Applied {
            return;
        }
        match result.and_then(|raw| direction_from_service(&raw)) {
            Ok(direction) => {
                info!(
                    "sun direction seeded at [{:.6}, {:.6}, {:.6}] for {}",
                    direction[0], direction[1], direction[2], self.timestamp
                );
                self.light = Some(LightSource {
                    direction,
                    position: vector::scale(&direction, self.sun_distance),
                });
                self.status.sun = SeedStatus::Applied;
            }
            Err(err) => {
                warn!(
                    "sun seed for {} failed: {err}; light stays unplaced",
                    self.timestamp
                );
                self.status.sun = SeedStatus::Failed(err.to_string());
            }
        }
    }

    pub fn status(&self) -> &SyncStatus {
        &self.status
    }

    pub fn light(&self) -> Option<LightSource> {
        self.light
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }
}
