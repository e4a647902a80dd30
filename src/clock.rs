//! Simulated clock coupled to the body-fixed rotation rate.

use chrono::{DateTime, SecondsFormat, TimeDelta, Utc};
use frames_core::time::rotation_to_seconds;

/// Simulated time: a fixed epoch plus elapsed seconds.
///
/// Elapsed time accumulates as `f64` seconds so repeated advances add up the
/// same way a single large advance does; calendar time is only derived on
/// read.
#[derive(Debug, Clone, PartialEq)]
pub struct Clock {
    epoch: DateTime<Utc>,
    elapsed_seconds: f64,
    period_seconds: f64,
}

impl Clock {
    /// Start a clock at `epoch` for a frame turning once every `period_seconds`.
    pub fn new(epoch: DateTime<Utc>, period_seconds: f64) -> Self {
        Self {
            epoch,
            elapsed_seconds: 0.0,
            period_seconds,
        }
    }

    /// Simulated seconds covered by one tick at `rate` radians per tick.
    pub fn seconds_per_tick(&self, rate: f64) -> f64 {
        rotation_to_seconds(rate, self.period_seconds)
    }

    /// Advance by one tick at `rate`. Zero is a no-op and negative rates run backward.
    pub fn advance(&mut self, rate: f64) {
        self.elapsed_seconds += self.seconds_per_tick(rate);
    }

    /// Advance by `ticks` ticks at `rate` in one step.
    pub fn advance_ticks(&mut self, ticks: u64, rate: f64) {
        self.elapsed_seconds += ticks as f64 * self.seconds_per_tick(rate);
    }

    pub fn epoch(&self) -> DateTime<Utc> {
        self.epoch
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    /// Current simulated instant, rounded to whole milliseconds.
    pub fn now(&self) -> DateTime<Utc> {
        let millis = (self.elapsed_seconds * 1_000.0).round();
        let delta = if millis.is_finite() {
            TimeDelta::try_milliseconds(millis as i64)
        } else {
            None
        };
        delta
            .and_then(|delta| self.epoch.checked_add_signed(delta))
            .unwrap_or(if self.elapsed_seconds < 0.0 {
                DateTime::<Utc>::MIN_UTC
            } else {
                DateTime::<Utc>::MAX_UTC
            })
    }

    /// Current simulated instant as ISO-8601 with milliseconds, e.g. `2025-08-17T22:01:00.000Z`.
    pub fn iso8601(&self) -> String {
        self.now().to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}
