//! Per-refresh animation loop tying the clock, kinematics, and ephemeris results together.

use frames_config::{ConfigError, ViewerConfig};
use frames_ephem::EphemerisSource;
use frames_export::summary::SessionSummary;
use frames_kinematics::frame_rotation;
use frames_kinematics::orbit::{OrbitModel, wrap_anomaly};
use log::{debug, trace};

use crate::clock::Clock;
use crate::completion::{self, Completion, CompletionReceiver, CompletionSender};
use crate::geodetic::{GeodeticDirectionResolver, GeodeticQuery, ResolveOutcome};
use crate::scene::{FrameSnapshot, Scene, SceneLayout};
use crate::sync::{EphemerisSync, SyncStatus};

/// Whether kinematics advance on each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    Running,
    #[default]
    Stopped,
}

/// Owns all animation state for one viewing session.
pub struct AnimationController<S: EphemerisSource> {
    config: ViewerConfig,
    clock: Clock,
    orbit: OrbitModel,
    source: S,
    resolver: GeodeticDirectionResolver<S>,
    sync: EphemerisSync,
    state: RunState,
    rate: f64,
    seed_orientation: f64,
    rotation_since_epoch: f64,
    anomaly: f64,
    accumulated_anomaly: f64,
    ticks: u64,
    running_ticks: u64,
    timestamp_text: String,
    in_flight: usize,
    tx: CompletionSender,
    rx: CompletionReceiver,
}

impl<S: EphemerisSource> AnimationController<S> {
    /// Build a stopped controller at the configured epoch. Nothing is requested yet.
    pub fn new(config: ViewerConfig, source: S) -> Result<Self, ConfigError> {
        config.validate()?;
        let epoch = config.animation.initial_epoch()?;
        let clock = Clock::new(epoch, config.animation.rotation_period_s);
        let orbit = OrbitModel::from_config(&config.scene, &config.orbit);
        let sync = EphemerisSync::new(
            config.animation.initial_timestamp.clone(),
            config.service.angle_unit,
            config.scene.sun_distance_scene(),
        );
        let (tx, rx) = completion::channel();
        let timestamp_text = clock.iso8601();
        Ok(Self {
            rate: config.animation.default_rate,
            resolver: GeodeticDirectionResolver::new(source.clone()),
            config,
            clock,
            orbit,
            source,
            sync,
            state: RunState::Stopped,
            seed_orientation: 0.0,
            rotation_since_epoch: 0.0,
            anomaly: 0.0,
            accumulated_anomaly: 0.0,
            ticks: 0,
            running_ticks: 0,
            timestamp_text,
            in_flight: 0,
            tx,
            rx,
        })
    }

    /// Fire the startup requests: both seeds and the configured surface point.
    ///
    /// Must be called from within a tokio runtime. Returns the number of
    /// requests issued; results are applied on later ticks. A non-finite
    /// configured surface point issues only the two seed requests.
    pub fn initialize(&mut self) -> usize {
        let seeds = self.sync.start(&self.source, &self.tx);
        self.in_flight += seeds;
        let (lat, lon) = (self.config.service.initial_lat, self.config.service.initial_lon);
        seeds + usize::from(self.resolve(lat, lon).is_some())
    }

    /// Flip between running and stopped.
    pub fn toggle(&mut self) -> RunState {
        self.state = match self.state {
            RunState::Running => RunState::Stopped,
            RunState::Stopped => RunState::Running,
        };
        debug!("animation {:?}", self.state);
        self.state
    }

    /// Set the rotation rate, clamped into the slider range. Non-finite input is ignored.
    pub fn set_rate(&mut self, rate: f64) -> f64 {
        if rate.is_finite() {
            self.rate = self.config.animation.clamp_rate(rate);
        } else {
            debug!("ignoring non-finite rate {rate}");
        }
        self.rate
    }

    /// Submit text lat/lon inputs. Unparsable or non-finite input is skipped.
    pub fn submit(&mut self, lat: &str, lon: &str) -> Option<u64> {
        match GeodeticQuery::parse(lat, lon) {
            Some(query) => self.resolve(query.lat, query.lon),
            None => {
                debug!("skipping submission with non-numeric input ({lat:?}, {lon:?})");
                None
            }
        }
    }

    /// Request the body-fixed direction of `(lat, lon)`.
    pub fn resolve(&mut self, lat: f64, lon: f64) -> Option<u64> {
        let generation = self.resolver.resolve(lat, lon, &self.tx)?;
        self.in_flight += 1;
        Some(generation)
    }

    /// Apply every queued completion. This is the only place request results touch state.
    pub fn apply_completions(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(completion) = self.rx.try_recv() {
            self.apply(completion);
            applied += 1;
        }
        applied
    }

    /// Wait for the next completion and apply it.
    ///
    /// Returns `false` without waiting when no request is in flight.
    pub async fn next_completion(&mut self) -> bool {
        if self.in_flight == 0 {
            return false;
        }
        match self.rx.recv().await {
            Some(completion) => {
                self.apply(completion);
                true
            }
            None => false,
        }
    }

    /// Requests issued but not yet applied.
    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    fn apply(&mut self, completion: Completion) {
        self.in_flight = self.in_flight.saturating_sub(1);
        match completion {
            Completion::Direction {
                generation,
                query,
                result,
            } => {
                if let ResolveOutcome::Stale = self.resolver.apply(generation, query, result) {
                    trace!("stale direction generation {generation} ignored");
                }
            }
            Completion::RotationSeed(result) => {
                if let Some(seed) = self.sync.apply_rotation(result) {
                    self.seed_orientation = seed;
                }
            }
            Completion::SunSeed(result) => self.sync.apply_sun(result),
        }
    }

    /// One display refresh.
    ///
    /// Completions are applied first. Kinematics advance only while running;
    /// the scene is updated and redrawn on every call.
    pub fn tick<Sc: Scene + ?Sized>(&mut self, scene: &mut Sc) {
        self.apply_completions();
        self.ticks += 1;

        if self.state == RunState::Running {
            self.clock.advance(self.rate);
            self.rotation_since_epoch =
                frame_rotation::integrate(self.rotation_since_epoch, self.rate);
            let advanced = self.orbit.advance(self.anomaly, self.rate);
            self.accumulated_anomaly += advanced - self.anomaly;
            self.anomaly = wrap_anomaly(advanced);
            self.running_ticks += 1;
            self.timestamp_text = self.clock.iso8601();
            trace!(
                "tick {} t={} orientation={:.6} anomaly={:.6}",
                self.ticks,
                self.timestamp_text,
                self.orientation(),
                self.anomaly
            );
        }

        scene.update_controls();
        scene.redraw(&self.snapshot());
    }

    /// Current state as a redraw would see it.
    pub fn snapshot(&self) -> FrameSnapshot {
        let scene = &self.config.scene;
        let light = self.sync.light();
        FrameSnapshot {
            tick: self.ticks,
            timestamp: self.timestamp_text.clone(),
            elapsed_s: self.clock.elapsed_seconds(),
            running: self.is_running(),
            rate: self.rate,
            orientation: self.orientation(),
            anomaly: self.anomaly,
            accumulated_anomaly: self.accumulated_anomaly,
            satellite_local: self.orbit.position(self.anomaly),
            satellite_inertial: self.orbit.inertial_position(self.anomaly),
            surface_direction: self.resolver.direction(),
            surface_point: self.resolver.surface_point(scene.earth_radius_scene),
            line_endpoint: self.resolver.line_endpoint(scene.line_length),
            sun_direction: light.map(|l| l.direction),
            sun_position: light.map(|l| l.position),
            degraded: self.sync.status().is_degraded(),
        }
    }

    /// Static geometry a scene builds once before the first redraw.
    pub fn layout(&self) -> SceneLayout {
        let scene = &self.config.scene;
        SceneLayout {
            earth_radius: scene.earth_radius_scene,
            sun_radius: scene.sun_radius_scene(),
            sun_distance: scene.sun_distance_scene(),
            line_length: scene.line_length,
            orbit_radius: self.orbit.radius(),
            orbit_path: self.orbit.path(self.config.orbit.path_segments),
        }
    }

    /// End-of-session figures for the JSON sidecar.
    pub fn session_summary(&self) -> SessionSummary {
        let status = self.sync.status();
        SessionSummary {
            ticks: self.ticks,
            running_ticks: self.running_ticks,
            initial_timestamp: self.config.animation.initial_timestamp.clone(),
            final_timestamp: self.clock.iso8601(),
            elapsed_s: self.clock.elapsed_seconds(),
            orientation_rad: self.orientation(),
            accumulated_anomaly_rad: self.accumulated_anomaly,
            rotation_seed: status.rotation.to_string(),
            sun_seed: status.sun.to_string(),
            degraded: status.is_degraded(),
            surface_direction: self.resolver.direction(),
            sun_direction: self.sync.light().map(|l| l.direction),
        }
    }

    /// Body-fixed orientation: the startup seed plus rotation integrated since the epoch.
    pub fn orientation(&self) -> f64 {
        self.seed_orientation + self.rotation_since_epoch
    }

    /// Wrapped anomaly.
    pub fn anomaly(&self) -> f64 {
        self.anomaly
    }

    pub fn accumulated_anomaly(&self) -> f64 {
        self.accumulated_anomaly
    }

    pub fn rate(&self) -> f64 {
        self.rate
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RunState::Running
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn orbit(&self) -> &OrbitModel {
        &self.orbit
    }

    pub fn resolver(&self) -> &GeodeticDirectionResolver<S> {
        &self.resolver
    }

    pub fn sync_status(&self) -> &SyncStatus {
        self.sync.status()
    }

    pub fn timestamp_text(&self) -> &str {
        &self.timestamp_text
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }
}
