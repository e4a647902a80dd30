//! Headless host for the dual-frame animation.
//!
//! Drives the controller from a fixed-rate interval on a single-threaded
//! runtime and reports frames as log lines, an optional CSV frame log, and
//! an optional JSON summary.

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use frame_sync::config::{ViewerConfig, load_config};
use frame_sync::controller::AnimationController;
use frame_sync::ephemeris::{EphemerisSource, HttpEphemeris, OfflineEphemeris};
use frame_sync::export::{frames, summary};
use frame_sync::scene::{FrameSnapshot, Scene, SceneLayout};
use log::{info, warn};
use tokio::time::{MissedTickBehavior, interval};

#[derive(Parser, Debug)]
#[command(author, version, about = "Animate the inertial/body-fixed frames and orbiting satellite")]
struct Cli {
    /// Viewer configuration (YAML or TOML); defaults apply when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Start with the animation running
    #[arg(long, default_value_t = false)]
    start: bool,

    /// Body-fixed radians per tick (clamped to the configured range)
    #[arg(long)]
    rate: Option<f64>,

    /// Latitude to resolve after startup (degrees)
    #[arg(long, allow_hyphen_values = true, requires = "lon")]
    lat: Option<String>,

    /// Longitude to resolve after startup (degrees)
    #[arg(long, allow_hyphen_values = true, requires = "lat")]
    lon: Option<String>,

    /// Stop after this many ticks instead of running until Ctrl-C
    #[arg(long)]
    ticks: Option<u64>,

    /// Override the configured refresh rate
    #[arg(long)]
    fps: Option<u32>,

    /// Log a status line every N ticks
    #[arg(long, default_value_t = 60)]
    status_every: u64,

    /// Write one CSV row per tick (`-` for stdout)
    #[arg(long)]
    record: Option<PathBuf>,

    /// Write a JSON session summary on exit
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Ephemeris service base URL (overrides the config)
    #[arg(long)]
    base_url: Option<String>,

    /// Do not contact the ephemeris service; seeds stay at their defaults
    #[arg(long, default_value_t = false)]
    offline: bool,
}

struct TextScene {
    status_every: u64,
    recorder: Option<Box<dyn Write>>,
    record_error: Option<std::io::Error>,
}

impl Scene for TextScene {
    fn setup(&mut self, layout: &SceneLayout) {
        info!(
            "scene: earth r={:.3}, orbit r={:.3} ({} path points), sun r={:.1} at {:.1}",
            layout.earth_radius,
            layout.orbit_radius,
            layout.orbit_path.len(),
            layout.sun_radius,
            layout.sun_distance
        );
    }

    fn redraw(&mut self, frame: &FrameSnapshot) {
        if self.status_every > 0 && frame.tick % self.status_every == 0 {
            let stale = if frame.degraded { " [stale seeds]" } else { "" };
            info!(
                "{} {} orientation={:.4} rad anomaly={:.4} rad sat=[{:.3}, {:.3}, {:.3}]{}",
                frame.timestamp,
                if frame.running { "running" } else { "stopped" },
                frame.orientation,
                frame.anomaly,
                frame.satellite_inertial[0],
                frame.satellite_inertial[1],
                frame.satellite_inertial[2],
                stale
            );
        }

        if self.record_error.is_some() {
            return;
        }
        if let Some(writer) = self.recorder.as_mut() {
            let record = frames::Record {
                tick: frame.tick,
                timestamp: &frame.timestamp,
                elapsed_s: frame.elapsed_s,
                running: frame.running,
                orientation_rad: frame.orientation,
                anomaly_rad: frame.anomaly,
                satellite: frame.satellite_inertial,
            };
            if let Err(err) = record.write_to(writer.as_mut()) {
                warn!("frame log write failed, recording stopped: {err}");
                self.record_error = Some(err);
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(base_url) = &cli.base_url {
        config.service.base_url = base_url.clone();
    }
    if let Some(fps) = cli.fps {
        config.animation.fps = fps;
    }
    config.validate()?;

    if cli.offline {
        run(cli, config, OfflineEphemeris).await
    } else {
        let source = HttpEphemeris::new(&config.service.base_url)?;
        run(cli, config, source).await
    }
}

async fn run<S: EphemerisSource>(cli: Cli, config: ViewerConfig, source: S) -> anyhow::Result<()> {
    let frame_period = Duration::from_secs_f64(1.0 / config.animation.fps as f64);
    let mut controller = AnimationController::new(config, source)?;
    controller.initialize();

    if let Some(rate) = cli.rate {
        let applied = controller.set_rate(rate);
        if applied != rate {
            warn!("rate {rate} clamped to {applied}");
        }
    }
    if let (Some(lat), Some(lon)) = (&cli.lat, &cli.lon) {
        if controller.submit(lat, lon).is_none() {
            warn!("ignoring non-numeric coordinates ({lat}, {lon})");
        }
    }
    if cli.start {
        controller.toggle();
    }

    let recorder = match &cli.record {
        Some(path) => {
            let mut writer = frames::writer_for_path(path)?;
            frames::write_header(writer.as_mut())?;
            Some(writer)
        }
        None => None,
    };
    let mut scene = TextScene {
        status_every: cli.status_every,
        recorder,
        record_error: None,
    };

    scene.setup(&controller.layout());

    let mut refresh = interval(frame_period);
    refresh.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        if cli.ticks.is_some_and(|limit| controller.ticks() >= limit) {
            break;
        }
        tokio::select! {
            _ = refresh.tick() => controller.tick(&mut scene),
            _ = &mut shutdown => {
                info!("interrupted");
                break;
            }
        }
    }

    if let Some(writer) = scene.recorder.as_mut() {
        writer.flush()?;
    }
    if let Some(err) = scene.record_error.take() {
        return Err(err.into());
    }

    controller.apply_completions();
    let session = controller.session_summary();
    info!(
        "finished after {} ticks at {} (rotation seed {}, sun seed {})",
        session.ticks, session.final_timestamp, session.rotation_seed, session.sun_seed
    );
    if let Some(path) = &cli.summary {
        summary::write_summary(path, &session)?;
    }
    Ok(())
}
