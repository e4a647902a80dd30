//! One-shot check of the ephemeris service: runs the startup sync and a
//! geodetic resolution, then prints what the viewer would have seeded.

use std::path::PathBuf;

use clap::Parser;
use frame_sync::config::{ViewerConfig, load_config};
use frame_sync::controller::AnimationController;
use frame_sync::ephemeris::HttpEphemeris;
use frame_sync::sync::SeedStatus;

#[derive(Parser, Debug)]
#[command(author, version, about = "Query the ephemeris service once and print the seeds")]
struct Cli {
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ephemeris service base URL (overrides the config)
    #[arg(long)]
    base_url: Option<String>,

    /// Timestamp for the rotation and sun queries (ISO-8601)
    #[arg(long)]
    timestamp: Option<String>,

    #[arg(long, allow_hyphen_values = true)]
    lat: Option<f64>,

    #[arg(long, allow_hyphen_values = true)]
    lon: Option<f64>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ViewerConfig::default(),
    };
    if let Some(base_url) = cli.base_url {
        config.service.base_url = base_url;
    }
    if let Some(timestamp) = cli.timestamp {
        config.animation.initial_timestamp = timestamp;
    }
    if let Some(lat) = cli.lat {
        config.service.initial_lat = lat;
    }
    if let Some(lon) = cli.lon {
        config.service.initial_lon = lon;
    }

    let source = HttpEphemeris::new(&config.service.base_url)?;
    let (lat, lon) = (config.service.initial_lat, config.service.initial_lon);
    let mut controller = AnimationController::new(config, source)?;
    let issued = controller.initialize();
    if issued < 3 {
        eprintln!("[warn] surface point ({lat}, {lon}) is not finite; skipping ECEF query");
    }
    while controller.next_completion().await {}

    let frame = controller.snapshot();
    let status = controller.sync_status();
    println!("=== Ephemeris probe ===");
    println!("Timestamp        : {}", frame.timestamp);
    println!(
        "Rotation seed    : {} {}",
        status_tag(&status.rotation),
        format_angle(frame.orientation)
    );
    println!(
        "Sun direction    : {} {}",
        status_tag(&status.sun),
        format_vector(frame.sun_direction)
    );
    println!(
        "Surface ({lat}, {lon}) : {}",
        format_vector(frame.surface_direction)
    );
    if let SeedStatus::Failed(reason) = &status.rotation {
        eprintln!("[warn] rotation: {reason}");
    }
    if let SeedStatus::Failed(reason) = &status.sun {
        eprintln!("[warn] sun: {reason}");
    }

    if status.is_degraded() || frame.surface_direction.is_none() {
        anyhow::bail!("ephemeris service did not answer every query");
    }
    Ok(())
}

fn status_tag(status: &SeedStatus) -> &'static str {
    match status {
        SeedStatus::Pending => "[pending]",
        SeedStatus::Applied => "[applied]",
        SeedStatus::Failed(_) => "[failed]",
    }
}

fn format_angle(radians: f64) -> String {
    format!("{radians:.6} rad ({:.3}°)", radians.to_degrees())
}

fn format_vector(v: Option<[f64; 3]>) -> String {
    match v {
        Some([x, y, z]) => format!("[{x:.6}, {y:.6}, {z:.6}]"),
        None => "unavailable".to_string(),
    }
}
