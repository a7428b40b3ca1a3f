//! Tongue tracking demo driven by a simulated depth sensor.

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;
use std::sync::mpsc;
use tongue_tracking::app::{DirectionLog, FrameSink, TrackingApp};
use tongue_tracking::config::Config;
use tongue_tracking::simulation::SimulatedSensor;
use tongue_tracking::tracker::{FrameOutput, TongueTracker};
use tongue_tracking::utils::image_conversion::save_visualization;

/// Events buffered between the sensor threads and the tracking loop
const EVENT_QUEUE_DEPTH: usize = 4;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<PathBuf>,

    /// Number of depth frames to simulate (0 runs until interrupted)
    #[arg(long)]
    frames: Option<u64>,

    /// Pace the simulated sensor at its frame rate
    #[arg(long)]
    realtime: bool,

    /// Write the last visualization frame to this PNG file
    #[arg(long)]
    snapshot: Option<PathBuf>,

    /// Print the effective configuration as YAML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

/// Logs direction changes and remembers the last tongue tip for snapshots
#[derive(Default)]
struct DemoSink {
    log: DirectionLog,
    last_tip: Option<usize>,
}

impl FrameSink for DemoSink {
    fn present(&mut self, output: &FrameOutput<'_>) -> tongue_tracking::Result<()> {
        if let Some(candidate) = output.candidate {
            self.last_tip = Some(candidate.index);
        }
        self.log.present(output)
    }
}

fn load_config(args: &Args) -> Config {
    let mut config = args.config.as_ref().map_or_else(Config::default, |path| {
        info!("Loading configuration from: {}", path.display());
        match Config::from_file(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                warn!("Failed to load config file: {e}. Using defaults.");
                Config::default()
            }
        }
    });

    if let Some(frames) = args.frames {
        config.simulation.frames = frames;
    }
    if args.realtime {
        config.simulation.realtime = true;
    }
    config
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.debug {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("debug"));
    } else {
        env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    }

    let config = load_config(&args);
    config.validate().context("Invalid configuration")?;

    if args.print_config {
        print!("{}", serde_yaml::to_string(&config).context("Failed to serialize configuration")?);
        return Ok(());
    }

    info!("Tongue Tracking");
    info!(
        "Sensor {}x{} @ {} fps, {} frames",
        config.sensor.frame_width, config.sensor.frame_height, config.sensor.fps, config.simulation.frames
    );

    let tracker = TongueTracker::from_config(&config).context("Failed to create tracker")?;
    let sensor = SimulatedSensor::new(&config.sensor, config.simulation.clone())
        .context("Failed to create simulated sensor")?;

    let (tx, rx) = mpsc::sync_channel(EVENT_QUEUE_DEPTH);
    let producers = sensor.spawn(tx);

    let mut app = TrackingApp::new(tracker, rx);
    let mut sink = DemoSink::default();
    let stats = app.run(&mut sink).context("Tracking loop failed")?;

    for producer in producers {
        if producer.join().is_err() {
            warn!("Sensor thread panicked");
        }
    }

    info!(
        "Frames: {} received, {} processed, {} dropped, {} rejected",
        stats.frames_received, stats.frames_processed, stats.frames_dropped, stats.frames_rejected
    );
    info!("Direction changes: {}", sink.log.changes().len());

    if let Some(path) = &args.snapshot {
        let tracker = app.tracker();
        let (width, height) = tracker.frame_size();
        save_visualization(
            path,
            tracker.pixels(),
            width,
            height,
            Some((&tracker.state().region, sink.last_tip)),
        )
        .with_context(|| format!("Failed to write snapshot {}", path.display()))?;
        info!("Snapshot written to {}", path.display());
    }

    Ok(())
}
