//! Eyelid monitor: replays recorded landmark streams and reports blinks and nodding.

use anyhow::{Context, Result};
use clap::Parser;
use eyelid_monitor::{config::Config, replay};
use log::info;
use std::fs::File;
use std::io::{self, BufReader};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// JSON-lines landmark recording (reads stdin when omitted)
    #[arg(short, long)]
    input: Option<String>,

    /// Path to configuration file (YAML format)
    #[arg(short = 'C', long)]
    config: Option<String>,

    /// EAR threshold for closed eye
    #[arg(short, long)]
    threshold: Option<f64>,

    /// Blink rate window in seconds
    #[arg(short, long)]
    window: Option<f64>,

    /// Assumed camera fps for debounce
    #[arg(long)]
    fps: Option<f64>,

    /// Pitch above which the head is reported as nodding
    #[arg(long)]
    pitch_threshold: Option<f64>,

    /// Attach pixel-space landmarks to each measurement
    #[arg(long)]
    landmarks: bool,

    /// Enable debug output
    #[arg(short, long)]
    debug: bool,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(threshold) = self.threshold {
            config.detection.eyelid_threshold = threshold;
        }
        if let Some(window) = self.window {
            config.blink.window_seconds = window;
        }
        if let Some(fps) = self.fps {
            config.blink.fps = fps;
            config.blink.confirm_frames = None;
        }
        if let Some(pitch_threshold) = self.pitch_threshold {
            config.display.pitch_nod_threshold = pitch_threshold;
        }
        if self.landmarks {
            config.display.include_landmarks = true;
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let level = if args.debug { "debug" } else { "info" };
    env_logger::init_from_env(env_logger::Env::new().default_filter_or(level));

    info!("Eyelid Monitor");

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading configuration from: {}", path);
            Config::from_file(path).with_context(|| format!("Failed to load config file {path}"))?
        }
        None => Config::default(),
    };
    args.apply(&mut config);

    let mut processor = config.create_processor().context("Invalid configuration")?;
    info!(
        "Blink confirmation after {} closed frames, {}s rate window",
        config.blink_confirm_frames(),
        config.blink.window_seconds
    );

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let summary = match &args.input {
        Some(path) => {
            info!("Replaying landmarks from: {}", path);
            let file = File::open(path).with_context(|| format!("Cannot open {path}"))?;
            replay::replay(BufReader::new(file), &mut out, &mut processor)?
        }
        None => replay::replay(io::stdin().lock(), &mut out, &mut processor)?,
    };

    info!(
        "Processed {} frames ({} with a face), {} blinks",
        summary.frames, summary.faces, summary.total_blinks
    );

    Ok(())
}
