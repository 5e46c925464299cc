/// Burst3D Terminal - gesture-driven explode/reassemble demo
///
/// Simulates a tracked hand from the keyboard and renders the scene as ASCII.
/// Controls:
///   - o / f / 1: Open palm, fist, index finger
///   - h: Hide or show the hand
///   - Arrow Keys: Move the hand (rotates the model while the palm is open)
///   - + / -: Bring the hand closer or further (camera distance)
///   - q / ESC: Quit
use std::fs::File;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use burst3d_terminal::{load_config, TerminalApp};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// TOML scene configuration (defaults are used when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the particle layout seed
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write logs to this file (the terminal itself is taken by the renderer)
    #[arg(short, long)]
    log: Option<PathBuf>,
}

fn init_logging(path: &PathBuf) -> Result<()> {
    let file = File::create(path).with_context(|| format!("failed to create log file {}", path.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Arc::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.log {
        init_logging(path)?;
    }

    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    let mut app = TerminalApp::new(config)?;
    match app.run()? {
        Some(destination) => println!("Redirecting to {}", destination),
        None => println!("Thank you for using Burst3D!"),
    }
    Ok(())
}
