//! Stream Studio - local live-streaming studio
//!
//! Camera and screen sources, stage layouts, branded overlays, a mock
//! viewer chat, and helpers for titling and provisioning a YouTube Live
//! broadcast.

mod app;
mod capture;
mod chat;
mod config;
mod dashboard;
mod integrations;
mod layout;
mod overlay;
mod shared;
mod stage;
mod storage;

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use crate::app::StreamStudio;
use crate::capture::SyntheticBackend;
use crate::config::AppConfig;
use crate::shared::SharedAppState;

/// Stream Studio - local live-streaming studio
#[derive(Parser, Debug)]
#[command(name = "stream-studio")]
#[command(about = "Compose camera and screen sources with branded overlays and go live")]
struct Args {
    /// Load configuration from this file instead of the user config directory
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,

    /// Do not acquire the camera at start-up
    #[arg(long)]
    no_camera: bool,

    /// Start with the microphone muted
    #[arg(long)]
    muted: bool,
}

fn main() -> Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    if args.print_default_config {
        let toml = toml::to_string_pretty(&AppConfig::default())
            .context("Failed to serialize default configuration")?;
        println!("{}", toml);
        return Ok(());
    }

    info!("Stream Studio starting...");

    let (mut config, config_path) = load_or_create_config(args.config.as_deref());
    if args.muted {
        config.general.start_muted = true;
    }

    let backend = SyntheticBackend::new()
        .with_denied(config.capture.denied_kinds.iter().copied())
        .with_unavailable(config.capture.unavailable_kinds.iter().copied());
    let mut studio = StreamStudio::new(&config, Box::new(backend));
    if config.general.start_camera_on_launch && !args.no_camera {
        studio.start_camera();
    }

    let shared_state = Arc::new(RwLock::new(SharedAppState::new(config, config_path)));

    // Run the dashboard (blocking)
    if let Err(e) = dashboard::app::run_dashboard(studio, shared_state) {
        tracing::error!("Dashboard error: {}", e);
    }

    info!("Stream Studio shutdown complete");

    Ok(())
}

/// Load configuration from file or fall back to defaults.
///
/// Returns the path the configuration belongs to so it can be saved back.
fn load_or_create_config(explicit: Option<&Path>) -> (AppConfig, Option<PathBuf>) {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => match storage::default_config_path() {
            Ok(path) => Some(path),
            Err(e) => {
                warn!("No config directory available: {:#}", e);
                None
            }
        },
    };

    if let Some(path) = &path {
        if path.exists() {
            match config::load_config(path) {
                Ok(config) => {
                    info!("Loaded configuration from {:?}", path);
                    return (config, Some(path.clone()));
                }
                Err(e) => warn!("{:#}; using defaults", e),
            }
        } else if explicit.is_some() {
            warn!("Config file {:?} does not exist; using defaults", path);
        }
    }

    info!("Using default configuration");
    (AppConfig::default(), path)
}
