//! drivedeck - terminal client for a remote drive service.
//!
//! Usage:
//!   drivedeck                    Launch the client
//!   drivedeck --base-url URL     Launch against a specific backend
//!   drivedeck --help             Show help
//!
//! The backend base address is resolved once at startup:
//! `DRIVEDECK_BASE_URL` environment variable, then the saved settings
//! file, then the built-in default. An explicit `--base-url` beats all
//! three.

use clap::Parser;
use color_eyre::eyre::Result;
use tracing_subscriber::EnvFilter;

use drivedeck_core::config::{self, Settings};

#[derive(Parser)]
#[command(
    name = "drivedeck",
    version,
    about = "Terminal client for a remote drive service",
    long_about = "drivedeck lets you browse, upload, and download files stored\n\
                  behind a remote drive service, straight from the terminal.\n\n\
                  Log in on the first screen; the directory tree on the left\n\
                  loads lazily as you expand it."
)]
struct Cli {
    /// Backend base address (overrides the environment and saved settings)
    #[arg(long)]
    base_url: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();

    let cli = Cli::parse();

    let settings = Settings::load().unwrap_or_else(|err| {
        tracing::warn!(%err, "could not load settings, starting with defaults");
        Settings::default()
    });

    let base_url = cli
        .base_url
        .unwrap_or_else(|| config::startup_base_url(&settings));

    drivedeck_tui::run(settings, base_url)?;

    Ok(())
}

/// Send tracing output to a file next to the settings; stderr belongs to
/// the terminal UI.
fn init_logging() {
    let Ok(config_file) = Settings::config_file() else {
        return;
    };
    let Some(dir) = config_file.parent() else {
        return;
    };
    if std::fs::create_dir_all(dir).is_err() {
        return;
    }
    let Ok(log_file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join("drivedeck.log"))
    else {
        return;
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(log_file)
        .with_ansi(false)
        .init();
}
