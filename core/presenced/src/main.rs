//! zathura-presence: shows the document open in zathura as Discord rich presence.
//!
//! Polls the process table and zathura's D-Bus interface once per second and
//! publishes page progress, file name and (optionally) the current chapter.
//!
//! ## Usage
//!
//! ```bash
//! zathura-presence --show-chapters
//! ```
//!
//! Runs until SIGINT or SIGTERM, then clears the presence before exiting.

mod discord;
mod logging;
mod process;
mod shutdown;
mod zathura_bus;

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};
use zathura_presence_core::{load_config, PollState, PresenceConfig, Reconciler};

use discord::DiscordPublisher;
use process::ProcessTableLocator;
use shutdown::SignalShutdown;
use zathura_bus::ZathuraBus;

#[derive(Parser)]
#[command(name = "zathura-presence")]
#[command(about = "Discord rich presence for the zathura document viewer")]
#[command(version)]
struct Cli {
    /// Show the current chapter as the large image text
    #[arg(long)]
    show_chapters: bool,

    /// Config file (defaults to ~/.config/zathura-presence/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log file (defaults to ~/.local/share/zathura-presence/app.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let loaded = load_config(cli.config.as_deref());

    let log_path = cli
        .log_file
        .clone()
        .or_else(|| loaded.as_ref().ok().and_then(|config| config.log_file.clone()))
        .unwrap_or_else(logging::default_log_path);
    let _logging_guard = match logging::init(&log_path) {
        Ok(guard) => guard,
        Err(err) => {
            eprintln!("Failed to set up log file {}: {}", log_path.display(), err);
            std::process::exit(1);
        }
    };

    let mut config = match loaded {
        Ok(config) => config,
        Err(err) => {
            warn!(error = %err, "Failed to load config; using defaults");
            PresenceConfig::default()
        }
    };
    config.show_chapters |= cli.show_chapters;

    let shutdown = match SignalShutdown::install() {
        Ok(shutdown) => shutdown,
        Err(err) => {
            error!(error = %err, "Failed to install signal handler");
            std::process::exit(1);
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        log_file = %log_path.display(),
        "zathura-presence started"
    );

    let publisher = DiscordPublisher::new(config.application_id.clone());
    let mut reconciler = Reconciler::new(config, ProcessTableLocator, ZathuraBus, publisher);
    let mut state = PollState::default();
    reconciler.run(&mut state, &shutdown);
}
