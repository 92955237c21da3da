//! # Lumen Studio
//!
//! Command-line studio for composing small animated LED icons.
//!
//! This binary ties together:
//! - Editor: pixel grid, painting, history, frames, preview playback
//! - Library: saving, listing and opening icons on the library server
//! - Device: brightness-scaled pixel buffers for the LED panel

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

mod app;
mod commands;
mod config;
mod output;
mod playback;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lumen_library::http::HttpIconStore;
use lumen_library::store::{IconStore, InMemoryIconStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::app::{App, Reply};
use crate::commands::Command;
use crate::config::StudioConfig;

/// Command-line arguments.
#[derive(Debug, Parser)]
#[command(name = "lumen", version, about = "Pixel-art icon studio for LED displays")]
struct Args {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Icon library server URL
    #[arg(long)]
    library_url: Option<String>,

    /// Keep the library in memory instead of using the server
    #[arg(long)]
    offline: bool,

    /// Write the effective configuration to the config file and exit
    #[arg(long)]
    write_config: bool,
}

/// Main entry point.
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env().add_directive("lumen=info".parse()?))
        .init();

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(StudioConfig::config_path);
    let mut config = StudioConfig::load_from(&config_path);
    if let Some(url) = args.library_url {
        config.library_url = url;
    }
    if args.offline {
        config.offline = true;
    }
    config.validate();

    if args.write_config {
        config
            .save_to(&config_path)
            .with_context(|| format!("writing {}", config_path.display()))?;
        return Ok(());
    }

    info!("Lumen studio {}", env!("CARGO_PKG_VERSION"));

    if config.offline {
        info!("Offline mode: icons are kept in memory");
        run(App::new(config, InMemoryIconStore::new())).await
    } else {
        let store = HttpIconStore::new(&config.library_url, config.request_timeout())
            .context("building HTTP client")?;
        info!("Icon library at {}", store.base_url());
        run(App::new(config, store)).await
    }
}

/// Reads commands from stdin until `quit` or end of input.
async fn run<S: IconStore>(mut app: App<S>) -> Result<()> {
    println!("Type 'help' for commands.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let Some(line) = lines.next_line().await.context("reading stdin")? else {
            app.execute(Command::Quit).await;
            break;
        };
        if line.trim().is_empty() {
            continue;
        }
        let command: Command = match line.parse() {
            Ok(command) => command,
            Err(e) => {
                warn!("Rejected input {line:?}: {e}");
                println!("error: {e}");
                continue;
            },
        };
        match app.execute(command).await {
            Reply::Lines(output) => {
                for text in output {
                    println!("{}", text.trim_end_matches('\n'));
                }
            },
            Reply::Quit => break,
        }
    }
    info!("Lumen studio shutdown complete");
    Ok(())
}
