//! Linkrelay CLI
//!
//! Inspect relay channel configuration and replay deep-link scenarios
//! against the relay without a device.

mod report;
mod runner;
mod scenario;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use linkrelay_core::RelayConfig;

use crate::scenario::Scenario;

#[derive(Parser)]
#[command(name = "linkrelay")]
#[command(author, version, about = "Deep-link relay tooling", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the relay channel name
    Channel {
        /// Application id
        #[arg(long, conflicts_with = "config")]
        app_id: Option<String>,

        /// Path to linkrelay.toml
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Validate a configuration file
    Check {
        /// Path to linkrelay.toml
        #[arg(short, long, default_value = "linkrelay.toml")]
        config: PathBuf,
    },

    /// Replay a JSON scenario against the relay
    Simulate {
        /// Scenario file
        scenario: PathBuf,

        /// Application id (overrides the scenario's)
        #[arg(long, conflicts_with = "config")]
        app_id: Option<String>,

        /// Path to linkrelay.toml
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Write the JSON report here instead of stdout
        #[arg(long)]
        report: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(path: &Path) -> Result<RelayConfig> {
    RelayConfig::from_path(path)
        .with_context(|| format!("failed to load config {}", path.display()))
}

fn resolve_config(
    app_id: Option<String>,
    config: Option<&Path>,
    fallback_app_id: Option<String>,
) -> Result<RelayConfig> {
    if let Some(path) = config {
        return load_config(path);
    }
    let Some(app_id) = app_id.or(fallback_app_id) else {
        bail!("no app id: pass --app-id or --config");
    };
    let config = RelayConfig::new(app_id);
    config.validate()?;
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Channel { app_id, config } => {
            let config = resolve_config(app_id, config.as_deref(), None)?;
            println!("{}", config.channel_name());
        }

        Commands::Check { config } => {
            let loaded = load_config(&config)?;
            info!(
                channel = %loaded.channel_name(),
                push = %loaded.push_method,
                pull = %loaded.pull_method,
                "configuration ok"
            );
        }

        Commands::Simulate {
            scenario,
            app_id,
            config,
            report,
        } => {
            let loaded = Scenario::from_path(&scenario)?;
            let config = resolve_config(app_id, config.as_deref(), loaded.app_id.clone())?;
            let outcome = runner::run_scenario(&loaded, config)?;

            match &report {
                Some(path) => outcome.write_to_path(path)?,
                None => outcome.write_to_writer(&mut std::io::stdout().lock())?,
            }

            if outcome.is_failed() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}
