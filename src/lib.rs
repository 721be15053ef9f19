pub mod cli;
pub mod core;
pub mod pipeline;
pub mod sources;
pub mod store;

pub use crate::core::config;

use anyhow::Result;
use tracing::{debug, info};

/// Commands that operate on a loaded configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppCommand {
    Run,
    Query,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("bankcap starting...");

    let config = match config_path {
        Some(path) => config::AppConfig::load_from_path(path)?,
        None => config::AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    match command {
        AppCommand::Run => cli::run::run(&config).await,
        AppCommand::Query => cli::query::run(&config),
    }
}
