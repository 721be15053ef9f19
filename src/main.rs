use anyhow::Result;
use bankcap::core::log::init_logging;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for bankcap::AppCommand {
    fn from(cmd: Commands) -> bankcap::AppCommand {
        match cmd {
            Commands::Run => bankcap::AppCommand::Run,
            Commands::Query => bankcap::AppCommand::Query,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch, convert and load the bank table, then run the queries
    Run,
    /// Run the queries against an already loaded database
    Query,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => bankcap::cli::setup::setup_at_path(path),
            None => bankcap::cli::setup::setup(),
        },
        Some(cmd) => bankcap::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
