//! sqlpatch CLI - apply ordered SQL patches and track the schema version

use anyhow::Result;
use clap::Parser;
use sp_core::CoreError;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod context;

use cli::{Cli, GlobalArgs};
use commands::common::{ExitCode, EXIT_CONFIG_ABORT};
use commands::{install, new, patch, split, version};

/// Route `log` records from the library crates to stderr
fn setup_logging(global: &GlobalArgs) {
    let default_level = if global.verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        cli::Commands::Patch(args) => patch::execute(args, &cli.global).await,
        cli::Commands::New(args) => new::execute(args, &cli.global).await,
        cli::Commands::Install(args) => install::execute(args, &cli.global).await,
        cli::Commands::Version => version::execute(&cli.global).await,
        cli::Commands::Split(args) => split::execute(args, &cli.global).await,
    }
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    let cli = Cli::parse();
    setup_logging(&cli.global);

    match run(&cli).await {
        Ok(()) => std::process::ExitCode::SUCCESS,
        Err(err) => {
            if let Some(ExitCode(code)) = err.downcast_ref::<ExitCode>() {
                return std::process::ExitCode::from(u8::try_from(*code).unwrap_or(1));
            }
            eprintln!("Error: {err:#}");
            if err.downcast_ref::<CoreError>().is_some() {
                std::process::ExitCode::from(EXIT_CONFIG_ABORT as u8)
            } else {
                std::process::ExitCode::FAILURE
            }
        }
    }
}
