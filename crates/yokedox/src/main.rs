//! Yokedox CLI - documentation site assembly.
//!
//! Provides commands for:
//! - `run`: Run a generator and write the pages it produces
//! - `replay`: Build a site from a recorded event stream

mod commands;
mod error;
mod event;
mod output;
mod session;

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{ReplayArgs, RunArgs};
use error::CliError;
use output::Output;

/// Yokedox - documentation site assembly.
#[derive(Parser)]
#[command(name = "yokedox", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a generator and write the pages it produces.
    Run(RunArgs),
    /// Build a site from a recorded event stream.
    Replay(ReplayArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Run(args) => args.site.verbose,
            Self::Replay(args) => args.site.verbose,
        }
    }

    async fn execute(self) -> Result<(), CliError> {
        match self {
            Self::Run(args) => args.execute().await,
            Self::Replay(args) => args.execute().await,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt.block_on(cli.command.execute()),
        Err(e) => Err(CliError::Io(e)),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            output.error(&format!("Error: {err}"));
            ExitCode::FAILURE
        }
    }
}
