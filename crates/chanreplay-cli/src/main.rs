//! # chanreplay CLI entry point
//!
//! Parses command-line arguments and dispatches to subcommand handlers.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use chanreplay_cli::gather::{run_gather, GatherArgs};
use chanreplay_cli::revocation::{run_revocation, RevocationArgs};
use chanreplay_cli::update::{run_update, UpdateArgs};

/// Build channel update messages and replay captured channel logs.
#[derive(Parser, Debug)]
#[command(name = "chanreplay", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new update message.
    Update(UpdateArgs),

    /// Replay a log of sent and received messages.
    Gather(GatherArgs),

    /// Print a revocation hash (or preimage) from a seed.
    Revocation(RevocationArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // RUST_LOG wins over -v when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| match cli.verbose {
        0 => EnvFilter::new("warn"),
        1 => EnvFilter::new("info"),
        2 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut stdout = std::io::stdout().lock();
    let result = match &cli.command {
        Commands::Update(args) => run_update(args, &mut stdout),
        Commands::Gather(args) => run_gather(args, &mut stdout),
        Commands::Revocation(args) => run_revocation(args, &mut stdout),
    };

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}
