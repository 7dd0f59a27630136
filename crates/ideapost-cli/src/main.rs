//! `ideapost` -- CLI binary for the daily idea briefing.
//!
//! Provides the following subcommands:
//!
//! - `ideapost send` -- Select, render and email today's briefing.
//! - `ideapost replies` -- Answer replies asking for full breakdowns.
//! - `ideapost import` -- Merge freshly researched ideas into the catalog.
//! - `ideapost status` -- Show configuration and catalog status.
//!
//! Scheduling is left to cron or a systemd timer; each invocation does one
//! unit of work and exits.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing::error;

mod commands;
mod logging;

/// Daily SaaS idea briefings by email.
#[derive(Parser)]
#[command(name = "ideapost", about = "Daily SaaS idea briefings by email", version)]
struct Cli {
    /// Enable verbose (debug-level) logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (overrides IDEAPOST_CONFIG and ./config.json).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Also append logs to this file.
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Send today's briefing.
    Send(commands::send::SendArgs),
    /// Check the inbox and answer replies to the last briefing.
    Replies,
    /// Merge a JSON file of fresh ideas into the catalog.
    Import(commands::import::ImportArgs),
    /// Show configuration, catalog and history status.
    Status,
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.config.as_deref();
    match cli.command {
        Commands::Send(args) => commands::send::run(config, args).await,
        Commands::Replies => commands::replies::run(config).await,
        Commands::Import(args) => commands::import::run(config, args).await,
        Commands::Status => commands::status::run(config).await,
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let _guard = match logging::init(cli.verbose, cli.log_file.as_deref()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("ideapost: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
