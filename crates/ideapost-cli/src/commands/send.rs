//! `ideapost send` -- select, render and email today's briefing.
//!
//! # Example
//!
//! ```text
//! ideapost send
//! ideapost send --dry-run --seed 7
//! ```

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use clap::Args;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::info;

use ideapost_channels::email::build_mailer;
use ideapost_core::{HtmlRenderer, Mailer, RenderedEmail, RunContext, RunOptions, run_daily};
use ideapost_platform::{NativePlatform, Platform};
use ideapost_types::ChannelError;

use super::load_config;

/// Arguments for the `ideapost send` subcommand.
#[derive(Args)]
pub struct SendArgs {
    /// Select and render only; send nothing and leave state files alone.
    #[arg(long)]
    pub dry_run: bool,

    /// Seed the selector for a reproducible pick.
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Stand-in transport for dry runs, which never reach the send step.
struct DryRunMailer;

#[async_trait]
impl Mailer for DryRunMailer {
    async fn send(&self, email: &RenderedEmail) -> Result<(), ChannelError> {
        info!(subject = %email.subject, "dry run, not sending");
        Ok(())
    }
}

pub async fn run(config_path: Option<&Path>, args: SendArgs) -> anyhow::Result<()> {
    let platform = NativePlatform::new();
    let loaded = load_config(&platform, config_path).await?;

    let mailer: Arc<dyn Mailer> = if args.dry_run {
        Arc::new(DryRunMailer)
    } else {
        build_mailer(&loaded.config)?
    };
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let ctx = RunContext::new(&loaded.config, platform.fs(), loaded.data_paths());
    let today = chrono::Local::now().date_naive();
    let summary = run_daily(
        &ctx,
        mailer.as_ref(),
        &HtmlRenderer::new(),
        &mut rng,
        today,
        RunOptions {
            dry_run: args.dry_run,
        },
    )
    .await?;

    if summary.dry_run {
        println!("Dry run for {}: nothing sent", summary.date);
    } else {
        println!("Sent: {}", summary.subject);
    }
    for (i, name) in summary.main.iter().enumerate() {
        println!("  {}. {name}", i + 1);
    }
    if !summary.previews.is_empty() {
        println!("Previews offered:");
        for (i, name) in summary.previews.iter().enumerate() {
            println!("  {}. {name}", i + 1);
        }
    }
    if summary.cycled {
        println!("Catalog cycled: sent history was reset");
    }
    if let Some(report) = &summary.report {
        println!("Report: {}", report.display());
    }
    Ok(())
}
