//! `ideapost replies` -- answer replies to the last briefing.

use std::path::Path;

use ideapost_channels::email::{build_inbox, build_mailer};
use ideapost_core::{HtmlRenderer, RunContext, check_replies};
use ideapost_platform::{NativePlatform, Platform};

use super::load_config;

pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let platform = NativePlatform::new();
    let loaded = load_config(&platform, config_path).await?;

    let inbox = build_inbox(&loaded.config)?;
    let mailer = build_mailer(&loaded.config)?;
    let ctx = RunContext::new(&loaded.config, platform.fs(), loaded.data_paths());

    let outcome = check_replies(&ctx, inbox.as_ref(), mailer.as_ref(), &HtmlRenderer::new()).await?;

    if !outcome.polled {
        println!("No pending previews; inbox not checked");
        return Ok(());
    }
    println!(
        "Replies: {} fetched, {} breakdowns sent, {} help sent, {} already handled, {} ignored",
        outcome.fetched,
        outcome.details_sent,
        outcome.help_sent,
        outcome.already_processed,
        outcome.ignored,
    );
    Ok(())
}
