//! The daily briefing run.
//!
//! Load catalog and history, select, render, send, then persist. State is
//! only written after the mailer accepts the briefing, so a failed send
//! leaves the history exactly as it was and the next run can retry.

use std::path::PathBuf;

use chrono::NaiveDate;
use rand::Rng;
use tracing::{info, warn};

use ideapost_types::state::{PendingDetails, PendingIdeas, RunLogEntry, SentHistory};
use ideapost_types::{Idea, IdeapostError, Result};

use crate::render::Renderer;
use crate::selector::{self, Selection, TierCounts};
use crate::store::RunContext;
use crate::traits::Mailer;

/// Date format of history log entries, the pending file and report names.
pub const FILE_DATE_FORMAT: &str = "%Y-%m-%d";
/// Date format used in subjects and headings.
pub const DISPLAY_DATE_FORMAT: &str = "%B %d, %Y";

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Select and render but neither send nor write anything.
    pub dry_run: bool,
}

/// What a daily run did.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub date: String,
    pub subject: String,
    pub main: Vec<String>,
    /// Bonus and high-risk names offered for follow-up.
    pub previews: Vec<String>,
    pub cycled: bool,
    pub dry_run: bool,
    pub report: Option<PathBuf>,
}

fn select<R: Rng + ?Sized>(
    ctx: &RunContext<'_>,
    catalog: &[Idea],
    history: &mut SentHistory,
    rng: &mut R,
) -> Selection {
    let config = ctx.config;
    if config.bonus_preview_count > 0 {
        let counts = TierCounts {
            main: config.ideas_per_day,
            bonus: config.bonus_preview_count,
        };
        selector::select_tiered(catalog, history, counts, rng)
    } else {
        selector::select_priority(catalog, history, config.ideas_per_day, rng)
    }
}

/// Run one daily briefing for `today`.
pub async fn run_daily<R: Rng + ?Sized>(
    ctx: &RunContext<'_>,
    mailer: &dyn Mailer,
    renderer: &dyn Renderer,
    rng: &mut R,
    today: NaiveDate,
    options: RunOptions,
) -> Result<RunSummary> {
    let catalog = ctx.store.load_catalog().await?;
    let mut history = ctx.store.load_history().await?;
    info!(
        catalog = catalog.len(),
        sent = history.sent_ids.len(),
        "loaded catalog and history"
    );

    let selection = select(ctx, &catalog, &mut history, rng);
    if selection.is_empty() {
        return Err(IdeapostError::NothingToSend);
    }

    let date = today.format(FILE_DATE_FORMAT).to_string();
    let date_display = today.format(DISPLAY_DATE_FORMAT).to_string();
    let email = renderer.briefing(&selection, &date_display);

    let mut summary = RunSummary {
        date: date.clone(),
        subject: email.subject.clone(),
        main: selection.main.iter().map(|i| i.business_name.clone()).collect(),
        previews: selection
            .previews()
            .map(|i| i.business_name.clone())
            .collect(),
        cycled: selection.cycled,
        dry_run: options.dry_run,
        report: None,
    };

    if options.dry_run {
        info!(subject = %email.subject, main = ?summary.main, previews = ?summary.previews, "dry run, nothing sent");
        return Ok(summary);
    }

    mailer.send(&email).await?;
    info!(subject = %email.subject, ideas = selection.all().count(), "briefing sent");

    for idea in selection.all() {
        history.record_sent(idea.id.clone());
    }
    history.log.push(RunLogEntry {
        date: date.clone(),
        ideas: summary.main.clone(),
        bonus: selection.bonus.iter().map(|i| i.business_name.clone()).collect(),
        high_risk: selection.high_risk.as_ref().map(|i| i.business_name.clone()),
    });
    ctx.store.save_history(&history).await?;

    let previews: PendingIdeas = selection.previews().cloned().collect();
    if !previews.is_empty() {
        ctx.store
            .save_pending(&PendingDetails {
                date: date.clone(),
                date_display: date_display.clone(),
                ideas: previews,
            })
            .await?;
    }

    if ctx.config.save_reports {
        let markdown = renderer.report(&selection, &date_display);
        match ctx.store.write_report(&date, &markdown).await {
            Ok(path) => summary.report = Some(path),
            Err(e) => warn!(error = %e, "failed to write report"),
        }
    }

    Ok(summary)
}
