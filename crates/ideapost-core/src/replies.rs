//! Reply check: answer requests for full breakdowns of previewed ideas.
//!
//! Each inbound message gets at most one follow-up. The processed-id file is
//! the guard; it is saved after the batch and also before a send failure is
//! propagated, so replies already answered stay answered.

use tracing::{debug, info, warn};

use ideapost_types::state::PendingDetails;
use ideapost_types::{ChannelError, Result};

use crate::matcher;
use crate::render::Renderer;
use crate::store::RunContext;
use crate::traits::{InboundReply, Inbox, Mailer};

/// Counts from one reply check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyOutcome {
    /// Whether the inbox was polled at all.
    pub polled: bool,
    pub fetched: usize,
    pub details_sent: usize,
    pub help_sent: usize,
    /// Replies whose message id was already processed.
    pub already_processed: usize,
    /// Replies recorded without a response (empty body or nothing pending).
    pub ignored: usize,
}

enum Handled {
    Details,
    Help,
    Ignored,
}

async fn respond(
    pending: &PendingDetails,
    reply: &InboundReply,
    mailer: &dyn Mailer,
    renderer: &dyn Renderer,
) -> std::result::Result<Handled, ChannelError> {
    if pending.ideas.is_empty() {
        debug!(message_id = %reply.message_id, "no pending ideas, recording reply only");
        return Ok(Handled::Ignored);
    }
    if reply.body.trim().is_empty() {
        debug!(message_id = %reply.message_id, "empty reply body");
        return Ok(Handled::Ignored);
    }

    let matched = matcher::match_ideas(&reply.body, &pending.ideas);
    if matched.is_empty() {
        let available: Vec<&str> = pending.ideas.names().collect();
        let email = renderer.help(&reply.body, &available, &pending.date_display);
        mailer.send(&email).await?;
        info!(message_id = %reply.message_id, "no match, sent help");
        return Ok(Handled::Help);
    }

    let email = renderer.details(&matched, &pending.date_display);
    mailer.send(&email).await?;
    info!(
        message_id = %reply.message_id,
        ideas = matched.len(),
        "sent full breakdown"
    );
    Ok(Handled::Details)
}

/// Poll for replies and answer each unprocessed one.
pub async fn check_replies(
    ctx: &RunContext<'_>,
    inbox: &dyn Inbox,
    mailer: &dyn Mailer,
    renderer: &dyn Renderer,
) -> Result<ReplyOutcome> {
    let Some(pending) = ctx.store.load_pending().await? else {
        info!("no pending details on file, skipping reply check");
        return Ok(ReplyOutcome::default());
    };

    let replies = match inbox.fetch_replies().await {
        Ok(replies) => replies,
        Err(e) => {
            warn!(error = %e, "failed to poll inbox, treating as no replies");
            Vec::new()
        }
    };
    let mut outcome = ReplyOutcome {
        polled: true,
        fetched: replies.len(),
        ..Default::default()
    };
    if replies.is_empty() {
        info!("no new replies");
        return Ok(outcome);
    }

    let mut processed = ctx.store.load_processed().await?;
    let mut dirty = false;

    for reply in &replies {
        if processed.contains(&reply.message_id) {
            debug!(message_id = %reply.message_id, "already processed");
            outcome.already_processed += 1;
            continue;
        }
        info!(from = %reply.from, subject = %reply.subject, "handling reply");

        match respond(&pending, reply, mailer, renderer).await {
            Ok(Handled::Details) => outcome.details_sent += 1,
            Ok(Handled::Help) => outcome.help_sent += 1,
            Ok(Handled::Ignored) => outcome.ignored += 1,
            Err(e) => {
                if dirty {
                    ctx.store.save_processed(&processed).await?;
                }
                return Err(e.into());
            }
        }
        processed.mark(reply.message_id.clone());
        dirty = true;
    }

    if dirty {
        ctx.store.save_processed(&processed).await?;
    }
    info!(
        details = outcome.details_sent,
        help = outcome.help_sent,
        skipped = outcome.already_processed,
        "reply check complete"
    );
    Ok(outcome)
}
