//! # ideapost-core
//!
//! Core engine for ideapost.
//!
//! Holds the idea selection policy, reply matching, email rendering, the
//! JSON state store and the two run flows ([`briefing::run_daily`] and
//! [`replies::check_replies`]). Mail transport is reached only through the
//! [`traits::Mailer`] and [`traits::Inbox`] seams; the SMTP/IMAP
//! implementations live in `ideapost-channels`.

pub mod briefing;
pub mod catalog;
pub mod matcher;
pub mod render;
pub mod replies;
pub mod selector;
pub mod store;
pub mod traits;

#[cfg(test)]
mod testing;

pub use briefing::{RunOptions, RunSummary, run_daily};
pub use render::{HtmlRenderer, RenderedEmail, Renderer};
pub use replies::{ReplyOutcome, check_replies};
pub use store::{RunContext, StateStore};
pub use traits::{InboundReply, Inbox, Mailer};
