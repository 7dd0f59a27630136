//! # ideapost-types
//!
//! Core type definitions shared by every ideapost crate:
//!
//! - **[`idea`]** -- catalog records ([`Idea`], [`IdeaId`], [`StartupCost`])
//! - **[`state`]** -- sent history, pending previews, processed replies
//! - **[`config`]** -- `config.json` schema and state file locations
//! - **[`secret`]** -- redacting wrapper for the mail password
//! - **[`error`]** -- [`IdeapostError`] and [`ChannelError`]

pub mod config;
pub mod error;
pub mod idea;
pub mod secret;
pub mod state;

pub use error::{ChannelError, IdeapostError, Result};
pub use idea::{Idea, IdeaId, StartupCost};
