//! Transport seams between the run flows and the mail servers.

use async_trait::async_trait;

use ideapost_types::ChannelError;

use crate::render::RenderedEmail;

/// A reply pulled from the inbox, already reduced to the user's own words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundReply {
    /// `Message-ID` header, or a content digest when the header is missing.
    pub message_id: String,
    pub subject: String,
    pub from: String,
    /// Plain-text body with quoted history removed.
    pub body: String,
}

/// Delivers rendered messages to the configured recipient.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &RenderedEmail) -> Result<(), ChannelError>;
}

/// Source of unread replies to earlier briefings.
///
/// Implementations mark every message they return as read on the server.
#[async_trait]
pub trait Inbox: Send + Sync {
    async fn fetch_replies(&self) -> Result<Vec<InboundReply>, ChannelError>;
}
