//! Fakes shared by the run-flow tests.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;

use ideapost_types::config::{Config, DataPaths};
use ideapost_types::{ChannelError, Idea};

use crate::render::RenderedEmail;
use crate::traits::{InboundReply, Inbox, Mailer};

pub(crate) fn data_paths() -> DataPaths {
    DataPaths::under(Path::new("/data"))
}

pub(crate) fn config() -> Config {
    Config {
        sender_email: "bot@example.com".into(),
        sender_password: "app-pass".into(),
        recipient_email: "ceo@example.com".into(),
        ideas_per_day: 2,
        bonus_preview_count: 2,
        ..Default::default()
    }
}

/// `n` regular ideas followed by `risky` high-risk ones, ids from 1.
pub(crate) fn catalog(n: i64, risky: i64) -> Vec<Idea> {
    (1..=n + risky)
        .map(|i| {
            let mut idea = Idea::new(i, format!("Venture {i}"));
            idea.what_it_does = format!("Venture {i} does things. Details follow.");
            idea.action_plan = vec![format!("Step one for {i}")];
            idea.is_high_risk = i > n;
            idea
        })
        .collect()
}

#[derive(Default)]
pub(crate) struct RecordingMailer {
    pub sent: Mutex<Vec<RenderedEmail>>,
    /// Fail every send after this many successes.
    pub fail_after: Option<usize>,
}

impl RecordingMailer {
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Default::default()
        }
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent
            .lock()
            .unwrap()
            .iter()
            .map(|e| e.subject.clone())
            .collect()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &RenderedEmail) -> Result<(), ChannelError> {
        let mut sent = self.sent.lock().unwrap();
        if self.fail_after.is_some_and(|n| sent.len() >= n) {
            return Err(ChannelError::SendFailed("smtp unavailable".into()));
        }
        sent.push(email.clone());
        Ok(())
    }
}

/// Inbox that hands out one queued batch per poll.
#[derive(Default)]
pub(crate) struct ScriptedInbox {
    batches: Mutex<VecDeque<Result<Vec<InboundReply>, ChannelError>>>,
    pub polls: Mutex<usize>,
}

impl ScriptedInbox {
    pub fn with_batch(self, replies: Vec<InboundReply>) -> Self {
        self.batches.lock().unwrap().push_back(Ok(replies));
        self
    }

    pub fn with_error(self, err: ChannelError) -> Self {
        self.batches.lock().unwrap().push_back(Err(err));
        self
    }

    pub fn poll_count(&self) -> usize {
        *self.polls.lock().unwrap()
    }
}

#[async_trait]
impl Inbox for ScriptedInbox {
    async fn fetch_replies(&self) -> Result<Vec<InboundReply>, ChannelError> {
        *self.polls.lock().unwrap() += 1;
        self.batches
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Vec::new()))
    }
}

pub(crate) fn reply(message_id: &str, body: &str) -> InboundReply {
    InboundReply {
        message_id: message_id.into(),
        subject: "Re: CEO Briefing".into(),
        from: "ceo@example.com".into(),
        body: body.into(),
    }
}
