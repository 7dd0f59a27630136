//! Inbound reply polling over IMAP/TLS.
//!
//! The `imap` client is blocking, so each poll runs on the blocking pool.
//! A poll opens one session, runs the reply searches, fetches every hit,
//! marks it `\Seen` and logs out.

use std::collections::BTreeSet;
use std::io::{Read, Write};

use async_trait::async_trait;
use tracing::{debug, info, warn};

use ideapost_core::traits::{InboundReply, Inbox};
use ideapost_types::ChannelError;

use super::extract;
use super::types::ImapSettings;

/// The per-message half of a session, split out so the fetch loop can run
/// against a scripted mailbox.
trait MessageSource {
    /// Raw RFC 822 bodies for one sequence number.
    fn fetch_raw(&mut self, seq: u32) -> Result<Vec<Vec<u8>>, String>;

    fn mark_seen(&mut self, seq: u32) -> Result<(), String>;
}

impl<T: Read + Write> MessageSource for imap::Session<T> {
    fn fetch_raw(&mut self, seq: u32) -> Result<Vec<Vec<u8>>, String> {
        let fetched = self.fetch(seq.to_string(), "RFC822").map_err(|e| e.to_string())?;
        Ok(fetched
            .iter()
            .filter_map(|message| message.body().map(<[u8]>::to_vec))
            .collect())
    }

    fn mark_seen(&mut self, seq: u32) -> Result<(), String> {
        self.store(seq.to_string(), "+FLAGS (\\Seen)")
            .map(|_| ())
            .map_err(|e| e.to_string())
    }
}

/// Fetch, parse and mark each hit. A failed fetch ends the loop but keeps
/// what was already collected, since those messages are already read.
fn collect_replies(source: &mut dyn MessageSource, seqs: &BTreeSet<u32>) -> Vec<InboundReply> {
    let mut replies = Vec::with_capacity(seqs.len());
    for &seq in seqs {
        let bodies = match source.fetch_raw(seq) {
            Ok(bodies) => bodies,
            Err(e) => {
                warn!(seq, error = %e, kept = replies.len(), "imap fetch failed, stopping");
                break;
            }
        };
        for raw in &bodies {
            match extract::parse_reply(raw) {
                Ok(reply) => replies.push(reply),
                Err(e) => warn!(seq, error = %e, "skipping unparseable message"),
            }
        }
        if let Err(e) = source.mark_seen(seq) {
            warn!(seq, error = %e, "failed to mark message seen");
        }
    }
    replies
}

/// Polls a mailbox for unread replies to earlier briefings.
pub struct ImapInbox {
    settings: ImapSettings,
}

/// Quote a value for an IMAP search string.
fn quoted(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

impl ImapInbox {
    pub fn new(settings: ImapSettings) -> Self {
        Self { settings }
    }

    /// Searches in the order they run: one per reply address, then the
    /// subject-marker catch-all.
    pub fn search_queries(&self) -> Vec<String> {
        let mut queries: Vec<String> = self
            .settings
            .reply_from
            .iter()
            .filter(|addr| !addr.is_empty())
            .map(|addr| format!("UNSEEN SUBJECT \"Re: \" FROM {}", quoted(addr)))
            .collect();
        if !self.settings.subject_marker.is_empty() {
            queries.push(format!(
                "UNSEEN SUBJECT \"Re: \" SUBJECT {}",
                quoted(&self.settings.subject_marker)
            ));
        }
        queries
    }

    fn poll_blocking(
        settings: &ImapSettings,
        queries: &[String],
    ) -> Result<Vec<InboundReply>, ChannelError> {
        let tls = native_tls::TlsConnector::builder()
            .build()
            .map_err(|e| ChannelError::ConnectionFailed(format!("tls setup: {e}")))?;
        let client = imap::connect((settings.host.as_str(), settings.port), &settings.host, &tls)
            .map_err(|e| ChannelError::ConnectionFailed(format!("{}: {e}", settings.host)))?;
        let mut session = client
            .login(&settings.username, settings.password.expose())
            .map_err(|(e, _)| ChannelError::AuthFailed(e.to_string()))?;

        session
            .select(&settings.mailbox)
            .map_err(|e| ChannelError::ReceiveFailed(format!("select {}: {e}", settings.mailbox)))?;

        let mut seqs = BTreeSet::new();
        for query in queries {
            match session.search(query) {
                Ok(found) => {
                    debug!(query = %query, hits = found.len(), "imap search");
                    seqs.extend(found);
                }
                Err(e) => warn!(query = %query, error = %e, "imap search failed"),
            }
        }

        let replies = collect_replies(&mut session, &seqs);

        if let Err(e) = session.logout() {
            debug!(error = %e, "imap logout failed");
        }
        Ok(replies)
    }
}

#[async_trait]
impl Inbox for ImapInbox {
    async fn fetch_replies(&self) -> Result<Vec<InboundReply>, ChannelError> {
        let settings = self.settings.clone();
        let queries = self.search_queries();
        let replies = tokio::task::spawn_blocking(move || Self::poll_blocking(&settings, &queries))
            .await
            .map_err(|e| ChannelError::Other(format!("imap poll task failed: {e}")))??;
        info!(count = replies.len(), "fetched replies");
        Ok(replies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ideapost_types::secret::SecretString;

    fn inbox(reply_from: &[&str], marker: &str) -> ImapInbox {
        ImapInbox::new(ImapSettings {
            host: "imap.example.com".into(),
            port: 993,
            username: "bot@example.com".into(),
            password: SecretString::new("pw"),
            mailbox: "INBOX".into(),
            reply_from: reply_from.iter().map(|s| s.to_string()).collect(),
            subject_marker: marker.into(),
        })
    }

    #[test]
    fn queries_in_search_order() {
        let queries = inbox(&["bot@example.com", "ceo@example.com"], "Briefing").search_queries();
        assert_eq!(
            queries,
            [
                r#"UNSEEN SUBJECT "Re: " FROM "bot@example.com""#,
                r#"UNSEEN SUBJECT "Re: " FROM "ceo@example.com""#,
                r#"UNSEEN SUBJECT "Re: " SUBJECT "Briefing""#,
            ]
        );
    }

    #[test]
    fn empty_marker_skips_catch_all() {
        let queries = inbox(&["bot@example.com"], "").search_queries();
        assert_eq!(queries.len(), 1);
    }

    /// Serves canned messages; fetches of `fail_at` error.
    struct ScriptedMailbox {
        fail_at: Option<u32>,
        seen: Vec<u32>,
    }

    impl MessageSource for ScriptedMailbox {
        fn fetch_raw(&mut self, seq: u32) -> Result<Vec<Vec<u8>>, String> {
            if self.fail_at == Some(seq) {
                return Err("connection reset".into());
            }
            let raw = format!(
                "Message-ID: <m{seq}@example.com>\r\nFrom: ceo@example.com\r\n\
                 Subject: Re: Briefing\r\n\r\n{seq}\r\n"
            );
            Ok(vec![raw.into_bytes()])
        }

        fn mark_seen(&mut self, seq: u32) -> Result<(), String> {
            self.seen.push(seq);
            Ok(())
        }
    }

    #[test]
    fn fetch_error_keeps_earlier_replies() {
        let mut mailbox = ScriptedMailbox {
            fail_at: Some(7),
            seen: Vec::new(),
        };
        let seqs = BTreeSet::from([4, 7, 9]);
        let replies = collect_replies(&mut mailbox, &seqs);

        assert_eq!(replies.len(), 1);
        assert_eq!(replies[0].message_id, "<m4@example.com>");
        assert_eq!(replies[0].body, "4");
        assert_eq!(mailbox.seen, [4]);
    }

    #[test]
    fn every_hit_fetched_and_marked() {
        let mut mailbox = ScriptedMailbox {
            fail_at: None,
            seen: Vec::new(),
        };
        let replies = collect_replies(&mut mailbox, &BTreeSet::from([2, 5]));
        assert_eq!(replies.len(), 2);
        assert_eq!(mailbox.seen, [2, 5]);
    }

    #[test]
    fn search_values_are_escaped() {
        assert_eq!(quoted(r#"say "hi""#), r#""say \"hi\"""#);
        assert_eq!(quoted(r"a\b"), r#""a\\b""#);
    }
}
