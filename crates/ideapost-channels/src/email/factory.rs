//! Validated construction of the email transports from [`Config`].

use std::sync::Arc;

use ideapost_core::traits::{Inbox, Mailer};
use ideapost_types::config::Config;
use ideapost_types::{IdeapostError, Result};

use super::imap::ImapInbox;
use super::smtp::SmtpMailer;
use super::types::{ImapSettings, SmtpSettings};

/// Build the SMTP mailer. Fails on missing credentials or bad addresses.
pub fn build_mailer(config: &Config) -> Result<Arc<dyn Mailer>> {
    config.validate_mail()?;
    let mailer = SmtpMailer::new(SmtpSettings::from_config(config))?;
    Ok(Arc::new(mailer))
}

/// Build the IMAP inbox.
pub fn build_inbox(config: &Config) -> Result<Arc<dyn Inbox>> {
    config.validate_mail()?;
    if config.imap_server.is_empty() {
        return Err(IdeapostError::ConfigInvalid {
            reason: "imap_server is required".into(),
        });
    }
    Ok(Arc::new(ImapInbox::new(ImapSettings::from_config(config))))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            sender_email: "bot@example.com".into(),
            sender_password: "pw".into(),
            recipient_email: "ceo@example.com".into(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn build_mailer_success() {
        assert!(build_mailer(&config()).is_ok());
    }

    #[tokio::test]
    async fn build_mailer_missing_password_fails() {
        let mut cfg = config();
        cfg.sender_password = Default::default();
        match build_mailer(&cfg) {
            Err(e) => assert!(e.to_string().contains("sender_password")),
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn build_inbox_missing_imap_server_fails() {
        let mut cfg = config();
        cfg.imap_server.clear();
        match build_inbox(&cfg) {
            Err(e) => assert!(e.to_string().contains("imap_server")),
            Ok(_) => panic!("expected error"),
        }
    }

    #[test]
    fn build_inbox_success() {
        assert!(build_inbox(&config()).is_ok());
    }
}
