//! Connection settings for the email transports.
//!
//! Both are derived from [`Config`]; passwords stay wrapped in
//! [`SecretString`] so the settings can be logged with `{:?}`.

use ideapost_types::config::Config;
use ideapost_types::secret::SecretString;

/// Outbound SMTP settings.
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    /// `From` address.
    pub from: String,
    /// Every message goes to this single recipient.
    pub to: String,
}

impl SmtpSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            host: config.smtp_server.clone(),
            port: config.smtp_port,
            username: config.sender_email.clone(),
            password: config.sender_password.clone(),
            from: config.sender_email.clone(),
            to: config.recipient_email.clone(),
        }
    }
}

/// Inbound IMAP settings.
#[derive(Debug, Clone)]
pub struct ImapSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: SecretString,
    pub mailbox: String,
    /// Addresses replies may come from, searched in order.
    pub reply_from: Vec<String>,
    /// Subject fragment for the catch-all search.
    pub subject_marker: String,
}

impl ImapSettings {
    pub fn from_config(config: &Config) -> Self {
        let mut reply_from = vec![config.sender_email.clone()];
        if !config.recipient_email.is_empty() && config.recipient_email != config.sender_email {
            reply_from.push(config.recipient_email.clone());
        }
        Self {
            host: config.imap_server.clone(),
            port: config.imap_port,
            username: config.sender_email.clone(),
            password: config.sender_password.clone(),
            mailbox: "INBOX".into(),
            reply_from,
            subject_marker: config.reply_subject_marker.clone(),
        }
    }
}
