//! Configuration schema for `config.json`.
//!
//! Keys are snake_case after `ideapost_platform::config_loader` normalizes
//! them, so camelCase files load too. Every optional field has a serde default.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{IdeapostError, Result};
use crate::secret::SecretString;

/// Resolved application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// SMTP/IMAP login and `From` address.
    #[serde(default)]
    pub sender_email: String,

    /// SMTP/IMAP password (app password for Gmail).
    #[serde(default)]
    pub sender_password: SecretString,

    /// Address the briefing and follow-ups are delivered to.
    #[serde(default)]
    pub recipient_email: String,

    #[serde(default = "default_smtp_server")]
    pub smtp_server: String,

    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    #[serde(default = "default_imap_server")]
    pub imap_server: String,

    #[serde(default = "default_imap_port")]
    pub imap_port: u16,

    /// Subject fragment used by the broadest reply search.
    #[serde(default = "default_reply_subject_marker")]
    pub reply_subject_marker: String,

    /// Main ideas per daily briefing.
    #[serde(default = "default_ideas_per_day")]
    pub ideas_per_day: usize,

    /// Preview ideas offered for follow-up. Zero disables the tiered layout.
    #[serde(default = "default_bonus_preview_count")]
    pub bonus_preview_count: usize,

    /// Write a markdown copy of each briefing.
    #[serde(default = "default_true")]
    pub save_reports: bool,

    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,

    /// Directory holding the JSON state files. Defaults to the directory
    /// containing `config.json`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

fn default_smtp_server() -> String {
    "smtp.gmail.com".into()
}
fn default_smtp_port() -> u16 {
    587
}
fn default_imap_server() -> String {
    "imap.gmail.com".into()
}
fn default_imap_port() -> u16 {
    993
}
fn default_reply_subject_marker() -> String {
    "Briefing".into()
}
fn default_ideas_per_day() -> usize {
    5
}
fn default_bonus_preview_count() -> usize {
    3
}
fn default_true() -> bool {
    true
}
fn default_reports_dir() -> PathBuf {
    PathBuf::from("reports")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sender_email: String::new(),
            sender_password: SecretString::default(),
            recipient_email: String::new(),
            smtp_server: default_smtp_server(),
            smtp_port: default_smtp_port(),
            imap_server: default_imap_server(),
            imap_port: default_imap_port(),
            reply_subject_marker: default_reply_subject_marker(),
            ideas_per_day: default_ideas_per_day(),
            bonus_preview_count: default_bonus_preview_count(),
            save_reports: true,
            reports_dir: default_reports_dir(),
            data_dir: None,
        }
    }
}

impl Config {
    /// Check the fields every mail-sending command needs.
    pub fn validate_mail(&self) -> Result<()> {
        let required = [
            ("sender_email", self.sender_email.is_empty()),
            ("sender_password", self.sender_password.is_empty()),
            ("recipient_email", self.recipient_email.is_empty()),
            ("smtp_server", self.smtp_server.is_empty()),
        ];
        if let Some((field, _)) = required.iter().find(|(_, missing)| *missing) {
            return Err(IdeapostError::ConfigInvalid {
                reason: format!("{field} is required"),
            });
        }
        if self.ideas_per_day == 0 {
            return Err(IdeapostError::ConfigInvalid {
                reason: "ideas_per_day must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Resolve all state file locations. `config_dir` is the directory the
    /// config was loaded from.
    pub fn data_paths(&self, config_dir: &Path) -> DataPaths {
        let root = match &self.data_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => config_dir.join(dir),
            None => config_dir.to_path_buf(),
        };
        let reports = if self.reports_dir.is_absolute() {
            self.reports_dir.clone()
        } else {
            root.join(&self.reports_dir)
        };
        DataPaths {
            catalog: root.join(CATALOG_FILE),
            history: root.join(HISTORY_FILE),
            pending: root.join(PENDING_FILE),
            processed: root.join(PROCESSED_FILE),
            reports,
        }
    }
}

pub const CATALOG_FILE: &str = "ideas_database.json";
pub const HISTORY_FILE: &str = "sent_history.json";
pub const PENDING_FILE: &str = "pending_details.json";
pub const PROCESSED_FILE: &str = "processed_replies.json";

/// Absolute locations of every state file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataPaths {
    pub catalog: PathBuf,
    pub history: PathBuf,
    pub pending: PathBuf,
    pub processed: PathBuf,
    pub reports: PathBuf,
}

impl DataPaths {
    /// All files under one directory, reports in `<root>/reports`.
    pub fn under(root: &Path) -> Self {
        Config::default().data_paths(root)
    }
}
