//! `ideapost status` -- show configuration and state file status.
//!
//! Reads everything, writes nothing, never touches the network. State files
//! that fail to load are reported in the table instead of aborting.
//!
//! # Example
//!
//! ```text
//! ideapost status
//! ideapost status -c /srv/ideapost/config.json
//! ```

use std::path::Path;

use comfy_table::{Table, presets::UTF8_FULL};

use ideapost_core::StateStore;
use ideapost_platform::{NativePlatform, Platform};
use ideapost_types::Idea;

use super::load_config;

fn or_unset(value: &str) -> &str {
    if value.is_empty() { "(not set)" } else { value }
}

pub async fn run(config_path: Option<&Path>) -> anyhow::Result<()> {
    let platform = NativePlatform::new();
    let loaded = load_config(&platform, config_path).await?;
    let config = &loaded.config;
    let paths = loaded.data_paths();
    let store = StateStore::new(platform.fs(), paths.clone());

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(["SETTING", "VALUE"]);

    let password = if config.sender_password.is_empty() { "(not set)" } else { "(set)" };
    let mode = if config.bonus_preview_count > 0 { "tiered" } else { "priority" };
    table.add_row(["Config", &loaded.path.display().to_string()]);
    table.add_row(["Sender", or_unset(&config.sender_email)]);
    table.add_row(["Password", password]);
    table.add_row(["Recipient", or_unset(&config.recipient_email)]);
    table.add_row(["SMTP", &format!("{}:{}", config.smtp_server, config.smtp_port)]);
    table.add_row(["IMAP", &format!("{}:{}", config.imap_server, config.imap_port)]);
    table.add_row(["Selection", mode]);
    table.add_row(["Ideas per day", &config.ideas_per_day.to_string()]);
    table.add_row(["Bonus previews", &config.bonus_preview_count.to_string()]);
    let reports = if config.save_reports {
        paths.reports.display().to_string()
    } else {
        "off".to_owned()
    };
    table.add_row(["Reports", &reports]);

    let catalog = store.load_catalog().await;
    let history = store.load_history().await;

    match &catalog {
        Ok(ideas) => {
            let high_risk = ideas.iter().filter(|i| i.is_high_risk).count();
            let priority = ideas.iter().filter(|i| i.is_priority()).count();
            table.add_row([
                "Catalog",
                &format!(
                    "{} ideas ({high_risk} high-risk, {priority} priority)",
                    ideas.len()
                ),
            ]);
        }
        Err(e) => {
            table.add_row(["Catalog", &format!("unavailable: {e}")]);
        }
    }

    match &history {
        Ok(h) => {
            let unsent = catalog
                .as_ref()
                .map(|ideas| ideas.iter().filter(|i: &&Idea| !h.was_sent(&i.id)).count())
                .map(|n| n.to_string())
                .unwrap_or_else(|_| "?".into());
            table.add_row(["Sent this cycle", &h.sent_ids.len().to_string()]);
            table.add_row(["Unsent", &unsent]);
            table.add_row(["Cycles completed", &h.cycle_count.unwrap_or(0).to_string()]);
            let last = h.log.last().map(|e| e.date.as_str()).unwrap_or("never");
            table.add_row(["Last briefing", last]);
        }
        Err(e) => {
            table.add_row(["History", &format!("unavailable: {e}")]);
        }
    }

    match store.load_pending().await {
        Ok(Some(pending)) => {
            table.add_row([
                "Pending previews",
                &format!("{} from {}", pending.ideas.len(), pending.date),
            ]);
        }
        Ok(None) => {
            table.add_row(["Pending previews", "none"]);
        }
        Err(e) => {
            table.add_row(["Pending previews", &format!("unavailable: {e}")]);
        }
    }

    if let Ok(processed) = store.load_processed().await {
        table.add_row(["Replies handled", &processed.processed_ids.len().to_string()]);
    }

    println!("{table}");
    Ok(())
}
