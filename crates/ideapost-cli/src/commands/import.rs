//! `ideapost import` -- merge freshly researched ideas into the catalog.
//!
//! New records are flagged `priority` so the next briefings draw them first.
//! Records whose id already exists are skipped.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Args;
use tracing::info;

use ideapost_core::StateStore;
use ideapost_core::catalog::merge_fresh;
use ideapost_platform::{NativePlatform, Platform};
use ideapost_types::Idea;

use super::load_config;

/// Arguments for the `ideapost import` subcommand.
#[derive(Args)]
pub struct ImportArgs {
    /// JSON array of idea records to merge.
    pub file: PathBuf,
}

pub async fn run(config_path: Option<&Path>, args: ImportArgs) -> anyhow::Result<()> {
    let platform = NativePlatform::new();
    let loaded = load_config(&platform, config_path).await?;

    if !platform.fs().exists(&args.file).await {
        anyhow::bail!("fresh ideas file not found: {}", args.file.display());
    }
    let raw = platform
        .fs()
        .read_to_string(&args.file)
        .await
        .with_context(|| format!("failed to read {}", args.file.display()))?;
    let fresh: Vec<Idea> = serde_json::from_str(raw.trim_start_matches('\u{feff}'))
        .with_context(|| format!("failed to parse {}", args.file.display()))?;

    let store = StateStore::new(platform.fs(), loaded.data_paths());
    let mut catalog = store.load_catalog().await?;
    let before = catalog.len();
    let report = merge_fresh(&mut catalog, fresh);

    for name in &report.added {
        info!(name = %name, "added");
    }
    for name in &report.skipped {
        info!(name = %name, "skipped, id already in catalog");
    }
    if !report.added.is_empty() {
        store.save_catalog(&catalog).await?;
    }

    println!(
        "Imported {} new ideas ({} skipped). Catalog: {} -> {}",
        report.added.len(),
        report.skipped.len(),
        before,
        catalog.len(),
    );
    Ok(())
}
