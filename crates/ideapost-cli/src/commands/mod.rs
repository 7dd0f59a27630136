//! CLI command implementations for `ideapost`.
//!
//! Each subcommand is implemented in its own module:
//!
//! - [`send`] -- Daily briefing.
//! - [`replies`] -- Reply check.
//! - [`import`] -- Catalog merge.
//! - [`status`] -- Configuration and state diagnostics.

pub mod import;
pub mod replies;
pub mod send;
pub mod status;

use std::path::Path;

use anyhow::Context;
use tracing::debug;

use ideapost_platform::Platform;
use ideapost_platform::config_loader::{self, LoadedConfig};

/// Load configuration from the override path or via discovery
/// (`IDEAPOST_CONFIG`, then `./config.json`). A missing file is an error.
pub async fn load_config<P: Platform>(
    platform: &P,
    config_override: Option<&Path>,
) -> anyhow::Result<LoadedConfig> {
    let loaded = config_loader::load_config(platform.fs(), platform.env(), config_override)
        .await
        .context("cannot start without a configuration")?;
    debug!(path = %loaded.path.display(), "configuration loaded");
    Ok(loaded)
}
