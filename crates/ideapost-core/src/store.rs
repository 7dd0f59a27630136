//! JSON-file persistence for the catalog and run state.
//!
//! Every record is one flat file, read whole and rewritten whole. Missing
//! optional files load as their empty value; the catalog is required.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use ideapost_platform::fs::FileSystem;
use ideapost_types::config::{Config, DataPaths};
use ideapost_types::state::{PendingDetails, ProcessedReplies, SentHistory};
use ideapost_types::{Idea, IdeapostError, Result};

const BOM: char = '\u{feff}';

/// Reads and writes the state files under resolved [`DataPaths`].
pub struct StateStore<'a> {
    fs: &'a dyn FileSystem,
    paths: DataPaths,
}

impl<'a> StateStore<'a> {
    pub fn new(fs: &'a dyn FileSystem, paths: DataPaths) -> Self {
        Self { fs, paths }
    }

    /// Read and parse a file; `Ok(None)` when it does not exist.
    async fn read_json<T: DeserializeOwned>(
        &self,
        what: &'static str,
        path: &Path,
    ) -> Result<Option<T>> {
        if !self.fs.exists(path).await {
            return Ok(None);
        }
        let unavailable = |reason: String| IdeapostError::StateUnavailable {
            what,
            path: path.to_path_buf(),
            reason,
        };
        let raw = self
            .fs
            .read_to_string(path)
            .await
            .map_err(|e| unavailable(e.to_string()))?;
        let value = serde_json::from_str(raw.trim_start_matches(BOM))
            .map_err(|e| unavailable(e.to_string()))?;
        debug!(what, path = %path.display(), "loaded state file");
        Ok(Some(value))
    }

    async fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<()> {
        let mut json = serde_json::to_string_pretty(value)?;
        json.push('\n');
        self.fs.write_string(path, &json).await?;
        debug!(path = %path.display(), "saved state file");
        Ok(())
    }

    /// Load the idea catalog. A missing or malformed catalog is fatal.
    pub async fn load_catalog(&self) -> Result<Vec<Idea>> {
        self.read_json("catalog", &self.paths.catalog)
            .await?
            .ok_or_else(|| IdeapostError::StateUnavailable {
                what: "catalog",
                path: self.paths.catalog.clone(),
                reason: "file not found".into(),
            })
    }

    pub async fn save_catalog(&self, ideas: &[Idea]) -> Result<()> {
        self.write_json(&self.paths.catalog, &ideas).await
    }

    pub async fn load_history(&self) -> Result<SentHistory> {
        Ok(self
            .read_json("history", &self.paths.history)
            .await?
            .unwrap_or_default())
    }

    pub async fn save_history(&self, history: &SentHistory) -> Result<()> {
        self.write_json(&self.paths.history, history).await
    }

    /// Previews from the last tiered run, if any were ever offered.
    pub async fn load_pending(&self) -> Result<Option<PendingDetails>> {
        self.read_json("pending details", &self.paths.pending).await
    }

    pub async fn save_pending(&self, pending: &PendingDetails) -> Result<()> {
        self.write_json(&self.paths.pending, pending).await
    }

    pub async fn load_processed(&self) -> Result<ProcessedReplies> {
        Ok(self
            .read_json("processed replies", &self.paths.processed)
            .await?
            .unwrap_or_default())
    }

    pub async fn save_processed(&self, processed: &ProcessedReplies) -> Result<()> {
        self.write_json(&self.paths.processed, processed).await
    }

    /// Write `<reports>/<date>.md` and return its path.
    pub async fn write_report(&self, date: &str, markdown: &str) -> Result<PathBuf> {
        let path = self.paths.reports.join(format!("{date}.md"));
        self.fs.write_string(&path, markdown).await?;
        Ok(path)
    }
}

/// Everything a run flow needs besides its transports.
pub struct RunContext<'a> {
    pub config: &'a Config,
    pub store: StateStore<'a>,
}

impl<'a> RunContext<'a> {
    pub fn new(config: &'a Config, fs: &'a dyn FileSystem, paths: DataPaths) -> Self {
        Self {
            config,
            store: StateStore::new(fs, paths),
        }
    }
}
