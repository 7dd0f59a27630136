//! Filesystem abstraction for the JSON state files.
//!
//! [`FileSystem`] is the seam every state read/write goes through.
//! [`NativeFileSystem`] is backed by [`tokio::fs`]; [`MemoryFileSystem`]
//! (behind the `test-utils` feature) keeps files in a map so orchestration
//! tests run without touching disk.

use async_trait::async_trait;
use std::path::Path;

/// Whole-file operations used by the state store.
///
/// Writes replace the file and create missing parent directories.
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Read a file's entire contents as UTF-8.
    async fn read_to_string(&self, path: &Path) -> std::io::Result<String>;

    /// Write a string to a file, creating parent directories if needed.
    async fn write_string(&self, path: &Path, content: &str) -> std::io::Result<()>;

    /// Whether a file or directory exists at `path`.
    async fn exists(&self, path: &Path) -> bool;
}

/// Native filesystem implementation using [`tokio::fs`].
pub struct NativeFileSystem;

#[async_trait]
impl FileSystem for NativeFileSystem {
    async fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
        tokio::fs::read_to_string(path).await
    }

    async fn write_string(&self, path: &Path, content: &str) -> std::io::Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, content).await
    }

    async fn exists(&self, path: &Path) -> bool {
        tokio::fs::try_exists(path).await.unwrap_or(false)
    }
}

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryFileSystem;

#[cfg(any(test, feature = "test-utils"))]
mod memory {
    use std::collections::BTreeMap;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::FileSystem;

    /// In-memory filesystem for tests.
    ///
    /// Directories are implicit: a path "exists" as a directory when any
    /// stored file lives beneath it.
    #[derive(Default)]
    pub struct MemoryFileSystem {
        files: Mutex<BTreeMap<PathBuf, String>>,
    }

    impl MemoryFileSystem {
        pub fn new() -> Self {
            Self::default()
        }

        /// Seed a file.
        pub fn insert(&self, path: impl Into<PathBuf>, content: impl Into<String>) {
            self.lock().insert(path.into(), content.into());
        }

        /// Current contents of a file, if present.
        pub fn get(&self, path: &Path) -> Option<String> {
            self.lock().get(path).cloned()
        }

        /// All stored paths, sorted.
        pub fn paths(&self) -> Vec<PathBuf> {
            self.lock().keys().cloned().collect()
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<PathBuf, String>> {
            self.files.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
        }
    }

    #[async_trait]
    impl FileSystem for MemoryFileSystem {
        async fn read_to_string(&self, path: &Path) -> std::io::Result<String> {
            self.get(path).ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("{} not found", path.display()),
                )
            })
        }

        async fn write_string(&self, path: &Path, content: &str) -> std::io::Result<()> {
            self.insert(path, content);
            Ok(())
        }

        async fn exists(&self, path: &Path) -> bool {
            self.lock().keys().any(|p| p.starts_with(path))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn native_write_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports").join("2026-10-18.md");
        let fs = NativeFileSystem;

        fs.write_string(&path, "# Briefing").await.unwrap();
        assert!(fs.exists(&path).await);
        assert_eq!(fs.read_to_string(&path).await.unwrap(), "# Briefing");
    }

    #[tokio::test]
    async fn native_write_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sent_history.json");
        let fs = NativeFileSystem;

        fs.write_string(&path, "first").await.unwrap();
        fs.write_string(&path, "second").await.unwrap();
        assert_eq!(fs.read_to_string(&path).await.unwrap(), "second");
    }

    #[tokio::test]
    async fn native_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fs = NativeFileSystem;
        let err = fs
            .read_to_string(&dir.path().join("absent.json"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
        assert!(!fs.exists(&dir.path().join("absent.json")).await);
    }

    #[tokio::test]
    async fn memory_fs_round_trip() {
        let fs = MemoryFileSystem::new();
        let path = Path::new("/data/pending_details.json");
        assert!(!fs.exists(path).await);

        fs.write_string(path, "{}").await.unwrap();
        assert!(fs.exists(path).await);
        assert!(fs.exists(Path::new("/data")).await);
        assert_eq!(fs.read_to_string(path).await.unwrap(), "{}");
        assert!(fs.read_to_string(Path::new("/nope")).await.is_err());
    }
}
