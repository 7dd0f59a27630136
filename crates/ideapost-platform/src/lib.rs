//! Platform abstraction layer for ideapost.
//!
//! Traits for the platform-dependent operations the core needs (filesystem,
//! environment) plus config discovery. The core only ever sees
//! `&dyn FileSystem`, so tests swap in [`fs::MemoryFileSystem`].

pub mod config_loader;
pub mod env;
pub mod fs;

/// Bundle of platform capabilities.
pub trait Platform: Send + Sync {
    fn fs(&self) -> &dyn fs::FileSystem;

    fn env(&self) -> &dyn env::Environment;
}

/// Native platform using [`tokio::fs`] and [`std::env`].
pub struct NativePlatform {
    fs: fs::NativeFileSystem,
    env: env::NativeEnvironment,
}

impl NativePlatform {
    pub fn new() -> Self {
        Self {
            fs: fs::NativeFileSystem,
            env: env::NativeEnvironment,
        }
    }
}

impl Default for NativePlatform {
    fn default() -> Self {
        Self::new()
    }
}

impl Platform for NativePlatform {
    fn fs(&self) -> &dyn fs::FileSystem {
        &self.fs
    }

    fn env(&self) -> &dyn env::Environment {
        &self.env
    }
}
