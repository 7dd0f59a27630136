//! Configuration file discovery and loading.
//!
//! The discovery order is:
//! 1. An explicit path (`--config`).
//! 2. `IDEAPOST_CONFIG` environment variable.
//! 3. `config.json` in the working directory.
//!
//! Unlike state files, a missing or unparseable config is fatal: nothing can
//! be sent without credentials. Top-level camelCase keys are normalized to
//! snake_case before deserializing, and `IDEAPOST_SENDER_PASSWORD` fills an
//! empty `sender_password`.

use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

use ideapost_types::IdeapostError;
use ideapost_types::config::{Config, DataPaths};
use ideapost_types::secret::SecretString;

use crate::env::Environment;
use crate::fs::FileSystem;

/// Env var naming the config file.
pub const CONFIG_ENV_VAR: &str = "IDEAPOST_CONFIG";

/// Env var supplying the mail password when the file leaves it blank.
pub const PASSWORD_ENV_VAR: &str = "IDEAPOST_SENDER_PASSWORD";

/// Default config filename, resolved against the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

/// A parsed config together with where it came from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    /// File the config was read from.
    pub path: PathBuf,
    /// Directory containing `path`; relative data paths resolve against it.
    pub base_dir: PathBuf,
}

impl LoadedConfig {
    pub fn data_paths(&self) -> DataPaths {
        self.config.data_paths(&self.base_dir)
    }
}

/// Pick the config path using the fallback chain.
pub fn discover_config_path(env: &dyn Environment, explicit: Option<&Path>) -> PathBuf {
    if let Some(path) = explicit {
        return path.to_path_buf();
    }
    if let Some(env_path) = env.get_var(CONFIG_ENV_VAR)
        && !env_path.is_empty()
    {
        return PathBuf::from(env_path);
    }
    PathBuf::from(DEFAULT_CONFIG_FILE)
}

/// Discover, read, normalize and deserialize the configuration.
pub async fn load_config(
    fs: &dyn FileSystem,
    env: &dyn Environment,
    explicit: Option<&Path>,
) -> Result<LoadedConfig, IdeapostError> {
    let path = discover_config_path(env, explicit);
    let unavailable = |reason: String| IdeapostError::StateUnavailable {
        what: "config",
        path: path.clone(),
        reason,
    };

    if !fs.exists(&path).await {
        return Err(unavailable("file not found".into()));
    }

    debug!(path = %path.display(), "loading config file");
    let contents = fs
        .read_to_string(&path)
        .await
        .map_err(|e| unavailable(e.to_string()))?;
    let value: Value = serde_json::from_str(contents.trim_start_matches('\u{feff}'))
        .map_err(|e| unavailable(e.to_string()))?;
    let mut config: Config =
        serde_json::from_value(normalize_keys(value)).map_err(|e| unavailable(e.to_string()))?;

    if config.sender_password.is_empty()
        && let Some(password) = env.get_var(PASSWORD_ENV_VAR)
    {
        debug!("using sender password from {PASSWORD_ENV_VAR}");
        config.sender_password = SecretString::new(password);
    }

    let base_dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };

    Ok(LoadedConfig {
        config,
        path,
        base_dir,
    })
}

/// Convert top-level camelCase keys to snake_case.
///
/// The config schema is flat, so nested values are left untouched.
pub fn normalize_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, val)| (camel_to_snake(&key), val))
                .collect(),
        ),
        other => other,
    }
}

/// Convert a single camelCase string to snake_case.
///
/// A run of uppercase letters stays together; an underscore goes before the
/// last one when it starts a new lowercase word (`SMTPServer` → `smtp_server`).
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut result = String::with_capacity(name.len() + 4);

    for (i, &ch) in chars.iter().enumerate() {
        if ch.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            if prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next.is_some_and(|c| c.is_lowercase()))
            {
                result.push('_');
            }
        }
        result.push(ch.to_ascii_lowercase());
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::MapEnvironment;
    use crate::fs::MemoryFileSystem;
    use serde_json::json;

    #[test]
    fn camel_to_snake_cases() {
        assert_eq!(camel_to_snake("senderEmail"), "sender_email");
        assert_eq!(camel_to_snake("SMTPServer"), "smtp_server");
        assert_eq!(camel_to_snake("bonusPreviewCount"), "bonus_preview_count");
        assert_eq!(camel_to_snake("already_snake"), "already_snake");
        assert_eq!(camel_to_snake(""), "");
    }

    #[test]
    fn normalize_only_top_level() {
        let input = json!({"smtpPort": 465, "extra": {"innerKey": 1}});
        let out = normalize_keys(input);
        assert_eq!(out, json!({"smtp_port": 465, "extra": {"innerKey": 1}}));
    }

    #[test]
    fn discovery_order() {
        let env = MapEnvironment::new().with(CONFIG_ENV_VAR, "/etc/ideapost/config.json");
        assert_eq!(
            discover_config_path(&env, Some(Path::new("/tmp/c.json"))),
            PathBuf::from("/tmp/c.json")
        );
        assert_eq!(
            discover_config_path(&env, None),
            PathBuf::from("/etc/ideapost/config.json")
        );
        assert_eq!(
            discover_config_path(&MapEnvironment::new(), None),
            PathBuf::from("config.json")
        );
    }

    #[tokio::test]
    async fn load_camel_case_config_with_bom() {
        let fs = MemoryFileSystem::new();
        fs.insert(
            "/srv/ideapost/config.json",
            "\u{feff}{\"senderEmail\": \"bot@example.com\", \"ideasPerDay\": 3}",
        );
        let loaded = load_config(
            &fs,
            &MapEnvironment::new(),
            Some(Path::new("/srv/ideapost/config.json")),
        )
        .await
        .unwrap();

        assert_eq!(loaded.config.sender_email, "bot@example.com");
        assert_eq!(loaded.config.ideas_per_day, 3);
        assert_eq!(loaded.config.bonus_preview_count, 3);
        assert_eq!(loaded.base_dir, PathBuf::from("/srv/ideapost"));
        assert_eq!(
            loaded.data_paths().catalog,
            PathBuf::from("/srv/ideapost/ideas_database.json")
        );
    }

    #[tokio::test]
    async fn password_env_fills_blank_password() {
        let fs = MemoryFileSystem::new();
        fs.insert("/c/config.json", r#"{"sender_password": ""}"#);
        let env = MapEnvironment::new().with(PASSWORD_ENV_VAR, "from-env");

        let loaded = load_config(&fs, &env, Some(Path::new("/c/config.json")))
            .await
            .unwrap();
        assert_eq!(loaded.config.sender_password.expose(), "from-env");
    }

    #[tokio::test]
    async fn file_password_wins_over_env() {
        let fs = MemoryFileSystem::new();
        fs.insert("/c/config.json", r#"{"sender_password": "from-file"}"#);
        let env = MapEnvironment::new().with(PASSWORD_ENV_VAR, "from-env");

        let loaded = load_config(&fs, &env, Some(Path::new("/c/config.json")))
            .await
            .unwrap();
        assert_eq!(loaded.config.sender_password.expose(), "from-file");
    }

    #[tokio::test]
    async fn missing_config_is_fatal() {
        let fs = MemoryFileSystem::new();
        let err = load_config(&fs, &MapEnvironment::new(), Some(Path::new("/nope.json")))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("config"));
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn malformed_config_is_fatal() {
        let fs = MemoryFileSystem::new();
        fs.insert("/c/config.json", "{ not json");
        let res = load_config(&fs, &MapEnvironment::new(), Some(Path::new("/c/config.json"))).await;
        assert!(matches!(res, Err(IdeapostError::StateUnavailable { what: "config", .. })));
    }
}
