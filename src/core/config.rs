//! Configuration management with layered hierarchy

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::cache::{CacheConfig, DEFAULT_TTL};

/// Local config file looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "dyschema.yaml";

/// Default database location when nothing else is configured
const DEFAULT_DATABASE: &str = "dyschema.db";

/// Longest TTL accepted from configuration (one year)
const MAX_TTL_SECS: u64 = 365 * 24 * 60 * 60;

/// dyschema configuration with layered hierarchy
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Template database path
    pub database: Option<PathBuf>,

    /// Seconds an active template is served before reloading
    pub ttl_secs: Option<u64>,

    /// Milliseconds to wait on another caller's load before giving up
    pub wait_timeout_ms: Option<u64>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (already in Default impl)

        // 2. Global user config (~/.config/dyschema/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Local config (./dyschema.yaml)
        if let Some(local) = Self::read_file(Path::new(LOCAL_CONFIG_FILE)) {
            config.merge(local);
        }

        // 4. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        config
    }

    /// Read one config file; missing or unparsable files are skipped
    pub fn read_file(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable config file");
                None
            }
        }
    }

    fn from_env(var: impl Fn(&str) -> Option<String>) -> Config {
        Config {
            database: var("DYSCHEMA_DB").map(PathBuf::from),
            ttl_secs: var("DYSCHEMA_TTL_SECS").and_then(|v| v.trim().parse().ok()),
            wait_timeout_ms: var("DYSCHEMA_WAIT_TIMEOUT_MS").and_then(|v| v.trim().parse().ok()),
        }
    }

    /// Get the path to the global config file
    fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "dyschema")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.database.is_some() {
            self.database = other.database;
        }
        if other.ttl_secs.is_some() {
            self.ttl_secs = other.ttl_secs;
        }
        if other.wait_timeout_ms.is_some() {
            self.wait_timeout_ms = other.wait_timeout_ms;
        }
    }

    /// Database path, falling back to `dyschema.db` in the working directory
    pub fn database(&self) -> PathBuf {
        self.database
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATABASE))
    }

    /// Cache settings derived from this config
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            ttl: self
                .ttl_secs
                .map(|secs| Duration::from_secs(secs.min(MAX_TTL_SECS)))
                .unwrap_or(DEFAULT_TTL),
            wait_timeout: self.wait_timeout_ms.map(Duration::from_millis),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.database(), PathBuf::from("dyschema.db"));
        assert_eq!(config.cache_config(), CacheConfig::default());
        assert_eq!(config.cache_config().ttl, Duration::from_secs(300));
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut config = Config {
            database: Some(PathBuf::from("a.db")),
            ttl_secs: Some(10),
            wait_timeout_ms: None,
        };
        config.merge(Config {
            database: None,
            ttl_secs: Some(20),
            wait_timeout_ms: Some(500),
        });

        assert_eq!(config.database(), PathBuf::from("a.db"));
        let cache = config.cache_config();
        assert_eq!(cache.ttl, Duration::from_secs(20));
        assert_eq!(cache.wait_timeout, Some(Duration::from_millis(500)));
    }

    #[test]
    fn test_from_env() {
        let vars: HashMap<&str, &str> = [
            ("DYSCHEMA_DB", "/tmp/t.db"),
            ("DYSCHEMA_TTL_SECS", " 60 "),
            ("DYSCHEMA_WAIT_TIMEOUT_MS", "not a number"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_env(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.database, Some(PathBuf::from("/tmp/t.db")));
        assert_eq!(config.ttl_secs, Some(60));
        assert_eq!(config.wait_timeout_ms, None);
    }

    #[test]
    fn test_ttl_is_clamped() {
        let config = Config {
            ttl_secs: Some(u64::MAX),
            ..Default::default()
        };
        assert_eq!(config.cache_config().ttl, Duration::from_secs(MAX_TTL_SECS));
    }

    #[test]
    fn test_read_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "database: /srv/tpl.db\nttl_secs: 30\n").unwrap();

        let config = Config::read_file(&path).unwrap();
        assert_eq!(config.database, Some(PathBuf::from("/srv/tpl.db")));
        assert_eq!(config.ttl_secs, Some(30));
        assert!(config.wait_timeout_ms.is_none());

        std::fs::write(&path, "ttl_secs: [oops").unwrap();
        assert!(Config::read_file(&path).is_none());
        assert!(Config::read_file(&dir.path().join("missing.yaml")).is_none());
    }
}
