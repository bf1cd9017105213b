//! Application Configuration
//!
//! This module provides configuration management for the book log,
//! supporting a YAML configuration file with sensible defaults and
//! environment variable overrides.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::store::{mock_store::MockBookStore, sqlite_store::SQLiteBookStore, BookStorage, StorageError};

/// Default configuration file, relative to the working directory
pub const DEFAULT_CONFIG_FILE: &str = "config.yaml";

/// Overrides the configuration file location
pub const CONFIG_ENV: &str = "BOOK_LOG_CONFIG";

/// Overrides `database.path`
pub const DB_PATH_ENV: &str = "BOOK_LOG_DB";

/// Overrides `database.backend`
pub const BACKEND_ENV: &str = "BOOK_LOG_BACKEND";

/// Errors raised while loading the configuration file
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// Book store backend types
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub enum StoreBackend {
    #[default]
    SQLite,
    Mock,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "sqlite" => Ok(StoreBackend::SQLite),
            "mock" => Ok(StoreBackend::Mock),
            _ => Err(format!("Unknown store backend: {}", s)),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DatabaseConfig {
    /// Store backend type
    pub backend: StoreBackend,
    /// Database file path
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StoreBackend::SQLite,
            path: "book_log.db".to_string(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Path to the log4rs configuration file
    pub config_file: String,
    /// Where env_logger writes when the log4rs file is absent
    pub fallback_file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            config_file: "book_log_log.yaml".to_string(),
            fallback_file: "book_log.log".to_string(),
        }
    }
}

/// An environment variable that was applied on top of the file configuration
#[derive(Debug, Clone, PartialEq)]
pub enum EnvOverride {
    DbPath(String),
    Backend(StoreBackend),
    /// `BOOK_LOG_BACKEND` held an unknown value and was ignored
    InvalidBackend(String),
}

impl AppConfig {
    /// Configuration file location, `BOOK_LOG_CONFIG` or `config.yaml`
    pub fn config_path() -> PathBuf {
        env::var(CONFIG_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load configuration from a file, use defaults if not found.
    ///
    /// Nothing is logged here: this runs before the logger exists, since the
    /// logger is configured from the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Apply `BOOK_LOG_DB` and `BOOK_LOG_BACKEND` on top of the loaded values.
    /// Call once logging is up; every override is logged and returned.
    pub fn apply_env(&mut self) -> Vec<EnvOverride> {
        let mut applied = Vec::new();

        if let Ok(path) = env::var(DB_PATH_ENV) {
            info!("Using database path from environment: {}", path);
            self.database.path = path.clone();
            applied.push(EnvOverride::DbPath(path));
        }

        if let Ok(backend_str) = env::var(BACKEND_ENV) {
            match backend_str.parse::<StoreBackend>() {
                Ok(backend) => {
                    info!("Using store backend from environment: {:?}", backend);
                    self.database.backend = backend.clone();
                    applied.push(EnvOverride::Backend(backend));
                }
                Err(e) => {
                    warn!(
                        "Invalid store backend in environment: {}. Keeping {:?}.",
                        e, self.database.backend
                    );
                    applied.push(EnvOverride::InvalidBackend(backend_str));
                }
            }
        }

        applied
    }
}

impl DatabaseConfig {
    /// Create a book store based on the configuration
    pub fn create_store(&self) -> Result<Box<dyn BookStorage>, StorageError> {
        match self.backend {
            StoreBackend::SQLite => {
                info!("Creating SQLite book store at {}", self.path);
                Ok(Box::new(SQLiteBookStore::open(&self.path)?))
            }
            StoreBackend::Mock => {
                info!("Creating mock book store");
                Ok(Box::new(MockBookStore::new()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::tempdir;

    fn clear_env() {
        env::remove_var(CONFIG_ENV);
        env::remove_var(DB_PATH_ENV);
        env::remove_var(BACKEND_ENV);
    }

    #[test]
    fn test_store_backend_from_str() {
        assert_eq!("sqlite".parse::<StoreBackend>().unwrap(), StoreBackend::SQLite);
        assert_eq!("SQLite".parse::<StoreBackend>().unwrap(), StoreBackend::SQLite);
        assert_eq!("mock".parse::<StoreBackend>().unwrap(), StoreBackend::Mock);
        assert_eq!("MOCK".parse::<StoreBackend>().unwrap(), StoreBackend::Mock);

        assert!("postgres".parse::<StoreBackend>().is_err());
    }

    #[test]
    fn test_app_config_default() {
        let config = AppConfig::default();
        assert_eq!(config.database.backend, StoreBackend::SQLite);
        assert_eq!(config.database.path, "book_log.db");
        assert_eq!(config.logging.config_file, "book_log_log.yaml");
        assert_eq!(config.logging.fallback_file, "book_log.log");
    }

    #[test]
    fn test_from_file_missing_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::from_file(dir.path().join("absent.yaml")).unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_from_file_partial_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "database:\n  backend: Mock\n").unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        assert_eq!(config.database.backend, StoreBackend::Mock);
        assert_eq!(config.database.path, "book_log.db");
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_from_file_invalid_yaml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "database: [not, a, map").unwrap();

        let err = AppConfig::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    #[serial]
    fn test_config_path_from_env() {
        clear_env();
        assert_eq!(AppConfig::config_path(), PathBuf::from(DEFAULT_CONFIG_FILE));

        env::set_var(CONFIG_ENV, "/etc/book_log/config.yaml");
        assert_eq!(AppConfig::config_path(), PathBuf::from("/etc/book_log/config.yaml"));
        clear_env();
    }

    #[test]
    #[serial]
    fn test_apply_env_overrides() {
        clear_env();
        let dir = tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        fs::write(&path, "database:\n  path: from_file.db\nlogging:\n  config_file: log.yaml\n").unwrap();

        let mut config = AppConfig::from_file(&path).unwrap();
        assert!(config.apply_env().is_empty());
        assert_eq!(config.database.path, "from_file.db");
        assert_eq!(config.logging.config_file, "log.yaml");

        env::set_var(DB_PATH_ENV, "from_env.db");
        env::set_var(BACKEND_ENV, "mock");
        let applied = config.apply_env();
        assert_eq!(
            applied,
            vec![
                EnvOverride::DbPath("from_env.db".to_string()),
                EnvOverride::Backend(StoreBackend::Mock),
            ]
        );
        assert_eq!(config.database.path, "from_env.db");
        assert_eq!(config.database.backend, StoreBackend::Mock);

        clear_env();
    }

    #[test]
    #[serial]
    fn test_invalid_backend_is_reported_and_ignored() {
        clear_env();
        env::set_var(BACKEND_ENV, "bogus");

        let mut config = AppConfig::default();
        let applied = config.apply_env();
        assert_eq!(applied, vec![EnvOverride::InvalidBackend("bogus".to_string())]);
        assert_eq!(config.database.backend, StoreBackend::SQLite);

        clear_env();
    }

    #[test]
    fn test_create_store() {
        let dir = tempdir().unwrap();
        let config = DatabaseConfig {
            backend: StoreBackend::SQLite,
            path: dir.path().join("books.db").to_string_lossy().into_owned(),
        };
        let store = config.create_store().unwrap();
        assert_eq!(store.count().unwrap(), 0);

        let config = DatabaseConfig {
            backend: StoreBackend::Mock,
            path: String::new(),
        };
        let store = config.create_store().unwrap();
        assert!(store.list_all().unwrap().is_empty());
    }
}
