//! Configuration management for the manga release tracker.
//!
//! This module handles loading and parsing configuration from TOML files,
//! with sensible defaults for all settings. Secrets can be supplied via
//! environment variables on top of the file.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fallback detection period when the configured interval is invalid.
const DEFAULT_CHECK_INTERVAL_SECS: u64 = 3600;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory settings
    pub data: DataConfig,

    /// Database settings
    pub database: DatabaseConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// Books search API settings
    pub rakuten: RakutenConfig,

    /// Announcement settings
    #[serde(default)]
    pub notify: NotifyConfig,

    /// Bot settings
    pub bot: BotConfig,
}

/// Data directory configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Root data directory path
    pub root_dir: String,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database file path (relative to data directory or absolute)
    pub path: String,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log directory path (relative to data directory or absolute)
    pub log_dir: String,

    /// Default log level (trace, debug, info, warn, error)
    pub default_level: String,

    /// Enable console output
    pub console: bool,

    /// Enable file output
    pub file: bool,

    /// Enable JSON formatting for file logs
    pub json_format: bool,
}

/// Rakuten Books API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RakutenConfig {
    /// Search endpoint base URL
    pub base_url: String,

    /// Application ID (or set RAKUTEN_APP_ID env var)
    pub application_id: String,

    /// Maximum requests per second against the search endpoint
    pub requests_per_second: f64,

    /// Result page size for title searches
    pub max_results: u32,
}

/// Announcement configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotifyConfig {
    /// Webhook endpoints announcements are posted to
    #[serde(default)]
    pub endpoints: Vec<String>,
}

/// Bot configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BotConfig {
    /// Seconds between detection passes (0 falls back to the default)
    pub check_interval_seconds: u64,

    /// Announce discovered releases to the webhook endpoints
    pub announce_new_releases: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig {
                root_dir: "data".to_string(),
            },
            database: DatabaseConfig {
                path: "catalog.db".to_string(),
            },
            logging: LoggingConfig {
                log_dir: "logs".to_string(),
                default_level: "info".to_string(),
                console: true,
                file: true,
                json_format: false,
            },
            rakuten: RakutenConfig {
                base_url: "https://app.rakuten.co.jp/services/api/BooksBook/Search/20170404"
                    .to_string(),
                application_id: String::new(),
                requests_per_second: 1.0,
                max_results: 30,
            },
            notify: NotifyConfig::default(),
            bot: BotConfig {
                check_interval_seconds: DEFAULT_CHECK_INTERVAL_SECS,
                announce_new_releases: true,
            },
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// If the file doesn't exist, returns the default configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!(
                path = %path.display(),
                "Config file not found, using defaults"
            );
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Apply environment variable overrides
    ///
    /// These take precedence over values from the config file.
    pub fn apply_env(&mut self) {
        if let Ok(app_id) = std::env::var("RAKUTEN_APP_ID") {
            if !app_id.is_empty() {
                self.rakuten.application_id = app_id;
            }
        }
        if let Ok(url) = std::env::var("WEBHOOK_URL") {
            if !url.is_empty() && !self.notify.endpoints.contains(&url) {
                self.notify.endpoints.push(url);
            }
        }
    }

    /// Get the absolute path for the data directory
    pub fn data_dir(&self) -> PathBuf {
        PathBuf::from(&self.data.root_dir)
    }

    /// Get the absolute path for the database file
    pub fn database_path(&self) -> PathBuf {
        let db_path = Path::new(&self.database.path);
        if db_path.is_absolute() {
            db_path.to_path_buf()
        } else {
            self.data_dir().join(db_path)
        }
    }

    /// Get the absolute path for the log directory
    pub fn log_dir(&self) -> PathBuf {
        let log_path = Path::new(&self.logging.log_dir);
        if log_path.is_absolute() {
            log_path.to_path_buf()
        } else {
            self.data_dir().join(log_path)
        }
    }

    /// Detection period. A zero interval is invalid and falls back to
    /// the one-hour default.
    pub fn check_interval(&self) -> Duration {
        if self.bot.check_interval_seconds == 0 {
            tracing::warn!(
                fallback_secs = DEFAULT_CHECK_INTERVAL_SECS,
                "Invalid check interval, using default"
            );
            return Duration::from_secs(DEFAULT_CHECK_INTERVAL_SECS);
        }
        Duration::from_secs(self.bot.check_interval_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.data.root_dir, "data");
        assert_eq!(config.database.path, "catalog.db");
        assert_eq!(config.rakuten.requests_per_second, 1.0);
        assert_eq!(config.rakuten.max_results, 30);
        assert!(config.notify.endpoints.is_empty());
        assert!(config.bot.announce_new_releases);
    }

    #[test]
    fn test_save_and_load_config() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let config_path = temp_dir.path().join("config.toml");

        let original_config = Config::default();
        original_config.save(&config_path)?;

        assert!(config_path.exists());

        let loaded_config = Config::from_file(&config_path)?;
        assert_eq!(loaded_config.data.root_dir, original_config.data.root_dir);
        assert_eq!(
            loaded_config.rakuten.base_url,
            original_config.rakuten.base_url
        );

        Ok(())
    }

    #[test]
    fn test_load_nonexistent_config() {
        let config = Config::from_file("nonexistent.toml").unwrap();
        // Should return default config without error
        assert_eq!(config.data.root_dir, "data");
    }

    #[test]
    fn test_path_resolution() {
        let config = Config::default();

        let db_path = config.database_path();
        assert!(db_path.ends_with("data/catalog.db"));

        let log_dir = config.log_dir();
        assert!(log_dir.ends_with("data/logs"));
    }

    #[test]
    fn test_check_interval_fallback() {
        let mut config = Config::default();
        config.bot.check_interval_seconds = 0;
        assert_eq!(config.check_interval(), Duration::from_secs(3600));

        config.bot.check_interval_seconds = 900;
        assert_eq!(config.check_interval(), Duration::from_secs(900));
    }
}
