//! Configuration management
//!
//! Configuration is read from `config.yml` and can be overridden with
//! `PRESSNOTE_*` environment variables. A missing or empty file yields the
//! defaults, so the binary runs with no setup at all.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration errors with enough context to fix the file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {message}")]
    Parse { path: String, message: String },
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Content configuration
    #[serde(default)]
    pub content: ContentConfig,
}

impl Config {
    /// Load configuration from a YAML file.
    ///
    /// A missing or empty file yields the default configuration; a file
    /// that exists but fails to parse is an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.display().to_string(),
            source: e,
        })?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        let config: Config = serde_yaml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from a file, then apply environment overrides.
    ///
    /// Recognized variables:
    /// - `PRESSNOTE_SERVER_HOST`
    /// - `PRESSNOTE_SERVER_PORT`
    /// - `PRESSNOTE_DATABASE_DRIVER`
    /// - `PRESSNOTE_DATABASE_URL`
    /// - `PRESSNOTE_NEWS_COUNT_ON_HOME_PAGE`
    pub fn load_with_env(path: &Path) -> anyhow::Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("PRESSNOTE_SERVER_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("PRESSNOTE_SERVER_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(driver) = std::env::var("PRESSNOTE_DATABASE_DRIVER") {
            match driver.to_lowercase().as_str() {
                "sqlite" => self.database.driver = DatabaseDriver::Sqlite,
                "mysql" => self.database.driver = DatabaseDriver::Mysql,
                other => tracing::warn!("Unknown database driver override: {}", other),
            }
        }
        if let Ok(url) = std::env::var("PRESSNOTE_DATABASE_URL") {
            self.database.url = url;
        }
        if let Ok(count) = std::env::var("PRESSNOTE_NEWS_COUNT_ON_HOME_PAGE") {
            if let Ok(count) = count.parse() {
                self.content.news_count_on_home_page = count;
            }
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database driver (sqlite or mysql)
    #[serde(default)]
    pub driver: DatabaseDriver,
    /// Database connection URL
    #[serde(default = "default_database_url")]
    pub url: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            driver: DatabaseDriver::default(),
            url: default_database_url(),
        }
    }
}

fn default_database_url() -> String {
    "data/pressnote.db".to_string()
}

/// Database driver type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDriver {
    /// SQLite (default)
    #[default]
    Sqlite,
    /// MySQL
    Mysql,
}

/// Content configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// Maximum number of news items shown on the home page
    #[serde(default = "default_news_count")]
    pub news_count_on_home_page: i64,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            news_count_on_home_page: default_news_count(),
        }
    }
}

fn default_news_count() -> i64 {
    10
}
