use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::database::schema;

/// Application configuration module
/// This module handles the store configuration including loading,
/// validating and saving configuration settings.
/// Represents the store configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Database settings
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Locale used when an operation names none (`Translations::from_config`)
    #[serde(default = "default_locale")]
    pub default_locale: String,

    /// Reject locales whose language is not an ISO 639 code
    #[serde(default)]
    pub strict_locales: bool,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Database configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct DatabaseConfig {
    // @field: Database file, ":memory:" for in-memory, None for the user data directory
    #[serde(default)]
    pub path: Option<PathBuf>,

    // @field: Translations table name
    #[serde(default = "default_table_name")]
    pub table_name: String,

    // @field: Milliseconds a writer waits on a locked database
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
}

impl DatabaseConfig {
    /// Busy timeout as a duration
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            table_name: default_table_name(),
            busy_timeout_ms: default_busy_timeout_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_locale() -> String {
    "en".to_string()
}

fn default_table_name() -> String {
    schema::DEFAULT_TABLE_NAME.to_string()
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

impl Config {
    /// Load a configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        let config: Config = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {:?}", path))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        schema::validate_table_name(&self.database.table_name)?;

        if self.default_locale.trim().is_empty() {
            return Err(anyhow!("Default locale must not be empty"));
        }

        if self.strict_locales {
            crate::locale::validate_locale(&self.default_locale)?;
        }

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            database: DatabaseConfig::default(),
            default_locale: default_locale(),
            strict_locales: false,
            log_level: LogLevel::default(),
        }
    }
}
