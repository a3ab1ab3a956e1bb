use crate::log_debug;
use crate::modals::DEFAULT_MAX_EVENTS;

use anyhow::{Context, Result, anyhow};
use dirs::config_dir;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory under the platform config dir
pub const APP_DIR: &str = "grc-desk";

/// Configuration filename
pub const CONFIG_FILENAME: &str = "config.toml";

/// Configuration structure for GRC Desk
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Config {
    /// Submission lifecycle settings
    #[serde(default)]
    pub submit: SubmitConfig,
    /// Session history settings
    #[serde(default)]
    pub history: HistoryConfig,
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Submission settings
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct SubmitConfig {
    /// Fail submissions running longer than this many milliseconds.
    /// Unset means no bound.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
}

impl SubmitConfig {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.filter(|ms| *ms > 0).map(Duration::from_millis)
    }
}

/// History settings
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq, Eq)]
pub struct HistoryConfig {
    /// Entries kept per session
    #[serde(default = "default_max_events")]
    pub max_events: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_events: default_max_events(),
        }
    }
}

/// Logging settings
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Echo logs to stderr, including debug output from dependencies
    #[serde(default)]
    pub verbose: bool,
    /// Append logs to this file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file: Option<String>,
}

fn default_max_events() -> usize {
    DEFAULT_MAX_EVENTS
}

impl Config {
    /// Load the user configuration, falling back to defaults when no file exists
    pub fn load() -> Result<Self> {
        let config_path = Self::get_config_path()?;
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log_debug!("No configuration at {}, using defaults", config_path.display());
            Ok(Self::default())
        }
    }

    /// Load configuration from an explicit path
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;

        log_debug!("Configuration loaded: {:?}", config);
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn parse(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        log_debug!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Path of the user configuration file
    pub fn get_config_path() -> Result<PathBuf> {
        let mut path =
            config_dir().ok_or_else(|| anyhow!("Unable to determine config directory"))?;
        path.push(APP_DIR);
        path.push(CONFIG_FILENAME);
        Ok(path)
    }

    /// Apply CLI overrides on top of file settings
    pub fn apply_overrides(&mut self, timeout_ms: Option<u64>, log_file: Option<String>) {
        if let Some(timeout_ms) = timeout_ms {
            self.submit.timeout_ms = Some(timeout_ms);
        }
        if log_file.is_some() {
            self.logging.log_file = log_file;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.history.max_events == 0 {
            return Err(anyhow!("history.max_events must be at least 1"));
        }
        Ok(())
    }
}
