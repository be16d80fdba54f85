//! Configuration loading and management
//!
//! Configuration is loaded from `~/.config/convopulse/config.toml`
//!
//! This module follows the XDG Base Directory Specification:
//! - Config: `$XDG_CONFIG_HOME/convopulse/` (~/.config/convopulse/)
//! - State/Logs: `$XDG_STATE_HOME/convopulse/` (~/.local/state/convopulse/)

use crate::error::{Error, Result};
use crate::metrics::{FeatureRule, MetricsConfig};
use serde::Deserialize;
use std::path::PathBuf;

/// Returns a best-effort home directory path.
fn home_dir() -> PathBuf {
    std::env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Returns XDG_CONFIG_HOME or ~/.config
fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

/// Returns XDG_STATE_HOME or ~/.local/state
fn xdg_state_home() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local/state"))
}

/// Main configuration struct
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    /// Metrics configuration
    #[serde(default)]
    pub metrics: MetricsSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metrics configuration as written in the config file
///
/// Owns the defaults; the engine itself takes whatever it is given.
#[derive(Debug, Deserialize)]
pub struct MetricsSettings {
    /// Retention periods to compute, in days
    #[serde(default = "default_retention_periods")]
    pub retention_periods: Vec<u32>,

    /// Days of inactivity before a user counts as churned
    #[serde(default = "default_churn_threshold")]
    pub churn_threshold_days: u32,

    /// Ordered feature-classification rules; order decides attribution when a
    /// message matches several features
    #[serde(default = "default_features")]
    pub features: Vec<FeatureRule>,
}

impl Default for MetricsSettings {
    fn default() -> Self {
        Self {
            retention_periods: default_retention_periods(),
            churn_threshold_days: default_churn_threshold(),
            features: default_features(),
        }
    }
}

impl MetricsSettings {
    /// Build the engine configuration from these settings.
    pub fn to_engine_config(&self) -> MetricsConfig {
        MetricsConfig {
            features: self.features.clone(),
            retention_periods: self.retention_periods.clone(),
            churn_threshold_days: self.churn_threshold_days,
        }
    }

    /// Validate settings, returning an error message if invalid.
    pub fn validate(&self) -> Result<()> {
        if self.retention_periods.is_empty() {
            return Err(Error::Config(
                "metrics.retention_periods must name at least one period".to_string(),
            ));
        }
        for rule in &self.features {
            if rule.keywords.is_empty() {
                return Err(Error::Config(format!(
                    "metrics feature {:?} has no keywords",
                    rule.name
                )));
            }
        }
        Ok(())
    }
}

fn default_retention_periods() -> Vec<u32> {
    vec![1, 7, 30]
}

fn default_churn_threshold() -> u32 {
    30
}

fn default_features() -> Vec<FeatureRule> {
    fn rule(name: &str, keywords: &[&str]) -> FeatureRule {
        FeatureRule {
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    vec![
        rule("search", &["search", "find", "lookup"]),
        rule("analysis", &["analyze", "analysis", "report"]),
        rule("export", &["export", "download", "save"]),
        rule("chat", &["chat", "conversation", "talk"]),
        rule("help", &["help", "support", "assistance"]),
    ]
}

/// Logging configuration
#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from the default path
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            tracing::info!("No config file found at {:?}, using defaults", config_path);
            return Ok(Config::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read config file {:?}: {}", path, e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;

        config.metrics.validate()?;

        Ok(config)
    }

    /// Returns the default config file path
    ///
    /// `$XDG_CONFIG_HOME/convopulse/config.toml` (~/.config/convopulse/config.toml)
    pub fn config_path() -> PathBuf {
        xdg_config_home().join("convopulse").join("config.toml")
    }

    /// Returns the state directory path (for logs)
    ///
    /// `$XDG_STATE_HOME/convopulse/` (~/.local/state/convopulse/)
    pub fn state_dir() -> PathBuf {
        xdg_state_home().join("convopulse")
    }

    /// Returns the log file path
    ///
    /// `$XDG_STATE_HOME/convopulse/convopulse.log`
    pub fn log_path() -> PathBuf {
        Self::state_dir().join("convopulse.log")
    }

    /// Ensure XDG base directory environment variables are set.
    ///
    /// This is mainly for CLI binaries that want explicit, stable path behavior
    /// before invoking other components that read these env vars.
    pub fn ensure_xdg_env() {
        let home = home_dir();

        if std::env::var("XDG_STATE_HOME").is_err() {
            std::env::set_var("XDG_STATE_HOME", home.join(".local/state"));
        }

        if std::env::var("XDG_CONFIG_HOME").is_err() {
            std::env::set_var("XDG_CONFIG_HOME", home.join(".config"));
        }
    }
}
