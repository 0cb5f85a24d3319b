//! Engine configuration loaded from TOML.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// Shortest accepted poll interval.
pub const MIN_POLL_INTERVAL_MS: u64 = 50;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub watcher: WatcherConfig,
    #[serde(default)]
    pub selection: SelectionConfig,
}

impl Config {
    /// Reject settings the engine cannot run with.
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.history.capacity == 0 {
            return Err(EngineError::Config(
                "history.capacity must be at least 1".to_string(),
            ));
        }
        if self.watcher.poll_interval_ms < MIN_POLL_INTERVAL_MS {
            return Err(EngineError::Config(format!(
                "watcher.poll_interval_ms must be at least {MIN_POLL_INTERVAL_MS}, got {}",
                self.watcher.poll_interval_ms
            )));
        }
        Ok(())
    }

    /// The clipboard polling cadence.
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.watcher.poll_interval_ms)
    }
}

/// Process-wide settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// History store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    #[serde(default = "default_capacity")]
    pub capacity: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
        }
    }
}

/// Clipboard watcher settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatcherConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Record whatever is already on the clipboard when watching starts.
    #[serde(default)]
    pub record_existing: bool,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            record_existing: false,
        }
    }
}

/// Selection write-back settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Hide the history surface once a selection has been written back.
    #[serde(default = "default_true")]
    pub hide_on_commit: bool,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            hide_on_commit: true,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_capacity() -> usize {
    10
}

fn default_poll_interval_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_serializes() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("capacity = 10"));
        assert!(toml_str.contains("poll_interval_ms = 1000"));
    }

    #[test]
    fn parse_example_config() {
        let toml_str = r#"
[general]
log_level = "debug"

[history]
capacity = 25

[watcher]
poll_interval_ms = 500
record_existing = true

[selection]
hide_on_commit = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.general.log_level, "debug");
        assert_eq!(config.history.capacity, 25);
        assert_eq!(config.poll_interval(), Duration::from_millis(500));
        assert!(config.watcher.record_existing);
        assert!(!config.selection.hide_on_commit);
        config.validate().unwrap();
    }

    #[test]
    fn missing_sections_use_defaults() {
        let config: Config = toml::from_str("[history]\ncapacity = 3\n").unwrap();
        assert_eq!(config.history.capacity, 3);
        assert_eq!(config.watcher.poll_interval_ms, 1000);
        assert!(config.selection.hide_on_commit);
    }

    #[test]
    fn rejects_zero_capacity() {
        let mut config = Config::default();
        config.history.capacity = 0;
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }

    #[test]
    fn rejects_spinning_poll_interval() {
        let mut config = Config::default();
        config.watcher.poll_interval_ms = 1;
        assert!(matches!(config.validate(), Err(EngineError::Config(_))));
    }
}
