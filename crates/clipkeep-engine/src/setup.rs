//! Config file discovery and loading.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Config;
use crate::error::EngineError;

/// Load configuration from the given path, or the default location.
///
/// A missing file yields the defaults; a present but invalid file is an
/// error.
pub fn load_config(path: Option<&Path>) -> Result<Config, EngineError> {
    let config_path = path.map_or_else(default_config_path, Path::to_path_buf);

    let config = if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| EngineError::Config(format!("failed to read config: {e}")))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| EngineError::Config(format!("failed to parse config: {e}")))?;
        info!(path = %config_path.display(), "loaded config");
        config
    } else {
        info!("no config file found, using defaults");
        Config::default()
    };

    config.validate()?;
    Ok(config)
}

/// Get the default config directory path.
pub fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("~/.config"))
        .join("clipkeep")
}

/// Get the default config file path.
pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("clipkeep-{name}-{}.toml", std::process::id()))
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = load_config(Some(&temp_path("missing"))).unwrap();
        assert_eq!(config.history.capacity, 10);
    }

    #[test]
    fn reads_file() {
        let path = temp_path("reads");
        std::fs::write(&path, "[history]\ncapacity = 4\n").unwrap();
        let config = load_config(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.unwrap().history.capacity, 4);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let path = temp_path("invalid");
        std::fs::write(&path, "[watcher]\npoll_interval_ms = 0\n").unwrap();
        let result = load_config(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn malformed_toml_is_rejected() {
        let path = temp_path("malformed");
        std::fs::write(&path, "[history\ncapacity = ").unwrap();
        let result = load_config(Some(&path));
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn default_path_ends_in_clipkeep() {
        assert!(default_config_path().ends_with("clipkeep/config.toml"));
    }
}
