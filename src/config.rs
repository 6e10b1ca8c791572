//! Configuration for the demo feed session

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors loading a config file
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("failed to read config file: {0}")]
    Read(#[from] std::io::Error),
    /// The file is not valid TOML for this config
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Demo session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Number of posts seeded into the simulated feed
    #[serde(default = "default_post_count")]
    pub post_count: usize,

    /// Simulated network latency per call, in milliseconds
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Every Nth backend call fails (0 = never fail)
    #[serde(default = "default_fail_every")]
    pub fail_every: usize,

    /// Toggle gestures fired per post during the session
    #[serde(default = "default_toggle_rounds")]
    pub toggle_rounds: usize,
}

fn default_post_count() -> usize {
    4
}

fn default_latency_ms() -> u64 {
    40
}

fn default_fail_every() -> usize {
    3
}

fn default_toggle_rounds() -> usize {
    2
}

impl Default for Config {
    fn default() -> Self {
        Self {
            post_count: default_post_count(),
            latency_ms: default_latency_ms(),
            fail_every: default_fail_every(),
            toggle_rounds: default_toggle_rounds(),
        }
    }
}

impl Config {
    /// Load config from a path, falling back to defaults if it is absent
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.post_count, 4);
        assert_eq!(config.fail_every, 3);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "latency_ms = 5\nfail_every = 0\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.latency_ms, 5);
        assert_eq!(config.fail_every, 0);
        assert_eq!(config.post_count, 4);
    }

    #[test]
    fn test_bad_toml_is_a_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "latency_ms = \"soon\"").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
