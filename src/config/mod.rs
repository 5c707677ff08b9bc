//! Configuration management for freshet.
//!
//! Configuration is read from `~/.config/freshet/config.toml` at startup.
//! If the file doesn't exist, a default configuration with comments is created.

use serde::Deserialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::sync::DedupStrategy;

pub const DEFAULT_INTERVAL_MS: u64 = 5000;
pub const DEFAULT_WORKERS: usize = 10;

/// Main configuration struct.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub polling: PollingConfig,
    pub fetcher: FetcherConfig,
}

/// Scheduler settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Time between refresh ticks in milliseconds (default: 5000)
    pub interval_ms: u64,
    /// Maximum refreshes running at once within a tick (default: 10)
    pub workers: usize,
    /// How refreshed items are matched against known posts
    pub dedup: DedupStrategy,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            workers: DEFAULT_WORKERS,
            dedup: DedupStrategy::default(),
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    /// Request timeout in seconds (default: 10)
    pub timeout_secs: u64,
    pub user_agent: String,
    /// Optional allorigins-style proxy, e.g. "https://allorigins.hexlet.app/get"
    pub proxy: Option<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("freshet/", env!("CARGO_PKG_VERSION")).to_string(),
            proxy: None,
        }
    }
}

impl Config {
    /// Load configuration from the default path.
    ///
    /// If the config file doesn't exist, creates a default one with comments.
    /// If the config file exists but is invalid, returns an error.
    /// Missing fields in the config file will use default values.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::default_config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
            return Ok(Self::default());
        }

        Self::load_from(&config_path)
    }

    /// Load configuration from an explicit path, which must exist.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path: `~/.config/freshet/config.toml`
    pub fn default_config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or(ConfigError::NoConfigDir)?;
        Ok(config_dir.join("freshet").join("config.toml"))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.polling.interval_ms == 0 {
            return Err(ConfigError::Invalid("polling.interval_ms must be positive".into()));
        }
        if self.polling.workers == 0 {
            return Err(ConfigError::Invalid("polling.workers must be positive".into()));
        }
        Ok(())
    }

    /// Create a default config file with comments.
    fn create_default_config(path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let mut file = fs::File::create(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;

        file.write_all(Self::default_config_content().as_bytes())
            .map_err(|e| ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;

        Ok(())
    }

    fn default_config_content() -> &'static str {
        r##"# freshet configuration

[polling]
# Milliseconds between refresh ticks. Ticks are aligned to the start time,
# so a slow refresh does not push later ticks back.
interval_ms = 5000

# Maximum number of feeds refreshed at the same time within one tick
workers = 10

# How refreshed items are matched against posts already seen:
# "content"    - same title, or same description when the title is empty
# "guid_first" - same guid when the item has one, otherwise "content"
dedup = "content"

[fetcher]
# Request timeout in seconds
timeout_secs = 10

# user_agent = "freshet/0.1.0"

# Route requests through an allorigins-style proxy
# proxy = "https://allorigins.hexlet.app/get"
"##
    }
}

/// Parse an interval like "500ms", "5s", "2m" or a raw number of milliseconds.
pub fn parse_interval_ms(s: &str) -> Result<u64, String> {
    let s = s.trim().to_lowercase();

    let ms = if let Some(ms) = s.strip_suffix("ms") {
        ms.parse::<u64>()
            .map_err(|_| format!("Invalid milliseconds: {}", ms))?
    } else if let Some(secs) = s.strip_suffix('s') {
        secs.parse::<u64>()
            .map_err(|_| format!("Invalid seconds: {}", secs))?
            .checked_mul(1000)
            .ok_or_else(|| format!("Interval too large: {}s", secs))?
    } else if let Some(minutes) = s.strip_suffix('m') {
        minutes
            .parse::<u64>()
            .map_err(|_| format!("Invalid minutes: {}", minutes))?
            .checked_mul(60_000)
            .ok_or_else(|| format!("Interval too large: {}m", minutes))?
    } else {
        s.parse::<u64>()
            .map_err(|_| format!("Invalid interval: {}. Use format like '500ms', '5s', '1m'", s))?
    };

    if ms == 0 {
        return Err("Interval must be positive".to_string());
    }
    Ok(ms)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read/write config file at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_deserializes() {
        let config: Config = toml::from_str(Config::default_config_content())
            .expect("Default config should be valid TOML");

        assert_eq!(config.polling.interval_ms, 5000);
        assert_eq!(config.polling.workers, 10);
        assert_eq!(config.polling.dedup, DedupStrategy::Content);
        assert_eq!(config.fetcher.timeout_secs, 10);
        assert!(config.fetcher.proxy.is_none());
    }

    #[test]
    fn test_partial_config() {
        let content = r#"
[polling]
interval_ms = 250
dedup = "guid_first"
"#;
        let config: Config = toml::from_str(content).expect("Partial config should work");

        assert_eq!(config.polling.interval_ms, 250);
        assert_eq!(config.polling.dedup, DedupStrategy::GuidFirst);
        assert_eq!(config.polling.workers, DEFAULT_WORKERS);
        assert!(config.fetcher.user_agent.starts_with("freshet/"));
    }

    #[test]
    fn test_empty_config() {
        let config: Config = toml::from_str("").expect("Empty config should work");
        assert_eq!(config.polling.interval_ms, DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[fetcher]\nproxy = \"https://allorigins.hexlet.app/get\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(
            config.fetcher.proxy.as_deref(),
            Some("https://allorigins.hexlet.app/get")
        );
    }

    #[test]
    fn test_load_from_rejects_zero_interval() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[polling]\ninterval_ms = 0\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[polling\n").unwrap();

        assert!(matches!(Config::load_from(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_create_default_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        Config::create_default_config(&path).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.polling.interval_ms, DEFAULT_INTERVAL_MS);
    }

    #[test]
    fn test_parse_interval() {
        assert_eq!(parse_interval_ms("500ms").unwrap(), 500);
        assert_eq!(parse_interval_ms("5s").unwrap(), 5000);
        assert_eq!(parse_interval_ms("2m").unwrap(), 120_000);
        assert_eq!(parse_interval_ms("750").unwrap(), 750);
        assert_eq!(parse_interval_ms(" 1S ").unwrap(), 1000);
        assert!(parse_interval_ms("0").is_err());
        assert!(parse_interval_ms("soon").is_err());
    }

    #[test]
    fn test_parse_interval_rejects_overflow() {
        assert!(parse_interval_ms("18446744073709551615s").is_err());
        assert!(parse_interval_ms("307445734561825861m").is_err());
        assert_eq!(
            parse_interval_ms("18446744073709551615ms").unwrap(),
            u64::MAX
        );
    }
}
