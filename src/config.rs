use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::logger::DEFAULT_TAG;
use crate::reporter::failed_tests::ENDPOINT_ENV;

pub const CONFIG_ENV: &str = "TEST_LOGS_REPORTER_CONFIG";
const APP_DIR: &str = "test-logs-reporter";
const LOCAL_CONFIG: &str = "test-logs-reporter.yaml";

/// Log level for the log file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }

    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Trace => log::LevelFilter::Trace,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Off => log::LevelFilter::Off,
        }
    }
}

/// Reporter configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Where failure records are POSTed; reporting is off when unset
    pub endpoint: Option<String>,
    /// Prefix for console lines
    pub tag: String,
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: None,
            tag: DEFAULT_TAG.to_string(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain, then apply environment overrides
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let config = Self::load_file(config_path)?;
        Ok(config.with_endpoint_env(std::env::var(ENDPOINT_ENV).ok()))
    }

    fn load_file(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, it must load
        if let Some(path) = config_path {
            let path = Self::expand_path(path);
            return Self::load_from_file(&path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV) {
            let path = Self::expand_path(Path::new(&env_path));
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", CONFIG_ENV, e);
                    }
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join(APP_DIR).join("config.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // ./test-logs-reporter.yaml next to the test suite
        let local_config = PathBuf::from(LOCAL_CONFIG);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Apply the endpoint environment variable; an empty value counts as unset
    pub fn with_endpoint_env(mut self, value: Option<String>) -> Self {
        if let Some(endpoint) = value.filter(|v| !v.trim().is_empty()) {
            self.endpoint = Some(endpoint);
        }
        self
    }

    /// Apply a command-line endpoint override
    pub fn with_endpoint(mut self, endpoint: Option<String>) -> Self {
        if endpoint.is_some() {
            self.endpoint = endpoint;
        }
        self
    }

    /// Effective endpoint, ignoring blank values
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }

    /// Directory for the log file
    pub fn log_dir() -> PathBuf {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
            .join("logs")
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.endpoint.is_none());
        assert_eq!(config.tag, DEFAULT_TAG);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_load_from_explicit_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reporter.yaml");
        fs::write(
            &path,
            "endpoint: https://api.example.com/results\ntag: e2e\nlog_level: debug\n",
        )
        .unwrap();

        let config = Config::load_file(Some(&path)).unwrap();
        assert_eq!(config.endpoint(), Some("https://api.example.com/results"));
        assert_eq!(config.tag, "e2e");
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("reporter.yaml");
        fs::write(&path, "endpoint: http://localhost:8080\n").unwrap();

        let config = Config::load_file(Some(&path)).unwrap();
        assert_eq!(config.tag, DEFAULT_TAG);
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = PathBuf::from("/nonexistent/test-logs-reporter.yaml");
        assert!(Config::load_file(Some(&path)).is_err());
    }

    #[test]
    fn test_endpoint_env_overrides_file() {
        let config = Config {
            endpoint: Some("http://from-file".to_string()),
            ..Config::default()
        }
        .with_endpoint_env(Some("http://from-env".to_string()));
        assert_eq!(config.endpoint(), Some("http://from-env"));
    }

    #[test]
    fn test_empty_endpoint_env_is_ignored() {
        let config = Config::default().with_endpoint_env(Some(String::new()));
        assert!(config.endpoint().is_none());

        let config = Config {
            endpoint: Some("http://from-file".to_string()),
            ..Config::default()
        }
        .with_endpoint_env(Some("  ".to_string()));
        assert_eq!(config.endpoint(), Some("http://from-file"));
    }

    #[test]
    fn test_cli_endpoint_wins() {
        let config = Config::default()
            .with_endpoint_env(Some("http://from-env".to_string()))
            .with_endpoint(Some("http://from-cli".to_string()));
        assert_eq!(config.endpoint(), Some("http://from-cli"));

        let config = Config::default()
            .with_endpoint_env(Some("http://from-env".to_string()))
            .with_endpoint(None);
        assert_eq!(config.endpoint(), Some("http://from-env"));
    }

    #[test]
    fn test_blank_endpoint_in_file_disables_reporting() {
        let config = Config {
            endpoint: Some("   ".to_string()),
            ..Config::default()
        };
        assert!(config.endpoint().is_none());
    }

    #[test]
    fn test_expand_path_with_env_var() {
        // SAFETY: Test runs single-threaded, env var is test-specific
        unsafe {
            std::env::set_var("TLR_TEST_VAR", "/custom/path");
        }
        let path = PathBuf::from("$TLR_TEST_VAR/reporter.yaml");
        let expanded = Config::expand_path(&path);
        assert_eq!(expanded, PathBuf::from("/custom/path/reporter.yaml"));
        unsafe {
            std::env::remove_var("TLR_TEST_VAR");
        }
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = Config {
            endpoint: Some("http://localhost".to_string()),
            ..Config::default()
        };
        let yaml_str = serde_yaml::to_string(&config).expect("Failed to serialize");
        let parsed: Config = serde_yaml::from_str(&yaml_str).expect("Failed to deserialize");
        assert_eq!(parsed.endpoint, config.endpoint);
        assert_eq!(parsed.log_level, config.log_level);
    }
}
