//! Layered configuration for the client.
//!
//! Priority (highest first): CLI flags, environment variables (through clap's
//! `env` attribute), the TOML file at `~/.config/taskdesk/config.toml`, and
//! compiled defaults. A missing default file is not an error; an explicit
//! `--config` path that cannot be read is.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::cli::Cli;

/// Base URL used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:5000";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),
}

/// Top-level TOML file structure. Every field is optional.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ConfigFile {
    api: ApiFileConfig,
    ui: UiFileConfig,
}

/// `[api]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct ApiFileConfig {
    base_url: Option<String>,
    request_timeout_secs: Option<u64>,
}

/// `[ui]` section.
#[derive(Debug, Default, serde::Deserialize)]
#[serde(default)]
struct UiFileConfig {
    poll_timeout_ms: Option<u64>,
    timestamp_format: Option<String>,
}

/// Fully resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend root, without a trailing slash.
    pub base_url: String,
    /// Per-request timeout. `None` leaves requests unbounded.
    pub request_timeout: Option<Duration>,
    /// Poll timeout for the TUI event loop.
    pub poll_timeout: Duration,
    /// chrono format string for displayed timestamps.
    pub timestamp_format: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout: None,
            poll_timeout: Duration::from_millis(50),
            timestamp_format: "%Y-%m-%d %H:%M".to_string(),
        }
    }
}

impl ClientConfig {
    /// Load configuration by merging CLI args, env vars, and the TOML file.
    pub fn load(cli: &Cli) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Ok(Self::resolve(cli, &file))
    }

    /// Resolve from parsed CLI args and config file. Priority: CLI > file > default.
    fn resolve(cli: &Cli, file: &ConfigFile) -> Self {
        let defaults = Self::default();

        let base_url = cli
            .base_url
            .clone()
            .or_else(|| file.api.base_url.clone())
            .unwrap_or(defaults.base_url);

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            request_timeout: file
                .api
                .request_timeout_secs
                .filter(|&secs| secs > 0)
                .map(Duration::from_secs),
            poll_timeout: file
                .ui
                .poll_timeout_ms
                .map_or(defaults.poll_timeout, Duration::from_millis),
            timestamp_format: cli
                .timestamp_format
                .clone()
                .or_else(|| file.ui.timestamp_format.clone())
                .unwrap_or(defaults.timestamp_format),
        }
    }
}

/// Load and parse a TOML config file.
///
/// An explicit path must exist. Without one, the default location is tried
/// and a missing file yields an empty config.
fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(p) = explicit_path {
        let contents = std::fs::read_to_string(p).map_err(|e| ConfigError::ReadFile {
            path: p.to_path_buf(),
            source: e,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("taskdesk").join("config.toml");

    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(e) => Err(ConfigError::ReadFile { path, source: e }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["taskdesk"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:5000");
        assert_eq!(config.request_timeout, None);
        assert_eq!(config.poll_timeout, Duration::from_millis(50));
        assert_eq!(config.timestamp_format, "%Y-%m-%d %H:%M");
    }

    #[test]
    fn test_toml_parsing_full() {
        let toml_str = r#"
[api]
base_url = "http://tasks.internal:8080/"
request_timeout_secs = 15

[ui]
poll_timeout_ms = 100
timestamp_format = "%d %b %H:%M"
"#;
        let file: ConfigFile = toml::from_str(toml_str).unwrap();
        let config = ClientConfig::resolve(&cli(&["list"]), &file);

        assert_eq!(config.base_url, "http://tasks.internal:8080");
        assert_eq!(config.request_timeout, Some(Duration::from_secs(15)));
        assert_eq!(config.poll_timeout, Duration::from_millis(100));
        assert_eq!(config.timestamp_format, "%d %b %H:%M");
    }

    #[test]
    fn test_toml_parsing_empty() {
        let file: ConfigFile = toml::from_str("").unwrap();
        let config = ClientConfig::resolve(&cli(&["list"]), &file);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_zero_timeout_means_none() {
        let file: ConfigFile = toml::from_str("[api]\nrequest_timeout_secs = 0\n").unwrap();
        let config = ClientConfig::resolve(&cli(&["list"]), &file);
        assert_eq!(config.request_timeout, None);
    }

    #[test]
    fn test_cli_overrides_file() {
        let file: ConfigFile = toml::from_str("[api]\nbase_url = \"http://file:1\"\n").unwrap();
        let config = ClientConfig::resolve(&cli(&["--base-url", "http://cli:2", "list"]), &file);
        assert_eq!(config.base_url, "http://cli:2");
    }

    #[test]
    fn test_explicit_missing_config_file_is_an_error() {
        let result = load_config_file(Some(Path::new("/nonexistent/taskdesk.toml")));
        assert!(matches!(result, Err(ConfigError::ReadFile { .. })));
    }
}
