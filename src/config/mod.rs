//! Configuration module for xcat3
//!
//! Settings are layered, later sources winning:
//! 1. built-in defaults
//! 2. `config.toml` in the user's config directory (`~/.config/xcat3/config.toml`
//!    on Linux) or the file passed with `--config`
//! 3. `XCAT3_*` environment variables (`XCAT3_URL`, `XCAT3_SHARD_COUNT`, ...)
//! 4. the `--url` command line flag
//!
//! Nothing is written back; a missing config file is not an error.

use std::path::{Path, PathBuf};
use std::time::Duration;

use config::{Config, ConfigError, Environment, File, FileFormat};
use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::bulk::{BulkSettings, DEFAULT_PARALLEL_THRESHOLD, DEFAULT_SHARD_COUNT};

/// Prefix of the environment variables read by [`ClientConfig::load`]
pub const ENV_PREFIX: &str = "XCAT3";

const fn default_shard_count() -> usize {
    DEFAULT_SHARD_COUNT
}

const fn default_parallel_threshold() -> usize {
    DEFAULT_PARALLEL_THRESHOLD
}

/// Client configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the service, e.g. `http://mgmt01:3010`
    #[serde(default)]
    pub url: Option<String>,

    /// Number of concurrent shards for large bulk operations
    #[serde(default = "default_shard_count")]
    pub shard_count: usize,

    /// Node count at which bulk operations are sharded
    #[serde(default = "default_parallel_threshold")]
    pub parallel_threshold: usize,

    /// Per-request timeout in seconds; unset means no timeout
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Suppress informational output by default
    #[serde(default)]
    pub quiet: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: None,
            shard_count: DEFAULT_SHARD_COUNT,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            timeout_secs: None,
            quiet: false,
        }
    }
}

impl ClientConfig {
    /// Get the path to the default config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir().ok_or_else(|| {
            ConfigError::Message("Could not determine config directory".to_string())
        })?;
        Ok(config_dir.join("xcat3").join("config.toml"))
    }

    /// Load configuration from the default file (if present) and the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file or environment holds invalid values.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::config_path()?;
        Self::from_sources(&path, false, Environment::with_prefix(ENV_PREFIX))
    }

    /// Load configuration from an explicit file plus the environment
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file is missing, unreadable or invalid.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        Self::from_sources(path, true, Environment::with_prefix(ENV_PREFIX))
    }

    /// Build configuration from a TOML file and an environment source
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required file is missing or any value has the
    /// wrong type.
    pub fn from_sources(
        path: &Path,
        required: bool,
        env: Environment,
    ) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(
                File::from(path)
                    .format(FileFormat::Toml)
                    .required(required),
            )
            .add_source(env.try_parsing(true).ignore_empty(true))
            .build()?;

        settings.try_deserialize()
    }

    /// Replace the service URL when one was given on the command line
    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        if url.is_some() {
            self.url = url;
        }
        self
    }

    /// Validated base URL without a trailing slash
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NotFound` when no URL is configured and
    /// `ConfigError::Message` when it is not an absolute http(s) URL.
    pub fn endpoint(&self) -> Result<String, ConfigError> {
        let raw = self
            .url
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                ConfigError::NotFound(format!(
                    "url (set {ENV_PREFIX}_URL in the environment or `url` in {})",
                    Self::config_path().map_or_else(|_| "config.toml".into(), |p| p.display().to_string())
                ))
            })?;

        let parsed = Url::parse(raw)
            .map_err(|e| ConfigError::Message(format!("Invalid service url '{raw}': {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ConfigError::Message(format!(
                "Invalid service url '{raw}': scheme must be http or https"
            )));
        }
        Ok(raw.trim_end_matches('/').to_string())
    }

    /// Bulk dispatch settings
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `shard_count` is zero.
    pub fn bulk_settings(&self) -> Result<BulkSettings, ConfigError> {
        if self.shard_count == 0 {
            return Err(ConfigError::Message(
                "shard_count must be at least 1".to_string(),
            ));
        }
        Ok(BulkSettings {
            shard_count: self.shard_count,
            parallel_threshold: self.parallel_threshold,
        })
    }

    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Render the effective configuration as TOML
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if serialization fails.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn env(vars: &[(&str, &str)]) -> Environment {
        let map: config::Map<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(map))
    }

    fn missing() -> PathBuf {
        PathBuf::from("/nonexistent/xcat3/config.toml")
    }

    #[test]
    fn test_defaults_without_sources() {
        let cfg = ClientConfig::from_sources(&missing(), false, env(&[])).unwrap();
        assert_eq!(cfg, ClientConfig::default());
        assert_eq!(cfg.bulk_settings().unwrap(), BulkSettings::default());
        assert!(cfg.timeout().is_none());
    }

    #[test]
    fn test_missing_url_is_config_error() {
        let cfg = ClientConfig::default();
        assert!(matches!(cfg.endpoint(), Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_env_overrides() {
        let cfg = ClientConfig::from_sources(
            &missing(),
            false,
            env(&[
                ("XCAT3_URL", "http://mgmt01:3010/"),
                ("XCAT3_SHARD_COUNT", "8"),
                ("XCAT3_TIMEOUT_SECS", "30"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.endpoint().unwrap(), "http://mgmt01:3010");
        assert_eq!(cfg.shard_count, 8);
        assert_eq!(cfg.timeout(), Some(Duration::from_secs(30)));
    }

    #[test]
    fn test_file_then_env_then_flag() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "url = \"http://from-file:3010\"\nparallel_threshold = 100").unwrap();

        let cfg = ClientConfig::from_sources(file.path(), true, env(&[])).unwrap();
        assert_eq!(cfg.url.as_deref(), Some("http://from-file:3010"));
        assert_eq!(cfg.parallel_threshold, 100);

        let cfg = ClientConfig::from_sources(
            file.path(),
            true,
            env(&[("XCAT3_URL", "http://from-env:3010")]),
        )
        .unwrap();
        assert_eq!(cfg.url.as_deref(), Some("http://from-env:3010"));

        let cfg = cfg.with_url(Some("https://from-flag".into()));
        assert_eq!(cfg.endpoint().unwrap(), "https://from-flag");
    }

    #[test]
    fn test_required_file_missing() {
        assert!(ClientConfig::from_sources(&missing(), true, env(&[])).is_err());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let cfg = ClientConfig::default().with_url(Some("mgmt01:3010".into()));
        assert!(cfg.endpoint().is_err());
        let cfg = ClientConfig::default().with_url(Some("ftp://mgmt01".into()));
        assert!(cfg.endpoint().is_err());
    }

    #[test]
    fn test_zero_shards_rejected() {
        let cfg = ClientConfig {
            shard_count: 0,
            ..ClientConfig::default()
        };
        assert!(cfg.bulk_settings().is_err());
    }

    #[test]
    fn test_to_toml_roundtrips_fields() {
        let cfg = ClientConfig::default().with_url(Some("http://mgmt01".into()));
        let rendered = cfg.to_toml().unwrap();
        assert!(rendered.contains("url = \"http://mgmt01\""));
        assert!(rendered.contains("shard_count = 4"));
    }
}
