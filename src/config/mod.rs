//! Configuration management.
//!
//! Settings are read from an optional TOML file and then overridden by
//! `COMICVINE_METADATA_*` environment variables (nested keys separated by
//! `__`, e.g. `COMICVINE_METADATA_RATE_LIMITS__DELAY_SECONDS=2`).
//!
//! ```toml
//! [api_keys]
//! comicvine = "your-api-key"
//!
//! [comicvine]
//! base_url = "https://comicvine.gamespot.com/api"
//!
//! [rate_limits]
//! delay_seconds = 1
//!
//! [http]
//! timeout_seconds = 30
//! connect_timeout_seconds = 10
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{ApiSettings, DEFAULT_BASE_URL, DEFAULT_DELAY_SECONDS};
use crate::utils::{DEFAULT_CONNECT_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS};

/// File name looked up by [`find_config_file`]
pub const CONFIG_FILE_NAME: &str = "comicvine-metadata.toml";

/// Prefix for environment overrides
pub const ENV_PREFIX: &str = "COMICVINE_METADATA";

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// API keys for external services
    #[serde(default)]
    pub api_keys: ApiKeys,

    /// ComicVine endpoint settings
    #[serde(default)]
    pub comicvine: ComicVineConfig,

    /// Rate limiting settings
    #[serde(default)]
    pub rate_limits: RateLimitConfig,

    /// HTTP client settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Request settings for ComicVine calls
    ///
    /// A missing API key becomes an empty string, which the flows reject
    /// before making any request.
    pub fn api_settings(&self) -> ApiSettings {
        ApiSettings::new(self.api_keys.comicvine.clone().unwrap_or_default())
            .base_url(self.comicvine.base_url.clone())
            .delay_seconds(self.rate_limits.delay_seconds)
    }
}

/// API keys for external services
#[derive(Clone, Serialize, Deserialize)]
pub struct ApiKeys {
    /// ComicVine API key
    #[serde(default)]
    pub comicvine: Option<String>,
}

impl Default for ApiKeys {
    fn default() -> Self {
        Self {
            comicvine: std::env::var("COMICVINE_API_KEY").ok(),
        }
    }
}

impl std::fmt::Debug for ApiKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiKeys")
            .field(
                "comicvine",
                &self.comicvine.as_deref().map(crate::utils::mask_api_key),
            )
            .finish()
    }
}

/// ComicVine endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComicVineConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ComicVineConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Whole seconds to wait between listing pages
    #[serde(default = "default_delay")]
    pub delay_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            delay_seconds: default_delay(),
        }
    }
}

fn default_delay() -> u64 {
    DEFAULT_DELAY_SECONDS
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_seconds: u64,
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout(),
            connect_timeout_seconds: default_connect_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_connect_timeout() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// `json` for structured output, anything else for the default formatter
    #[serde(default)]
    pub format: Option<String>,
}

impl LoggingConfig {
    pub fn is_json(&self) -> bool {
        self.format
            .as_deref()
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load configuration from a file
pub fn load_config(path: &Path) -> Result<Config, config::ConfigError> {
    let settings = config::Config::builder()
        .add_source(config::File::from(path))
        .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
        .build()?;

    let mut loaded: Config = settings.try_deserialize()?;
    if loaded.api_keys.comicvine.is_none() {
        loaded.api_keys.comicvine = std::env::var("COMICVINE_API_KEY").ok();
    }
    Ok(loaded)
}

/// Look for a config file in the working directory, then the user config directory
pub fn find_config_file() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.is_file() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join("comicvine-metadata").join(CONFIG_FILE_NAME))
        .filter(|path| path.is_file())
}

/// Get the default configuration (from env vars or defaults)
pub fn get_config() -> Config {
    Config::default()
}

/// Render a configuration as TOML
pub fn to_toml(config: &Config) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.comicvine.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.rate_limits.delay_seconds, 1);
        assert_eq!(config.http.timeout(), Duration::from_secs(30));
        assert!(!config.logging.is_json());
    }

    #[test]
    fn test_config_file_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let toml_content = r#"
[api_keys]
comicvine = "test-key"

[comicvine]
base_url = "http://localhost:9999/api"

[rate_limits]
delay_seconds = 3

[logging]
level = "debug"
format = "JSON"
"#;

        let mut file = File::create(&path).unwrap();
        file.write_all(toml_content.as_bytes()).unwrap();

        let config = load_config(&path).unwrap();

        assert_eq!(config.api_keys.comicvine, Some("test-key".to_string()));
        assert_eq!(config.comicvine.base_url, "http://localhost:9999/api");
        assert_eq!(config.rate_limits.delay_seconds, 3);
        assert_eq!(config.http.connect_timeout_seconds, 10);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.is_json());

        let settings = config.api_settings();
        assert_eq!(settings.api_key, "test-key");
        assert_eq!(settings.base_url, "http://localhost:9999/api");
        assert_eq!(settings.delay, Duration::from_secs(3));
    }

    #[test]
    fn test_config_toml_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.api_keys.comicvine = Some("saved-key".to_string());
        config.rate_limits.delay_seconds = 5;
        std::fs::write(&path, to_toml(&config).unwrap()).unwrap();

        let loaded = load_config(&path).unwrap();
        assert_eq!(loaded.api_keys.comicvine, Some("saved-key".to_string()));
        assert_eq!(loaded.rate_limits.delay_seconds, 5);
    }

    #[test]
    fn test_config_file_nonexistent() {
        let path = PathBuf::from("/nonexistent/config.toml");
        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_config_file_invalid_toml() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("invalid.toml");
        std::fs::write(&path, "invalid = toml = content").unwrap();

        assert!(load_config(&path).is_err());
    }

    #[test]
    fn test_api_keys_debug_is_masked() {
        let keys = ApiKeys {
            comicvine: Some("abcdefgh1234".to_string()),
        };
        let debug = format!("{:?}", keys);
        assert!(!debug.contains("abcdefgh"));
        assert!(debug.contains("****1234"));
    }
}
