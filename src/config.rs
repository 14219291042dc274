//! Configuration System
//!
//! Handles loading configuration from files and environment variables.
//! Supports TOML config files and environment variable overrides.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::api::ApiConfig;
use crate::remote::RemoteConfig;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub client: ClientConfig,

    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub api: ApiConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Client-side remote API settings
#[derive(Debug, Clone, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_ms: u64,

    /// Skip the remote entirely and use local storage
    #[serde(default)]
    pub offline: bool,
}

fn default_api_url() -> String {
    "http://localhost:5000".to_string()
}

fn default_request_timeout() -> u64 {
    5000
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            request_timeout_ms: default_request_timeout(),
            offline: false,
        }
    }
}

impl ClientConfig {
    pub fn remote(&self) -> RemoteConfig {
        RemoteConfig {
            base_url: self.api_url.clone(),
            request_timeout_ms: self.request_timeout_ms,
        }
    }
}

/// Client-side local storage
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("ecoroute"))
        .unwrap_or_else(|| PathBuf::from("./ecoroute_data"))
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl LoggingConfig {
    /// Install the global subscriber. `RUST_LOG` wins over the configured level.
    pub fn init(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("ecoroute={},tower_http=info", self.level)));

        let registry = tracing_subscriber::registry().with(filter);

        let result = if self.format == "json" {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
        } else {
            registry
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .try_init()
        };

        if let Err(e) = result {
            eprintln!("Logging already initialized: {}", e);
        }
    }
}

/// Subscriber used while the config itself is loading, before [`LoggingConfig::init`]
fn bootstrap_subscriber<W>(writer: W) -> impl tracing::Subscriber + Send + Sync
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("ecoroute={}", default_log_level())));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .finish()
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            error: e.to_string(),
        })?;

        Ok(config)
    }

    /// Load configuration from environment variables only
    pub fn from_env() -> Self {
        let mut config = Config::default();
        config.apply_env_overrides();
        config
    }

    /// Load configuration with environment variable overrides
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Load an explicit file if given, otherwise search the default locations
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load_with_env(path),
            None => Ok(Self::load_default()),
        }
    }

    /// [`Config::load_from`] with load warnings going to stderr.
    ///
    /// Binaries call this before the configured subscriber exists.
    pub fn load_logged(path: Option<&Path>) -> Result<Self, ConfigError> {
        tracing::subscriber::with_default(bootstrap_subscriber(std::io::stderr), || {
            Self::load_from(path)
        })
    }

    /// Load from default locations or environment
    pub fn load_default() -> Self {
        let config_paths: Vec<PathBuf> = [
            dirs::config_dir().map(|p| p.join("ecoroute").join("config.toml")),
            Some(PathBuf::from("/etc/ecoroute/config.toml")),
            Some(PathBuf::from("./config.toml")),
        ]
        .into_iter()
        .flatten()
        .collect();

        Self::load_first(&config_paths)
    }

    /// First existing file that parses; a broken file is skipped with a warning
    fn load_first(config_paths: &[PathBuf]) -> Self {
        for path in config_paths {
            if path.exists() {
                match Self::load_with_env(path) {
                    Ok(config) => {
                        tracing::debug!("Loaded config from {:?}", path);
                        return config;
                    }
                    Err(e) => {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                    }
                }
            }
        }

        Self::from_env()
    }

    /// Apply environment variable overrides to an existing config
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        // Client overrides
        if let Some(url) = var("ECOROUTE_API_URL") {
            self.client.api_url = url;
        }
        if let Some(offline) = var("ECOROUTE_OFFLINE") {
            self.client.offline = parse_flag(&offline);
        }

        // Storage overrides
        if let Some(data_dir) = var("ECOROUTE_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(data_dir);
        }

        // API overrides
        if let Some(host) = var("ECOROUTE_API_HOST") {
            self.api.host = host;
        }
        if let Some(port) = var("ECOROUTE_API_PORT") {
            if let Ok(p) = port.parse() {
                self.api.port = p;
            }
        }
        if let Some(db) = var("ECOROUTE_DB_PATH") {
            self.api.database = PathBuf::from(db);
        }

        // Logging overrides
        if let Some(level) = var("ECOROUTE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(format) = var("ECOROUTE_LOG_FORMAT") {
            self.logging.format = format;
        }
    }
}

fn parse_flag(value: &str) -> bool {
    !matches!(value.to_lowercase().as_str(), "" | "0" | "false" | "no")
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path:?}: {error}")]
    Io { path: PathBuf, error: String },

    #[error("Failed to parse config file {path:?}: {error}")]
    Parse { path: PathBuf, error: String },
}

/// Generate a default config file content
pub fn generate_default_config() -> String {
    r#"# EcoRoute Configuration
#
# Environment variables override these settings:
# - ECOROUTE_API_URL
# - ECOROUTE_OFFLINE
# - ECOROUTE_DATA_DIR
# - ECOROUTE_API_HOST
# - ECOROUTE_API_PORT
# - ECOROUTE_DB_PATH
# - ECOROUTE_LOG_LEVEL
# - ECOROUTE_LOG_FORMAT

[client]
# Base URL of the EcoRoute API
api_url = "http://localhost:5000"

# Request timeout in milliseconds
request_timeout_ms = 5000

# Never contact the API; use local storage only
offline = false

[storage]
# Directory for the client's local key/value store
# (default: the platform data directory, e.g. ~/.local/share/ecoroute)
# data_dir = "/var/lib/ecoroute"

[api]
# API server host
host = "0.0.0.0"

# API server port
port = 5000

# SQLite database for users and feedback
# (default: ecoroute.db in the platform data directory)
# database = "/var/lib/ecoroute/ecoroute.db"

# Allowed CORS origins (empty allows any origin)
cors_origins = []

[logging]
# Log level: trace, debug, info, warn, error
level = "info"

# Log format: pretty (for development) or json (for production)
format = "pretty"
"#
    .to_string()
}
