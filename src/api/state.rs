//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crate::auth::CredentialStore;
use crate::dashboard::{FeedbackLog, VoiceResponder};
use crate::store::SqliteStore;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Key/value store backing users and feedback
    pub store: Arc<SqliteStore>,
    /// User records keyed by email
    pub credentials: CredentialStore<SqliteStore>,
    /// Submitted feedback, in arrival order
    pub feedback: FeedbackLog<SqliteStore>,
    pub voice: VoiceResponder,
    /// API configuration
    pub config: Arc<ApiConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<SqliteStore>, config: ApiConfig) -> Self {
        Self {
            credentials: CredentialStore::new(Arc::clone(&store)),
            feedback: FeedbackLog::new(Arc::clone(&store)),
            store,
            voice: VoiceResponder::new(),
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}

/// API server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,
    /// SQLite database file
    #[serde(default = "default_database")]
    pub database: PathBuf,
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_database() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ecoroute")
        .join("ecoroute.db")
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            database: default_database(),
            cors_origins: Vec::new(),
        }
    }
}

impl ApiConfig {
    /// Get the socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
