//! # EcoRoute
//!
//! Eco-friendly route planning: account signup and login that keep working
//! without a backend, a dashboard with simulated route options, weather and
//! traffic panels, a multilingual voice assistant, and star-rated feedback.
//!
//! ## Modules
//!
//! - [`store`]: Key/value persistence (memory, JSON file, SQLite)
//! - [`auth`]: Validation, credentials, session marker and the auth flow
//! - [`dashboard`]: Dashboard view-model, routes, voice, feedback
//! - [`remote`]: Client for the EcoRoute REST API
//! - [`api`]: REST API server with Axum
//! - [`config`]: TOML configuration with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use ecoroute::auth::{AuthFlow, SignupForm};
//! use ecoroute::store::FileStore;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(FileStore::open("local_storage.json")?);
//!     let flow = AuthFlow::offline(store);
//!
//!     flow.signup(&SignupForm::new("Asha", "asha@gmail.com", "Passw0rd!", "Passw0rd!"))
//!         .await?;
//!     let login = flow.login("asha@gmail.com", "Passw0rd!").await?;
//!
//!     println!("Logged in as {} via {:?}", login.email, login.source);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod remote;
pub mod store;

// Re-export top-level types for convenience
pub use store::{
    FileStore, JsonStoreExt, KeyValueStore, MemoryStore, SqliteStore, StoreError, StoreResult,
};

pub use auth::{
    AuthError, AuthFlow, AuthResult, AuthSource, CredentialStore, GuardDecision, RemoteAuth,
    Session, SessionGuard, SignupForm, View,
};

pub use dashboard::{Dashboard, DashboardEntry, DashboardError, DashboardResult, Language};

pub use remote::{ApiClient, RemoteConfig, RemoteError, RemoteResult};

pub use api::{build_router, serve, ApiConfig, ApiError, AppState};

pub use config::{Config, ConfigError, LoggingConfig};
