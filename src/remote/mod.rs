//! Remote EcoRoute API
//!
//! The client side of the REST API. The API may or may not be running; see
//! [`RemoteError::allows_local_fallback`] for how callers tell the difference.

pub mod client;
pub mod error;

pub use client::{ApiClient, RemoteConfig};
pub use error::{RemoteError, RemoteResult};
