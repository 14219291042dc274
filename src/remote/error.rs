//! Remote API error types

use thiserror::Error;

/// Errors from calls to the EcoRoute API.
///
/// Only a 401 or 409 [`RemoteError::Rejected`] is a definitive answer from
/// the EcoRoute API. Any other failure, including a 404 or 405 from a host
/// that does not serve the API, lets callers fall back to local behavior.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("EcoRoute API unavailable")]
    Unavailable,

    #[error("Request timeout")]
    Timeout,

    #[error("Invalid response: {0}")]
    Decode(String),

    #[error("Server error {status}: {message}")]
    Server { status: u16, message: String },

    #[error("API error {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl RemoteError {
    /// Whether the local fallback should take over
    pub fn allows_local_fallback(&self) -> bool {
        !matches!(
            self,
            RemoteError::Rejected {
                status: 401 | 409,
                ..
            }
        )
    }

    /// HTTP status of a server answer, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Server { status, .. } | RemoteError::Rejected { status, .. } => {
                Some(*status)
            }
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RemoteError::Timeout
        } else if err.is_connect() {
            RemoteError::Unavailable
        } else if err.is_decode() {
            RemoteError::Decode(err.to_string())
        } else {
            RemoteError::Request(err)
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;
