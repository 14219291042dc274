use thiserror::Error;

use crate::auth::credentials::CredentialError;
use crate::auth::validation::ValidationErrors;
use crate::remote::RemoteError;
use crate::store::StoreError;

/// Errors surfaced to the signup and login forms
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("{0}")]
    Validation(ValidationErrors),

    #[error("Account not found. Please sign up.")]
    AccountNotFound(String),

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Email already registered. Please login.")]
    AlreadyRegistered(String),

    /// 401 from the remote, carrying its message
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Remote error: {0}")]
    Remote(RemoteError),

    #[error("Password hashing failed")]
    PasswordHash,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

impl AuthError {
    /// Field-level messages for a form, if this is a validation failure
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AuthError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        AuthError::Validation(errors)
    }
}

impl From<CredentialError> for AuthError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::AlreadyRegistered(email) => AuthError::AlreadyRegistered(email),
            CredentialError::AccountNotFound(email) => AuthError::AccountNotFound(email),
            CredentialError::IncorrectPassword => AuthError::IncorrectPassword,
            CredentialError::PasswordHash => AuthError::PasswordHash,
            CredentialError::Store(e) => AuthError::Store(e),
        }
    }
}

pub type AuthResult<T> = Result<T, AuthError>;
