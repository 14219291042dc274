//! Authentication
//!
//! Form validation, email-keyed credential records, the session marker and
//! the signup/login flow with its remote-then-local strategy.

pub mod credentials;
pub mod error;
pub mod flow;
pub mod session;
pub mod validation;

use serde::{Deserialize, Serialize};

pub use credentials::{CredentialError, CredentialResult, CredentialStore, UserRecord};
pub use error::{AuthError, AuthResult};
pub use flow::{AuthFlow, AuthSource, LoginOutcome, RemoteAuth, SignupForm, SignupOutcome};
pub use session::{GuardDecision, Session, SessionGuard, SessionManager};
pub use validation::{validate_login, validate_signup, PasswordRules, ValidationErrors};

/// Top-level screens
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Login,
    Signup,
    Dashboard,
}

impl std::fmt::Display for View {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            View::Login => "login",
            View::Signup => "signup",
            View::Dashboard => "dashboard",
        };
        write!(f, "{}", name)
    }
}
