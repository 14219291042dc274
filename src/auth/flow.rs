//! Auth Flow
//!
//! Signup and login run in two steps: validate locally, then ask the remote
//! API. If the remote cannot be reached or does not serve the API, the local
//! credential store answers instead. A 409 from the remote is final. A login
//! 401 is final unless a local account exists for that email, in which case
//! the local record decides.

use async_trait::async_trait;
use std::sync::Arc;

use crate::api::dto::{LoginRequest, SignupRequest, UserDto};
use crate::auth::credentials::CredentialStore;
use crate::auth::error::{AuthError, AuthResult};
use crate::auth::session::SessionManager;
use crate::auth::validation;
use crate::auth::View;
use crate::remote::RemoteError;
use crate::store::KeyValueStore;

/// Display name used when the remote login response carries none
pub const DEFAULT_DISPLAY_NAME: &str = "User";

/// Remote half of the auth flow
#[async_trait]
pub trait RemoteAuth: Send + Sync {
    async fn signup(&self, request: &SignupRequest) -> Result<UserDto, RemoteError>;

    async fn login(&self, request: &LoginRequest) -> Result<UserDto, RemoteError>;
}

/// Which strategy completed an auth operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthSource {
    Remote,
    Local,
}

/// Signup input as typed into the form
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupForm {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignupOutcome {
    pub source: AuthSource,
    /// Always [`View::Login`]: the user logs in after signing up
    pub next: View,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub email: String,
    /// Remote-sourced display name; `None` after a local login
    pub display_name: Option<String>,
    pub source: AuthSource,
    /// Always [`View::Dashboard`]
    pub next: View,
}

/// Signup/login against an optional remote with local fallback
pub struct AuthFlow<S: ?Sized> {
    credentials: CredentialStore<S>,
    sessions: SessionManager<S>,
    remote: Option<Arc<dyn RemoteAuth>>,
}

impl<S: KeyValueStore + ?Sized> AuthFlow<S> {
    /// Local-only flow
    pub fn offline(store: Arc<S>) -> Self {
        Self {
            credentials: CredentialStore::new(Arc::clone(&store)),
            sessions: SessionManager::new(store),
            remote: None,
        }
    }

    /// Remote-first flow with local fallback
    pub fn with_remote(store: Arc<S>, remote: Arc<dyn RemoteAuth>) -> Self {
        Self {
            remote: Some(remote),
            ..Self::offline(store)
        }
    }

    pub async fn signup(&self, form: &SignupForm) -> AuthResult<SignupOutcome> {
        validation::validate_signup(&form.email, &form.password, &form.confirm_password)?;

        if let Some(remote) = &self.remote {
            let request = SignupRequest {
                name: form.name.clone(),
                email: form.email.clone(),
                password: form.password.clone(),
            };

            match remote.signup(&request).await {
                Ok(_) => {
                    tracing::info!(email = %form.email, "Account created on remote");
                    return Ok(SignupOutcome {
                        source: AuthSource::Remote,
                        next: View::Login,
                    });
                }
                Err(e) if e.allows_local_fallback() => {
                    tracing::warn!(error = %e, "Remote unavailable, using local storage");
                }
                Err(e) => return Err(rejection(e, &form.email)),
            }
        }

        self.credentials
            .register(&form.name, &form.email, &form.password)?;
        tracing::info!(email = %form.email, "Account created locally");

        Ok(SignupOutcome {
            source: AuthSource::Local,
            next: View::Login,
        })
    }

    pub async fn login(&self, email: &str, password: &str) -> AuthResult<LoginOutcome> {
        validation::validate_login(email)?;

        if let Some(remote) = &self.remote {
            let request = LoginRequest {
                email: email.to_string(),
                password: password.to_string(),
            };

            match remote.login(&request).await {
                Ok(user) => {
                    let display_name = user
                        .name
                        .filter(|name| !name.is_empty())
                        .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string());
                    self.sessions.start(email, Some(&display_name))?;

                    return Ok(LoginOutcome {
                        email: email.to_string(),
                        display_name: Some(display_name),
                        source: AuthSource::Remote,
                        next: View::Dashboard,
                    });
                }
                Err(e) if e.allows_local_fallback() => {
                    tracing::warn!(error = %e, "Remote unavailable, using local storage");
                }
                // Accounts created while the remote was down only exist locally
                Err(e) if e.status() == Some(401) && self.credentials.exists(email)? => {
                    tracing::info!(email = %email, "Remote does not know this account, checking local storage");
                }
                Err(e) => return Err(rejection(e, email)),
            }
        }

        self.credentials.verify(email, password)?;
        self.sessions.start(email, None)?;

        Ok(LoginOutcome {
            email: email.to_string(),
            display_name: None,
            source: AuthSource::Local,
            next: View::Dashboard,
        })
    }

    /// End the current session
    pub fn logout(&self) -> AuthResult<View> {
        Ok(self.sessions.end()?)
    }
}

/// Translate a definitive remote answer
fn rejection(err: RemoteError, email: &str) -> AuthError {
    match err {
        RemoteError::Rejected { status: 409, .. } => AuthError::AlreadyRegistered(email.to_string()),
        RemoteError::Rejected {
            status: 401,
            message,
        } => AuthError::InvalidCredentials(message),
        other => AuthError::Remote(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::{ApiClient, RemoteConfig};
    use crate::store::{MemoryStore, CURRENT_USER_KEY, USER_NAME_KEY};
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Remote that always fails with the error produced by `fail`
    struct FailingRemote {
        fail: fn() -> RemoteError,
        calls: AtomicUsize,
    }

    impl FailingRemote {
        fn unreachable() -> Arc<Self> {
            Arc::new(Self {
                fail: || RemoteError::Unavailable,
                calls: AtomicUsize::new(0),
            })
        }

        fn rejecting(fail: fn() -> RemoteError) -> Arc<Self> {
            Arc::new(Self {
                fail,
                calls: AtomicUsize::new(0),
            })
        }

        fn invalid_credentials() -> Arc<Self> {
            Self::rejecting(|| RemoteError::Rejected {
                status: 401,
                message: "Invalid credentials".to_string(),
            })
        }
    }

    #[async_trait]
    impl RemoteAuth for FailingRemote {
        async fn signup(&self, _request: &SignupRequest) -> Result<UserDto, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err((self.fail)())
        }

        async fn login(&self, _request: &LoginRequest) -> Result<UserDto, RemoteError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err((self.fail)())
        }
    }

    /// Remote that accepts everything
    struct AcceptingRemote;

    #[async_trait]
    impl RemoteAuth for AcceptingRemote {
        async fn signup(&self, request: &SignupRequest) -> Result<UserDto, RemoteError> {
            Ok(UserDto {
                email: request.email.clone(),
                name: Some(request.name.clone()),
            })
        }

        async fn login(&self, request: &LoginRequest) -> Result<UserDto, RemoteError> {
            Ok(UserDto {
                email: request.email.clone(),
                name: Some("Test User".to_string()),
            })
        }
    }

    fn asha() -> SignupForm {
        SignupForm::new("Asha", "asha@gmail.com", "Passw0rd!", "Passw0rd!")
    }

    #[tokio::test]
    async fn test_signup_then_login_with_remote_unavailable() {
        let store = Arc::new(MemoryStore::new());
        let remote = FailingRemote::unreachable();
        let flow = AuthFlow::with_remote(Arc::clone(&store), remote.clone());

        let signup = flow.signup(&asha()).await.unwrap();
        assert_eq!(signup.source, AuthSource::Local);
        assert_eq!(signup.next, View::Login);
        assert!(store.get_item("asha@gmail.com").unwrap().is_some());

        let login = flow.login("asha@gmail.com", "Passw0rd!").await.unwrap();
        assert_eq!(login.source, AuthSource::Local);
        assert_eq!(login.next, View::Dashboard);
        assert_eq!(
            store.get_item(CURRENT_USER_KEY).unwrap().as_deref(),
            Some("asha@gmail.com")
        );
        assert_eq!(remote.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_duplicate_signup_conflicts() {
        let store = Arc::new(MemoryStore::new());
        let flow = AuthFlow::with_remote(store, FailingRemote::unreachable());

        flow.signup(&asha()).await.unwrap();
        let err = flow.signup(&asha()).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered(ref email) if email == "asha@gmail.com"));
    }

    #[tokio::test]
    async fn test_wrong_password_is_not_account_not_found() {
        let store = Arc::new(MemoryStore::new());
        let flow = AuthFlow::with_remote(Arc::clone(&store), FailingRemote::unreachable());
        flow.signup(&asha()).await.unwrap();

        let err = flow.login("asha@gmail.com", "Wrong0rd!").await.unwrap_err();
        assert!(matches!(err, AuthError::IncorrectPassword));
        assert!(store.get_item(CURRENT_USER_KEY).unwrap().is_none());

        let err = flow.login("ravi@gmail.com", "Passw0rd!").await.unwrap_err();
        assert!(matches!(err, AuthError::AccountNotFound(_)));
    }

    #[tokio::test]
    async fn test_bad_email_rejected_before_any_access() {
        let store = Arc::new(MemoryStore::new());
        let remote = FailingRemote::unreachable();
        let flow = AuthFlow::with_remote(Arc::clone(&store), remote.clone());

        for email in ["asha@yahoo.com", "asha", "", "asha@gmail.co"] {
            let form = SignupForm::new("Asha", email, "Passw0rd!", "Passw0rd!");
            assert!(matches!(flow.signup(&form).await, Err(AuthError::Validation(_))));
            assert!(matches!(
                flow.login(email, "Passw0rd!").await,
                Err(AuthError::Validation(_))
            ));
        }

        assert_eq!(remote.calls.load(Ordering::SeqCst), 0);
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_signup_validation_reports_fields() {
        let store = Arc::new(MemoryStore::new());
        let flow = AuthFlow::offline(Arc::clone(&store));

        let form = SignupForm::new("Asha", "asha@gmail.com", "password", "passw0rd");
        match flow.signup(&form).await {
            Err(AuthError::Validation(errors)) => {
                assert!(errors.email.is_none());
                assert_eq!(
                    errors.password.as_deref(),
                    Some("Password must contain a special character")
                );
                assert_eq!(errors.confirm_password.as_deref(), Some("Passwords do not match"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(store.is_empty());
    }

    #[tokio::test]
    async fn test_remote_success_skips_local_store() {
        let store = Arc::new(MemoryStore::new());
        let flow = AuthFlow::with_remote(Arc::clone(&store), Arc::new(AcceptingRemote));

        let signup = flow.signup(&asha()).await.unwrap();
        assert_eq!(signup.source, AuthSource::Remote);
        assert!(store.is_empty());

        let login = flow.login("asha@gmail.com", "anything").await.unwrap();
        assert_eq!(login.source, AuthSource::Remote);
        assert_eq!(login.display_name.as_deref(), Some("Test User"));
        assert_eq!(store.get_item(USER_NAME_KEY).unwrap().as_deref(), Some("Test User"));
    }

    #[tokio::test]
    async fn test_remote_rejection_does_not_fall_back() {
        let store = Arc::new(MemoryStore::new());
        let flow = AuthFlow::with_remote(
            Arc::clone(&store),
            FailingRemote::rejecting(|| RemoteError::Rejected {
                status: 409,
                message: "Email already registered".to_string(),
            }),
        );

        let err = flow.signup(&asha()).await.unwrap_err();
        assert!(matches!(err, AuthError::AlreadyRegistered(_)));
        assert!(store.is_empty());

        let flow = AuthFlow::with_remote(Arc::clone(&store), FailingRemote::invalid_credentials());
        let err = flow.login("asha@gmail.com", "Passw0rd!").await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidCredentials(ref m) if m == "Invalid credentials"));
        assert!(store.get_item(CURRENT_USER_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_login_401_checks_local_account() {
        let store = Arc::new(MemoryStore::new());
        AuthFlow::offline(Arc::clone(&store)).signup(&asha()).await.unwrap();

        let flow = AuthFlow::with_remote(Arc::clone(&store), FailingRemote::invalid_credentials());

        let err = flow.login("asha@gmail.com", "Wrong0rd!").await.unwrap_err();
        assert!(matches!(err, AuthError::IncorrectPassword));
        assert!(store.get_item(CURRENT_USER_KEY).unwrap().is_none());

        let login = flow.login("asha@gmail.com", "Passw0rd!").await.unwrap();
        assert_eq!(login.source, AuthSource::Local);
        assert_eq!(
            store.get_item(CURRENT_USER_KEY).unwrap().as_deref(),
            Some("asha@gmail.com")
        );
    }

    #[tokio::test]
    async fn test_unknown_endpoint_falls_back() {
        let store = Arc::new(MemoryStore::new());
        let flow = AuthFlow::with_remote(
            Arc::clone(&store),
            FailingRemote::rejecting(|| RemoteError::Rejected {
                status: 405,
                message: String::new(),
            }),
        );

        let signup = flow.signup(&asha()).await.unwrap();
        assert_eq!(signup.source, AuthSource::Local);
        let login = flow.login("asha@gmail.com", "Passw0rd!").await.unwrap();
        assert_eq!(login.source, AuthSource::Local);
    }

    #[tokio::test]
    async fn test_host_without_api_falls_back() {
        // Reachable, but every path is a 404
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, axum::Router::new()).await.unwrap();
        });
        let client = ApiClient::new(RemoteConfig::new(format!("http://{}", addr))).unwrap();

        let store = Arc::new(MemoryStore::new());
        let flow = AuthFlow::with_remote(Arc::clone(&store), Arc::new(client));

        let signup = flow.signup(&asha()).await.unwrap();
        assert_eq!(signup.source, AuthSource::Local);
        assert!(store.get_item("asha@gmail.com").unwrap().is_some());

        let login = flow.login("asha@gmail.com", "Passw0rd!").await.unwrap();
        assert_eq!(login.source, AuthSource::Local);
    }

    #[tokio::test]
    async fn test_server_error_falls_back() {
        let store = Arc::new(MemoryStore::new());
        let flow = AuthFlow::with_remote(
            Arc::clone(&store),
            FailingRemote::rejecting(|| RemoteError::Server {
                status: 500,
                message: "boom".to_string(),
            }),
        );

        let signup = flow.signup(&asha()).await.unwrap();
        assert_eq!(signup.source, AuthSource::Local);
    }

    #[tokio::test]
    async fn test_logout() {
        let store = Arc::new(MemoryStore::new());
        let flow = AuthFlow::offline(Arc::clone(&store));
        flow.signup(&asha()).await.unwrap();
        flow.login("asha@gmail.com", "Passw0rd!").await.unwrap();

        assert_eq!(flow.logout().unwrap(), View::Login);
        assert!(store.get_item(CURRENT_USER_KEY).unwrap().is_none());
        // The account itself survives logout
        assert!(store.get_item("asha@gmail.com").unwrap().is_some());
    }
}
