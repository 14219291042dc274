//! Session marker and guard
//!
//! The session marker is the logged-in email under `currentUser`. The guard
//! runs on dashboard entry and either redirects to login or resolves the
//! greeting name for the session.

use serde::Serialize;
use std::sync::Arc;

use crate::auth::credentials::CredentialStore;
use crate::auth::View;
use crate::store::{KeyValueStore, StoreError, StoreResult, CURRENT_USER_KEY, USER_NAME_KEY};

/// Reads and writes the session marker
pub struct SessionManager<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for SessionManager<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> SessionManager<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Mark `email` as logged in. A remote login also records its display name.
    pub fn start(&self, email: &str, display_name: Option<&str>) -> StoreResult<()> {
        self.store.set_item(CURRENT_USER_KEY, email)?;
        match display_name {
            Some(name) => self.store.set_item(USER_NAME_KEY, name)?,
            None => self.store.remove_item(USER_NAME_KEY)?,
        }
        tracing::info!(email = %email, "Session started");
        Ok(())
    }

    /// Logged-in email, if any
    pub fn current_user(&self) -> StoreResult<Option<String>> {
        Ok(self
            .store
            .get_item(CURRENT_USER_KEY)?
            .filter(|email| !email.is_empty()))
    }

    pub fn display_name(&self) -> StoreResult<Option<String>> {
        self.store.get_item(USER_NAME_KEY)
    }

    /// Clear the marker and display name
    pub fn end(&self) -> StoreResult<View> {
        self.store.remove_item(CURRENT_USER_KEY)?;
        self.store.remove_item(USER_NAME_KEY)?;
        tracing::info!("Session ended");
        Ok(View::Login)
    }
}

/// An authenticated dashboard session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Session {
    pub email: String,
    pub greeting_name: String,
}

/// What the dashboard should do on entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// No session marker: go to this view and do nothing else
    Redirect(View),
    Proceed(Session),
}

/// Dashboard entry check
pub struct SessionGuard<S: ?Sized> {
    sessions: SessionManager<S>,
    credentials: CredentialStore<S>,
}

impl<S: KeyValueStore + ?Sized> SessionGuard<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            sessions: SessionManager::new(Arc::clone(&store)),
            credentials: CredentialStore::new(store),
        }
    }

    /// Greeting resolution order: local record name, remote display name, email.
    pub fn check(&self) -> StoreResult<GuardDecision> {
        let Some(email) = self.sessions.current_user()? else {
            tracing::debug!("No session marker, redirecting to login");
            return Ok(GuardDecision::Redirect(View::Login));
        };

        let local_name = match self.credentials.get(&email) {
            Ok(record) => record.map(|r| r.name),
            // Something other than a user record under the email key
            Err(StoreError::Serialization(e)) => {
                tracing::debug!(email = %email, error = %e, "Ignoring undecodable user record");
                None
            }
            Err(e) => return Err(e),
        };

        let greeting_name = match local_name {
            Some(name) => name,
            None => self.sessions.display_name()?.unwrap_or_else(|| email.clone()),
        };

        Ok(GuardDecision::Proceed(Session {
            email,
            greeting_name,
        }))
    }
}
