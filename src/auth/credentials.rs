//! Credential Store
//!
//! User records keyed by email in a [`KeyValueStore`]. One record per email
//! key is the only uniqueness guarantee. Passwords are stored as Argon2 PHC
//! strings, never in plaintext.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;

use crate::store::{JsonStoreExt, KeyValueStore, StoreError, StoreResult};

/// A registered user as persisted under its email key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Errors from credential store operations
#[derive(Error, Debug)]
pub enum CredentialError {
    #[error("Email already registered: {0}")]
    AlreadyRegistered(String),

    #[error("Account not found: {0}")]
    AccountNotFound(String),

    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Password hashing failed")]
    PasswordHash,

    #[error("Store error: {0}")]
    Store(#[from] StoreError),
}

pub type CredentialResult<T> = Result<T, CredentialError>;

/// Email-keyed user records over any key/value backend
pub struct CredentialStore<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for CredentialStore<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: KeyValueStore + ?Sized> CredentialStore<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Look up the record stored under `email`
    pub fn get(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        self.store.get_json(email)
    }

    pub fn exists(&self, email: &str) -> CredentialResult<bool> {
        Ok(self.store.contains_key(email)?)
    }

    /// Create a record for `email`, hashing `password`.
    ///
    /// Fails with [`CredentialError::AlreadyRegistered`] if the key is taken.
    pub fn register(&self, name: &str, email: &str, password: &str) -> CredentialResult<UserRecord> {
        if self.exists(email)? {
            return Err(CredentialError::AlreadyRegistered(email.to_string()));
        }

        let record = UserRecord {
            name: name.to_string(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
        };

        self.store.set_json(email, &record)?;
        tracing::debug!(email = %email, "Stored user record");

        Ok(record)
    }

    /// Check `password` against the record for `email`
    pub fn verify(&self, email: &str, password: &str) -> CredentialResult<UserRecord> {
        let record = self
            .get(email)?
            .ok_or_else(|| CredentialError::AccountNotFound(email.to_string()))?;

        verify_password(password, &record.password_hash)?;
        Ok(record)
    }
}

fn hash_password(password: &str) -> CredentialResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| CredentialError::PasswordHash)
}

fn verify_password(password: &str, password_hash: &str) -> CredentialResult<()> {
    let parsed = PasswordHash::new(password_hash).map_err(|_| CredentialError::PasswordHash)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| CredentialError::IncorrectPassword)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn credentials() -> (Arc<MemoryStore>, CredentialStore<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        let credentials = CredentialStore::new(Arc::clone(&store));
        (store, credentials)
    }

    #[test]
    fn test_register_stores_under_email_key() {
        let (store, credentials) = credentials();
        let record = credentials
            .register("Asha", "asha@gmail.com", "Passw0rd!")
            .unwrap();

        assert_eq!(store.keys(), vec!["asha@gmail.com".to_string()]);
        assert_eq!(credentials.get("asha@gmail.com").unwrap(), Some(record));
    }

    #[test]
    fn test_plaintext_password_never_stored() {
        let (store, credentials) = credentials();
        credentials
            .register("Asha", "asha@gmail.com", "Passw0rd!")
            .unwrap();

        let raw = store.get_item("asha@gmail.com").unwrap().unwrap();
        assert!(!raw.contains("Passw0rd!"));
        assert!(raw.contains("$argon2"));
    }

    #[test]
    fn test_duplicate_register_conflicts() {
        let (_store, credentials) = credentials();
        credentials
            .register("Asha", "asha@gmail.com", "Passw0rd!")
            .unwrap();

        let err = credentials
            .register("Other", "asha@gmail.com", "Different1!")
            .unwrap_err();
        assert!(matches!(err, CredentialError::AlreadyRegistered(ref e) if e == "asha@gmail.com"));

        // Original record untouched
        let record = credentials.get("asha@gmail.com").unwrap().unwrap();
        assert_eq!(record.name, "Asha");
    }

    #[test]
    fn test_verify() {
        let (_store, credentials) = credentials();
        credentials
            .register("Asha", "asha@gmail.com", "Passw0rd!")
            .unwrap();

        assert!(credentials.verify("asha@gmail.com", "Passw0rd!").is_ok());
        assert!(matches!(
            credentials.verify("asha@gmail.com", "wrong"),
            Err(CredentialError::IncorrectPassword)
        ));
        assert!(matches!(
            credentials.verify("ravi@gmail.com", "Passw0rd!"),
            Err(CredentialError::AccountNotFound(_))
        ));
    }
}
