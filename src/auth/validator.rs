//! Credential verifier
//!
//! Answers whether a `(user, password)` pair is present in the credential store.
//! The store is re-read on every call; the verifier keeps no state besides the
//! store path, so one instance can be shared freely between tasks.

use log::{error, info};
use std::path::{Path, PathBuf};

use super::credentials::CredentialStore;
use super::digest::password_digest;
use super::results::{AuthenticationRequest, AuthenticationResult, VerifyOutcome};
use crate::error::AuthError;

/// Verifies credentials against a flat credential file.
#[derive(Debug, Clone)]
pub struct CredentialVerifier {
    store: CredentialStore,
}

impl CredentialVerifier {
    pub fn new(store_path: impl Into<PathBuf>) -> Self {
        Self {
            store: CredentialStore::new(store_path),
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    /// Checks `user` and `password` against the store.
    ///
    /// Returns `Err(AuthError::StoreUnavailable)` when the store cannot be
    /// opened or read, never a negative verdict in that case.
    pub fn verify(&self, user: &str, password: &str) -> VerifyOutcome {
        let password_hash = password_digest(password);

        match self.find_match(user, &password_hash) {
            Ok(true) => {
                info!("User '{}' successfully authenticated", user);
                Ok(AuthenticationResult::granted())
            }
            Ok(false) => {
                info!("User '{}' failed authentication", user);
                Ok(AuthenticationResult::denied())
            }
            Err(e) => {
                error!("{}", e);
                Err(e)
            }
        }
    }

    /// Same as [`verify`](Self::verify), taking the request value.
    pub fn authenticate(&self, request: &AuthenticationRequest) -> VerifyOutcome {
        self.verify(&request.user, &request.pass)
    }

    fn find_match(&self, user: &str, password_hash: &str) -> Result<bool, AuthError> {
        for record in self.store.open()? {
            let record = record.map_err(|e| self.store.unavailable(e))?;
            if record.matches(user, password_hash) {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// One-shot verification against the store at `store_path`.
pub fn verify(user: &str, password: &str, store_path: &Path) -> VerifyOutcome {
    CredentialVerifier::new(store_path).verify(user, password)
}

/// Sanity check for a user name supplied by a client.
///
/// Names are whitespace free in the store, so a name that is empty, too long,
/// or carries whitespace or control characters can never match.
pub fn validate_user_input(username: &str, max_length: usize) -> Result<(), AuthError> {
    if username.is_empty() {
        return Err(AuthError::MalformedInput("Empty username".into()));
    }

    if username.len() > max_length {
        return Err(AuthError::MalformedInput(format!(
            "Username longer than {} bytes",
            max_length
        )));
    }

    if username.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(AuthError::MalformedInput(
            "Username contains whitespace or control characters".into(),
        ));
    }

    Ok(())
}
