//! Authentication request and result types
//!
//! Defines the values exchanged with callers of the verifier.

use std::fmt;

use crate::error::AuthError;

/// A claimed identity: user name and plaintext password.
///
/// The password is transient. `Debug` output redacts it.
#[derive(Clone)]
pub struct AuthenticationRequest {
    pub user: String,
    pub pass: String,
}

impl AuthenticationRequest {
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }
}

impl fmt::Debug for AuthenticationRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthenticationRequest")
            .field("user", &self.user)
            .field("pass", &"<redacted>")
            .finish()
    }
}

/// Verdict for a well-formed lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticationResult {
    pub authenticated: bool,
}

impl AuthenticationResult {
    pub fn granted() -> Self {
        Self {
            authenticated: true,
        }
    }

    pub fn denied() -> Self {
        Self {
            authenticated: false,
        }
    }
}

/// Outcome of one verification: a verdict, or the store could not be read.
pub type VerifyOutcome = Result<AuthenticationResult, AuthError>;
