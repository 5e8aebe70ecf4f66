//! Authentication system
//!
//! Verifies user name and password pairs against the credential store.

pub mod credentials;
pub mod digest;
pub mod results;
pub mod validator;

pub use credentials::{CredentialRecord, CredentialRecords, CredentialStore, parse_record};
pub use digest::password_digest;
pub use results::{AuthenticationRequest, AuthenticationResult, VerifyOutcome};
pub use validator::{CredentialVerifier, validate_user_input, verify};
