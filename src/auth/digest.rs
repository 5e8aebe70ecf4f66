//! Password digest
//!
//! Produces the textual digest stored in the credential file: the lowercase hex
//! encoding of the MD5 hash of the password's UTF-8 bytes.
//!
//! MD5 without a salt is a weak scheme. It is kept because existing credential
//! stores are written in this format; changing the algorithm invalidates them.

use md5::{Digest, Md5};

/// Length of a hex encoded MD5 digest.
pub const DIGEST_HEX_LEN: usize = 32;

/// Returns the hex encoded digest of `password`.
pub fn password_digest(password: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}
