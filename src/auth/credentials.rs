//! Credential storage
//!
//! Parses the flat credential file. Each line holds a user name and a password
//! digest separated by whitespace; anything after the second token is ignored.
//! A line with fewer than two tokens ends the store: nothing after it is read.

use log::debug;
use subtle::ConstantTimeEq;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use crate::error::AuthError;

/// A single `(user, digest)` entry of the credential store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CredentialRecord {
    pub user: String,
    pub password_hash: String,
}

impl CredentialRecord {
    /// Exact, case-sensitive match on both fields.
    ///
    /// The digest comparison runs in constant time.
    pub fn matches(&self, user: &str, password_hash: &str) -> bool {
        let hash_eq: bool = self
            .password_hash
            .as_bytes()
            .ct_eq(password_hash.as_bytes())
            .into();
        self.user == user && hash_eq
    }
}

/// Field separators: ASCII space, tab, line feed, vertical tab, form feed
/// and carriage return. Non-ASCII spaces are part of a token.
fn is_field_separator(c: char) -> bool {
    c.is_ascii_whitespace() || c == '\x0b'
}

/// Parses one store line. Returns `None` for a malformed line.
pub fn parse_record(line: &str) -> Option<CredentialRecord> {
    let mut tokens = line.split(is_field_separator).filter(|t| !t.is_empty());
    let user = tokens.next()?;
    let password_hash = tokens.next()?;

    Some(CredentialRecord {
        user: user.to_string(),
        password_hash: password_hash.to_string(),
    })
}

/// Iterator over the records of a credential store, in file order.
///
/// Ends at end of input or at the first malformed line. Read failures are
/// yielded once as `Err` and end the iteration.
pub struct CredentialRecords<R> {
    reader: R,
    buf: Vec<u8>,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> CredentialRecords<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            line_no: 0,
            done: false,
        }
    }
}

impl<R: BufRead> Iterator for CredentialRecords<R> {
    type Item = io::Result<CredentialRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => {
                self.done = true;
                None
            }
            Ok(_) => {
                self.line_no += 1;
                // Lossy so that a stray non UTF-8 byte only spoils its own line.
                let line = String::from_utf8_lossy(&self.buf);
                match parse_record(&line) {
                    Some(record) => Some(Ok(record)),
                    None => {
                        debug!(
                            "Malformed credential line {}, ignoring the rest of the store",
                            self.line_no
                        );
                        self.done = true;
                        None
                    }
                }
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Handle to the credential file. Holds only the path; every `open` reads
/// the file afresh so edits are picked up by the next lookup.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Opens the store for a single scan.
    pub fn open(&self) -> Result<CredentialRecords<BufReader<File>>, AuthError> {
        let file = File::open(&self.path).map_err(|e| self.unavailable(e))?;
        Ok(CredentialRecords::new(BufReader::new(file)))
    }

    /// Wraps an I/O failure on this store.
    pub fn unavailable(&self, source: io::Error) -> AuthError {
        AuthError::StoreUnavailable {
            path: self.path.clone(),
            source,
        }
    }
}
