//! Error types
//!
//! Defines domain-specific error types for each layer of the service.

use std::fmt;
use std::io;
use std::path::PathBuf;

/// Authentication module errors
#[derive(Debug)]
pub enum AuthError {
    /// The credential store could not be opened or read.
    StoreUnavailable { path: PathBuf, source: io::Error },
    /// A client supplied user name that can never match a store entry.
    MalformedInput(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::StoreUnavailable { path, source } => write!(
                f,
                "Could not read from credential store '{}': {}",
                path.display(),
                source
            ),
            AuthError::MalformedInput(s) => write!(f, "Malformed input: {}", s),
        }
    }
}

impl std::error::Error for AuthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuthError::StoreUnavailable { source, .. } => Some(source),
            AuthError::MalformedInput(_) => None,
        }
    }
}

/// Wire protocol errors
#[derive(Debug, PartialEq, Eq)]
pub enum ProtocolError {
    RequestTooLong(usize),
    MissingArgument(&'static str),
    BadSequence(String),
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolError::RequestTooLong(limit) => {
                write!(f, "Request too long (limit {} bytes)", limit)
            }
            ProtocolError::MissingArgument(name) => write!(f, "Missing argument: {}", name),
            ProtocolError::BadSequence(msg) => write!(f, "Bad sequence of commands: {}", msg),
        }
    }
}

impl std::error::Error for ProtocolError {}

/// General server error that encompasses all error types
#[derive(Debug)]
pub enum ServerError {
    Auth(AuthError),
    Protocol(ProtocolError),
    Config(config::ConfigError),
    Io(io::Error),
}

impl fmt::Display for ServerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServerError::Auth(e) => write!(f, "Authentication error: {}", e),
            ServerError::Protocol(e) => write!(f, "Protocol error: {}", e),
            ServerError::Config(e) => write!(f, "Configuration error: {}", e),
            ServerError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ServerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServerError::Auth(e) => Some(e),
            ServerError::Protocol(e) => Some(e),
            ServerError::Config(e) => Some(e),
            ServerError::Io(e) => Some(e),
        }
    }
}

impl From<AuthError> for ServerError {
    fn from(error: AuthError) -> Self {
        ServerError::Auth(error)
    }
}

impl From<ProtocolError> for ServerError {
    fn from(error: ProtocolError) -> Self {
        ServerError::Protocol(error)
    }
}

impl From<config::ConfigError> for ServerError {
    fn from(error: config::ConfigError) -> Self {
        ServerError::Config(error)
    }
}

impl From<io::Error> for ServerError {
    fn from(error: io::Error) -> Self {
        ServerError::Io(error)
    }
}
