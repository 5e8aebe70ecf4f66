//! Error handlers
//!
//! Logs errors and maps them onto protocol replies.

use crate::error::types::{AuthError, ProtocolError, ServerError};
use crate::protocol::responses::{
    BAD_SEQUENCE, LOCAL_ERROR, SERVICE_UNAVAILABLE, SYNTAX_ERROR, SYNTAX_ERROR_IN_ARGS,
    format_response,
};
use log::error;

/// Handle a server error
pub fn handle_error(err: &ServerError) {
    error!("Server error: {}", err);
}

/// Convert error to reply code
pub fn error_to_reply_code(err: &ServerError) -> u16 {
    match err {
        ServerError::Auth(AuthError::StoreUnavailable { .. }) => LOCAL_ERROR,
        ServerError::Auth(AuthError::MalformedInput(_)) => SYNTAX_ERROR_IN_ARGS,
        ServerError::Protocol(ProtocolError::RequestTooLong(_)) => SYNTAX_ERROR,
        ServerError::Protocol(ProtocolError::MissingArgument(_)) => SYNTAX_ERROR_IN_ARGS,
        ServerError::Protocol(ProtocolError::BadSequence(_)) => BAD_SEQUENCE,
        ServerError::Config(_) => SERVICE_UNAVAILABLE,
        ServerError::Io(_) => SERVICE_UNAVAILABLE,
    }
}

/// Full reply line for an error. Store paths and I/O details stay in the log.
pub fn error_reply(err: &ServerError) -> String {
    let text = match err {
        ServerError::Auth(AuthError::StoreUnavailable { .. }) => {
            "Credential store unavailable".to_string()
        }
        ServerError::Auth(AuthError::MalformedInput(msg)) => msg.clone(),
        ServerError::Protocol(ProtocolError::RequestTooLong(_)) => "Request too long".to_string(),
        ServerError::Protocol(ProtocolError::BadSequence(msg)) => msg.clone(),
        ServerError::Protocol(e) => e.to_string(),
        ServerError::Config(_) | ServerError::Io(_) => "Service not available".to_string(),
    };
    format_response(error_to_reply_code(err), &text)
}
