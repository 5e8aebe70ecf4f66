//! Command handlers module for the RAX credential verification service.
//!
//! Each handler turns one parsed request into a reply, consulting the
//! credential verifier for PASS and AUTH.

use log::{info, warn};

use crate::auth::{self, CredentialVerifier};
use crate::client::Session;
use crate::config::ServerConfig;
use crate::error::handlers::error_reply;
use crate::error::{ProtocolError, ServerError};
use crate::protocol::responses::{
    AUTH_FAILED, AUTHENTICATED, CLOSING, OK, PASSWORD_REQUIRED, SYNTAX_ERROR, format_response,
};
use crate::protocol::{Command, CommandResult, CommandStatus};

/// Dispatches a received command to its corresponding handler.
///
/// # Arguments
///
/// * `session` - Mutable reference to the connection's session state.
/// * `command` - Reference to the parsed command.
/// * `verifier` - Credential verifier bound to the configured store.
/// * `config` - Service configuration.
///
/// # Returns
///
/// * `CommandResult` - Result of the command execution, including status and reply.
pub fn handle_command(
    session: &mut Session,
    command: &Command,
    verifier: &CredentialVerifier,
    config: &ServerConfig,
) -> CommandResult {
    match command {
        Command::USER(username) => handle_cmd_user(session, username, config),
        Command::PASS(password) => handle_cmd_pass(session, password, verifier),
        Command::AUTH(username, password) => {
            handle_cmd_auth(session, username, password, verifier, config)
        }
        Command::NOOP => handle_cmd_noop(),
        Command::QUIT => handle_cmd_quit(session),
        Command::UNKNOWN(verb) => handle_cmd_unknown(verb),
    }
}

/// Builds the failure result for an error.
pub fn error_result(err: ServerError) -> CommandResult {
    CommandResult {
        message: Some(error_reply(&err)),
        status: CommandStatus::Failure(err.to_string()),
    }
}

/// Handles the USER command: checks the name and remembers it for the next PASS.
fn handle_cmd_user(session: &mut Session, username: &str, config: &ServerConfig) -> CommandResult {
    if let Err(e) = auth::validate_user_input(username, config.max_username_length) {
        session.set_pending_user(None);
        return error_result(e.into());
    }

    session.set_pending_user(Some(username.to_string()));
    CommandResult {
        status: CommandStatus::Success,
        message: Some(format_response(
            PASSWORD_REQUIRED,
            &format!("Password required for {}", username),
        )),
    }
}

/// Handles the PASS command: verifies the pending user with the given password.
///
/// The pending user is consumed whatever the outcome.
fn handle_cmd_pass(
    session: &mut Session,
    password: &str,
    verifier: &CredentialVerifier,
) -> CommandResult {
    match session.take_pending_user() {
        Some(username) => verify_credentials(&username, password, verifier),
        None => error_result(ProtocolError::BadSequence("Send USER first".into()).into()),
    }
}

/// Handles the AUTH command: user name and password in a single request.
fn handle_cmd_auth(
    session: &mut Session,
    username: &str,
    password: &str,
    verifier: &CredentialVerifier,
    config: &ServerConfig,
) -> CommandResult {
    session.set_pending_user(None);

    if let Err(e) = auth::validate_user_input(username, config.max_username_length) {
        return error_result(e.into());
    }

    verify_credentials(username, password, verifier)
}

fn verify_credentials(
    username: &str,
    password: &str,
    verifier: &CredentialVerifier,
) -> CommandResult {
    match verifier.verify(username, password) {
        Ok(result) if result.authenticated => CommandResult {
            status: CommandStatus::Success,
            message: Some(format_response(
                AUTHENTICATED,
                &format!("User {} authenticated", username),
            )),
        },
        Ok(_) => CommandResult {
            status: CommandStatus::Failure(format!("Authentication failed for {}", username)),
            message: Some(format_response(AUTH_FAILED, "Authentication failed")),
        },
        Err(e) => error_result(e.into()),
    }
}

fn handle_cmd_noop() -> CommandResult {
    CommandResult {
        status: CommandStatus::Success,
        message: Some(format_response(OK, "OK")),
    }
}

/// Handles the QUIT command: forgets any pending user and signals connection close.
fn handle_cmd_quit(session: &mut Session) -> CommandResult {
    session.set_pending_user(None);
    info!(
        "Client {} requested to quit",
        session
            .client_addr()
            .map(|addr| addr.to_string())
            .unwrap_or_else(|| "unknown".to_string())
    );

    CommandResult {
        status: CommandStatus::CloseConnection,
        message: Some(format_response(CLOSING, "Goodbye")),
    }
}

fn handle_cmd_unknown(verb: &str) -> CommandResult {
    warn!("Unknown command received: {:?}", verb);
    CommandResult {
        status: CommandStatus::Failure(format!("Unknown command {}", verb)),
        message: Some(format_response(SYNTAX_ERROR, "Unknown command")),
    }
}
