//! Module `commands`
//!
//! Defines the request parsing logic and the data structures used to
//! represent commands, their status, and results.

use std::fmt;

use crate::error::ProtocolError;

/// A request parsed from a client line.
///
/// Commands that carry a password redact it in their `Debug` output, so a
/// command can be logged as-is.
#[derive(PartialEq)]
pub enum Command {
    USER(String),         // Claimed user name
    PASS(String),         // Password for the pending user
    AUTH(String, String), // User name and password in one request
    NOOP,
    QUIT,
    UNKNOWN(String),
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::USER(user) => write!(f, "USER({:?})", user),
            Command::PASS(_) => write!(f, "PASS(<redacted>)"),
            Command::AUTH(user, _) => write!(f, "AUTH({:?}, <redacted>)", user),
            Command::NOOP => write!(f, "NOOP"),
            Command::QUIT => write!(f, "QUIT"),
            Command::UNKNOWN(verb) => write!(f, "UNKNOWN({:?})", verb),
        }
    }
}

/// Represents the outcome status of executing a command.
#[derive(Debug, PartialEq)]
pub enum CommandStatus {
    Success,
    Failure(String),
    CloseConnection,
}

/// Struct encapsulating the full result of a command execution.
#[derive(Debug)]
pub struct CommandResult {
    pub status: CommandStatus,
    pub message: Option<String>,
}

/// Parses one request line into a `Command`.
///
/// The verb is case-insensitive. A password runs from just after the single
/// separator to the end of the line, so it keeps inner and trailing spaces;
/// only the line terminator is removed.
pub fn parse_command(raw: &str) -> Result<Command, ProtocolError> {
    let line = raw.trim_end_matches(['\r', '\n']).trim_start();
    let (verb, arg) = match line.split_once(char::is_whitespace) {
        Some((verb, arg)) => (verb, Some(arg)),
        None => (line, None),
    };

    match verb.to_ascii_uppercase().as_str() {
        "USER" => match arg.map(str::trim) {
            Some(user) if !user.is_empty() => Ok(Command::USER(user.to_string())),
            _ => Err(ProtocolError::MissingArgument("user")),
        },
        "PASS" => match arg {
            Some(pass) => Ok(Command::PASS(pass.to_string())),
            None => Err(ProtocolError::MissingArgument("password")),
        },
        "AUTH" => {
            let rest = arg.map(str::trim_start).unwrap_or("");
            if rest.is_empty() {
                return Err(ProtocolError::MissingArgument("user"));
            }
            match rest.split_once(char::is_whitespace) {
                Some((user, pass)) => Ok(Command::AUTH(user.to_string(), pass.to_string())),
                None => Err(ProtocolError::MissingArgument("password")),
            }
        }
        "NOOP" => Ok(Command::NOOP),
        "QUIT" => Ok(Command::QUIT),
        _ => Ok(Command::UNKNOWN(verb.to_string())),
    }
}
