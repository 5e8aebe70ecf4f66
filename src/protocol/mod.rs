//! Wire protocol implementation
//!
//! Handles request parsing, dispatch, and reply generation.

pub mod commands;
pub mod handlers;
pub mod responses;

pub use commands::{Command, CommandResult, CommandStatus, parse_command};
pub use handlers::{error_result, handle_command};
