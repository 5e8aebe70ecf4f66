//! Reply handling
//!
//! Defines reply codes and formatting.

/// Reply codes
pub const OK: u16 = 200;
pub const CLOSING: u16 = 221;
pub const READY: u16 = 220;
pub const AUTHENTICATED: u16 = 230;
pub const PASSWORD_REQUIRED: u16 = 331;
pub const SERVICE_UNAVAILABLE: u16 = 421;
pub const LOCAL_ERROR: u16 = 451;
pub const SYNTAX_ERROR: u16 = 500;
pub const SYNTAX_ERROR_IN_ARGS: u16 = 501;
pub const BAD_SEQUENCE: u16 = 503;
pub const AUTH_FAILED: u16 = 530;

/// Format a reply line
pub fn format_response(code: u16, message: &str) -> String {
    format!("{} {}\r\n", code, message)
}
