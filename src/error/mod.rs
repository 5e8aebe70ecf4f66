//! Error handling
//!
//! Defines error types and handling for the service.

pub mod handlers;
pub mod types;

pub use types::*;
