//! Server core functionality
//!
//! Listener setup, connection admission, and the accept loop.

pub mod core;

pub use self::core::Server;
