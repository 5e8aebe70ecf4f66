//! Client connection handling
//!
//! Per-connection session state and the request loop.

pub mod handler;
pub mod session;

pub use handler::handle_client;
pub use session::Session;
