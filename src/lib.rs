pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod protocol;
pub mod server;
pub mod utils;

pub use auth::{CredentialVerifier, verify};
pub use config::ServerConfig;
pub use server::Server;
