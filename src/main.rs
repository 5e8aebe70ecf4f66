//! RAX credential verification service - Entry Point
//!
//! Answers USER/PASS and AUTH requests against a flat credential file.
//! Usage: `rax-auth-server [config.toml]`

use log::{error, info};
use std::path::Path;
use std::process::ExitCode;

use rax_auth_server::utils::logging::setup_logging;
use rax_auth_server::{Server, ServerConfig};

#[tokio::main]
async fn main() -> ExitCode {
    setup_logging();

    info!("Launching credential verification service...");

    let config = match std::env::args().nth(1) {
        Some(path) => ServerConfig::load_from(Path::new(&path)),
        None => ServerConfig::load(),
    };

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(e) => {
            error!("Server startup failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    server.start().await;
    ExitCode::SUCCESS
}
