use log::{error, info, warn};
use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;

use crate::auth::CredentialVerifier;
use crate::client::handle_client;
use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::error::handlers::handle_error;
use crate::protocol::responses::{SERVICE_UNAVAILABLE, format_response};

pub struct Server {
    active_clients: Arc<Mutex<HashSet<SocketAddr>>>,
    listener: TcpListener,
    verifier: Arc<CredentialVerifier>,
    config: Arc<ServerConfig>,
}

impl Server {
    /// Validates the configuration and binds the request listener.
    ///
    /// The credential store is not opened here; it is read on every request.
    pub async fn bind(config: ServerConfig) -> Result<Self, ServerError> {
        config.validate()?;

        let socket = config.socket_address();
        let listener = match TcpListener::bind(&socket).await {
            Ok(listener) => listener,
            Err(e) => {
                error!("Failed to bind to {}: {}", socket, e);
                return Err(e.into());
            }
        };
        info!("Server bound to {}", listener.local_addr()?);

        let verifier = Arc::new(CredentialVerifier::new(config.credentials_path()));
        info!(
            "Using credential store '{}'",
            verifier.store().path().display()
        );

        Ok(Self {
            active_clients: Arc::new(Mutex::new(HashSet::new())),
            listener,
            verifier,
            config: Arc::new(config),
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the task is dropped.
    pub async fn start(&self) {
        info!(
            "Credential verification service started (max {} clients)",
            self.config.max_clients
        );

        loop {
            match self.listener.accept().await {
                Ok((stream, addr)) => {
                    let active_clients = Arc::clone(&self.active_clients);
                    let verifier = Arc::clone(&self.verifier);
                    let config = Arc::clone(&self.config);

                    // Spawn a task for each client so accept loop doesn't block
                    tokio::spawn(async move {
                        if let Err(e) =
                            handle_new_client(stream, addr, active_clients, verifier, config).await
                        {
                            warn!("Failed to handle client {}", addr);
                            handle_error(&e);
                        }
                    });
                }
                Err(e) => {
                    error!("Error accepting connection: {}", e);
                }
            }
        }
    }
}

/// Registers a new client, runs its session, and deregisters it afterwards.
async fn handle_new_client(
    mut stream: TcpStream,
    client_addr: SocketAddr,
    active_clients: Arc<Mutex<HashSet<SocketAddr>>>,
    verifier: Arc<CredentialVerifier>,
    config: Arc<ServerConfig>,
) -> Result<(), ServerError> {
    {
        let mut clients = active_clients.lock().await;

        if clients.len() >= config.max_clients {
            warn!(
                "Rejecting client {}: {} clients already connected",
                client_addr,
                clients.len()
            );
            drop(clients);
            stream
                .write_all(
                    format_response(SERVICE_UNAVAILABLE, "Too many connections, try again later")
                        .as_bytes(),
                )
                .await?;
            return Ok(()); // Close connection
        }

        clients.insert(client_addr);
        info!(
            "Accepted client: {} ({}/{} clients)",
            client_addr,
            clients.len(),
            config.max_clients
        );
    }

    let result = handle_client(stream, client_addr, verifier, config).await;

    active_clients.lock().await.remove(&client_addr);
    info!("Client {} disconnected", client_addr);

    result.map_err(ServerError::from)
}
