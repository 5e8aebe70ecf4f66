//! Module `session`
//!
//! Per-connection state. Only the user named by the last USER command is
//! kept, until the next PASS consumes it; verdicts are never remembered.

use std::net::SocketAddr;

#[derive(Debug, Default)]
pub struct Session {
    client_addr: Option<SocketAddr>,
    pending_user: Option<String>,
}

impl Session {
    pub fn new(client_addr: SocketAddr) -> Self {
        Self {
            client_addr: Some(client_addr),
            pending_user: None,
        }
    }

    /// Returns the client's socket address if known.
    pub fn client_addr(&self) -> Option<&SocketAddr> {
        self.client_addr.as_ref()
    }

    /// Returns the user awaiting a PASS command, if any.
    pub fn pending_user(&self) -> Option<&str> {
        self.pending_user.as_deref()
    }

    pub fn set_pending_user(&mut self, user: Option<String>) {
        self.pending_user = user;
    }

    /// Removes and returns the pending user.
    pub fn take_pending_user(&mut self) -> Option<String> {
        self.pending_user.take()
    }
}
