//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use super::settings::SessionSettings;
use super::state_builders::Adapters;

/// Everything [`super::create_server`] needs, resolved before binding.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) adapters: Adapters,
}

impl ServerConfig {
    /// Combine resolved session settings with the outbound adapters every
    /// worker shares.
    #[must_use]
    pub(crate) fn new(session: SessionSettings, bind_addr: SocketAddr, adapters: Adapters) -> Self {
        Self {
            session,
            bind_addr,
            adapters,
        }
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
