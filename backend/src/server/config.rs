//! HTTP server configuration object and helpers.

use std::net::{IpAddr, SocketAddr};

use user_directory::outbound::persistence::DbPool;
use user_directory::settings::ServerSettings;

/// Everything [`super::create_server`] needs to start listening.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: DbPool,
}

impl ServerConfig {
    /// Construct a server configuration around an established pool.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, db_pool: DbPool) -> Self {
        Self { bind_addr, db_pool }
    }

    /// Resolve the bind address from loaded settings.
    ///
    /// # Errors
    /// Returns [`std::io::Error`] when the configured host is not an IP
    /// address.
    pub fn bind_addr_from(settings: &ServerSettings) -> std::io::Result<SocketAddr> {
        let host: IpAddr = settings.host().parse().map_err(|e| {
            std::io::Error::other(format!("invalid bind host {}: {e}", settings.host()))
        })?;
        Ok(SocketAddr::new(host, settings.port()))
    }
}
