//! Server bind configuration

use crate::error::{Result, ServerError};
use std::net::SocketAddr;

/// Default HTTP port
pub const DEFAULT_HTTP_PORT: u16 = 8080;

/// Address the HTTP server binds to
///
/// ```
/// use server::config::ServerConfig;
///
/// let config = ServerConfig::new("127.0.0.1", 8080);
/// assert_eq!(config.http_addr().unwrap().port(), 8080);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Host to bind to (e.g., "0.0.0.0" or "127.0.0.1")
    pub host: String,
    /// HTTP port; 0 asks the OS for an ephemeral port
    pub http_port: u16,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, http_port: u16) -> Self {
        Self {
            host: host.into(),
            http_port,
        }
    }

    /// Parse host and port into a socket address
    pub fn http_addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.http_port)
            .parse()
            .map_err(|_| ServerError::InvalidAddress(format!("{}:{}", self.host, self.http_port)))
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::new("0.0.0.0", DEFAULT_HTTP_PORT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn test_default() {
        let config = ServerConfig::default();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.http_port, 8080);
    }

    #[test]
    fn test_http_addr() {
        let config = ServerConfig::new("127.0.0.1", 9000);
        assert_eq!(config.http_addr().unwrap().to_string(), "127.0.0.1:9000");
    }

    #[test]
    fn test_invalid_host() {
        let config = ServerConfig::new("not a host", 8080);
        assert_matches!(config.http_addr(), Err(ServerError::InvalidAddress(addr)) if addr == "not a host:8080");
    }
}
