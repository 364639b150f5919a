//! Port availability checks
//!
//! Checking before binding is racy: another process can take the port in
//! between. These checks only give early feedback; the real bind decides.

use tokio::net::TcpListener;
use tracing::{debug, error, info, warn};

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};

/// Fail early if the configured HTTP port is taken.
///
/// Port 0 is skipped since the OS picks a free port at bind time.
pub async fn validate_ports_available(config: &ServerConfig) -> Result<()> {
    if config.http_port == 0 {
        debug!("Ephemeral HTTP port requested, skipping availability check");
        return Ok(());
    }

    validate_port_range(config.http_port);
    validate_single_port(&config.host, config.http_port, "HTTP").await?;

    info!("Server ports validated successfully");
    Ok(())
}

async fn validate_single_port(host: &str, port: u16, protocol: &str) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    debug!("Checking {} port {}", protocol, port);

    match TcpListener::bind(&addr).await {
        Ok(listener) => {
            let local_addr = listener
                .local_addr()
                .map_err(|e| ServerError::bind(addr.clone(), e))?;
            drop(listener);

            info!("{} port {} is available ({})", protocol, port, local_addr);
            Ok(())
        }
        Err(e) => {
            error!("{} port {} is NOT available: {}", protocol, port, e);
            Err(ServerError::port_in_use(port, e.to_string()))
        }
    }
}

/// Warn about privileged ports
fn validate_port_range(port: u16) {
    if port < 1024 {
        warn!(
            "Port {} is a privileged port (requires root/admin privileges)",
            port
        );
    }
}

/// True if binding `host:port` fails right now
pub async fn is_port_in_use(host: &str, port: u16) -> bool {
    let addr = format!("{}:{}", host, port);
    TcpListener::bind(&addr).await.is_err()
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use tokio_test::assert_ok;

    #[tokio::test]
    async fn test_is_port_in_use() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        assert!(is_port_in_use("127.0.0.1", port).await);

        drop(listener);
        assert!(!is_port_in_use("127.0.0.1", port).await);
    }

    #[tokio::test]
    async fn test_validate_taken_port() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();

        let result = validate_ports_available(&ServerConfig::new("127.0.0.1", port)).await;
        assert_matches!(result, Err(ServerError::PortInUse { port: p, .. }) if p == port);
    }

    #[tokio::test]
    async fn test_validate_ephemeral_port() {
        assert_ok!(validate_ports_available(&ServerConfig::new("127.0.0.1", 0)).await);
    }
}
