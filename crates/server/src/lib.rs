//! HTTP server infrastructure for the inspection service
//!
//! # Architecture
//!
//! [`HttpServer`] implements the [`Server`] trait, which gives a consistent
//! interface for running and monitoring a server. [`ServerExt`] adds
//! `spawn()` and `run_with_ctrl_c()`.
//!
//! Shutdown uses `CancellationToken` from `tokio_util`. Cancelling a parent
//! token cancels every child token.
//!
//! # Quick Start
//!
//! ```ignore
//! use server::{HttpServer, ServerConfig, ServerExt};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::new("0.0.0.0", 8080);
//!     let server = HttpServer::new(config, router);
//!     server.run_with_ctrl_c().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! - [`config`] - Bind address
//! - [`traits`] - `Server` and `ServerExt` traits
//! - [`http`] - Axum server with request tracing and metrics
//! - [`middleware`] - Request metrics middleware
//! - [`health`] - Health endpoints and dependency probes
//! - [`shutdown`] - Graceful shutdown utilities

pub mod config;
pub mod error;
pub mod shutdown;
pub mod traits;

pub mod health;
pub mod http;
pub mod middleware;
pub mod port_validator;

pub use config::ServerConfig;
pub use error::{Result, ServerError};
pub use health::{health_routes, ConnectionStatus, HealthProbe, HealthState};
pub use http::HttpServer;
pub use port_validator::validate_ports_available;
pub use shutdown::ShutdownController;
pub use traits::{Server, ServerExt};
