//! HTTP API for inspections.
//!
//! ## Modules
//!
//! - `handlers` - Axum handlers delegating to [`InspectionManager`](crate::InspectionManager)
//! - `routes` - Router with the `/api` paths
//! - `models` - Request/response types

pub mod handlers;
pub mod models;
pub mod routes;

pub use handlers::InspectionApiState;
pub use routes::inspection_routes;
