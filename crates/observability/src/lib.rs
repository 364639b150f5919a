//! Logging and metrics for the inspection service
//!
//! ```ignore
//! use observability::{init_logging, LogFormat};
//!
//! init_logging("inspection-service", LogFormat::Pretty)?;
//! observability::init_metrics(9090)?;
//! ```

pub mod logging;
pub mod metrics;

pub use logging::{init_logging, LogFormat};
pub use metrics::{init_metrics, RequestMetricsGuard, ServerMetrics};
