//! Transformer inspection records
//!
//! This crate owns the inspection resource: creating, listing, reading,
//! partially updating and deleting inspections that belong to a transformer.
//!
//! # Features
//!
//! - Inspection creation with field defaulting
//! - Newest-first listing per transformer
//! - Tolerant partial updates from untyped JSON bodies
//! - Hard deletes
//!
//! # Feature Flags
//!
//! - `postgres` - Enable PostgreSQL storage
//! - `api` - Enable HTTP API

pub mod types;
pub mod error;
pub mod patch;
pub mod store;
pub mod manager;

#[cfg(feature = "api")]
pub mod api;

// Re-export commonly used types
pub use types::{Inspection, InspectionStatus, NewInspection, Transformer};
pub use error::{InspectionError, InspectionResult};
pub use patch::{Field, InspectionPatch};
pub use manager::{CreateInspection, InspectionManager};

// Store exports
pub use store::traits::{InspectionStore, TransformerStore};
pub use store::memory::{InMemoryInspectionStore, InMemoryTransformerStore};

#[cfg(feature = "postgres")]
pub use store::postgres::{PostgresInspectionStore, PostgresTransformerStore};
