//! Storage traits for transformers and inspections

use async_trait::async_trait;

use crate::error::InspectionResult;
use crate::types::{Inspection, NewInspection, Transformer};

/// Read access to transformers by business key
///
/// Transformer records are owned elsewhere; inspections only need to
/// resolve a transformer number to its surrogate id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TransformerStore: Send + Sync {
    /// Look up a transformer by its transformer number
    ///
    /// # Returns
    /// The transformer if found, None otherwise
    async fn find_by_transformer_no(&self, transformer_no: &str)
        -> InspectionResult<Option<Transformer>>;
}

/// InspectionStore trait - defines the interface for inspection storage
///
/// This trait allows different storage implementations (in-memory, PostgreSQL)
/// to be swapped without changing the handler logic.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InspectionStore: Send + Sync {
    /// Insert a new inspection
    ///
    /// # Returns
    /// The stored inspection with its id assigned
    async fn create(&self, inspection: NewInspection) -> InspectionResult<Inspection>;

    /// Get an inspection by id
    async fn get(&self, id: i64) -> InspectionResult<Option<Inspection>>;

    /// All inspections of a transformer, newest `inspected_at` first
    async fn list_by_transformer(&self, transformer_id: i64) -> InspectionResult<Vec<Inspection>>;

    /// Overwrite the mutable fields of an existing inspection
    ///
    /// # Returns
    /// The inspection as stored. Fails with `NotFound` if the row is gone.
    async fn update(&self, inspection: &Inspection) -> InspectionResult<Inspection>;

    /// Check whether an inspection exists
    async fn exists(&self, id: i64) -> InspectionResult<bool>;

    /// Remove an inspection. Removing a missing id is not an error.
    async fn delete(&self, id: i64) -> InspectionResult<()>;
}
