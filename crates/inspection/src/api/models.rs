//! API models for inspection HTTP endpoints

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Inspection, InspectionStatus};

pub use crate::manager::CreateInspection as CreateInspectionRequest;
pub use crate::patch::InspectionPatch as PatchInspectionRequest;

/// Single inspection in API responses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResponse {
    pub id: i64,
    pub transformer_id: i64,
    pub inspected_at: DateTime<Utc>,
    pub maintenance_at: Option<DateTime<Utc>>,
    pub status: InspectionStatus,
    pub notes: Option<String>,
    pub starred: bool,
}

impl From<Inspection> for InspectionResponse {
    fn from(inspection: Inspection) -> Self {
        Self {
            id: inspection.id,
            transformer_id: inspection.transformer_id,
            inspected_at: inspection.inspected_at,
            maintenance_at: inspection.maintenance_at,
            status: inspection.status,
            notes: inspection.notes,
            starred: inspection.starred,
        }
    }
}

/// Error response body for failures other than "not found"
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ErrorDetail {
                code: code.into(),
                message: message.into(),
            },
        }
    }
}
