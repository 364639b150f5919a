//! Inspection domain types
//!
//! This module defines the core domain types for transformer inspections.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Inspection workflow status
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InspectionStatus {
    /// Inspection started, not yet finished
    #[default]
    InProgress,
    /// Waiting on follow-up work
    Pending,
    /// Inspection finished
    Completed,
}

impl InspectionStatus {
    /// All statuses, in declaration order
    pub const ALL: [InspectionStatus; 3] = [
        InspectionStatus::InProgress,
        InspectionStatus::Pending,
        InspectionStatus::Completed,
    ];

    /// Canonical name, also used as the stored database value
    pub fn as_db_str(&self) -> &'static str {
        match self {
            InspectionStatus::InProgress => "IN_PROGRESS",
            InspectionStatus::Pending => "PENDING",
            InspectionStatus::Completed => "COMPLETED",
        }
    }

    /// Parse the canonical name. Matching is exact; callers normalize first.
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|status| status.as_db_str() == s)
    }
}

impl std::fmt::Display for InspectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_db_str())
    }
}

impl std::str::FromStr for InspectionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::from_db_str(s).ok_or_else(|| format!("unknown inspection status: {}", s))
    }
}

/// A transformer, as far as inspections are concerned
///
/// Only the surrogate id and the business key are visible here; everything
/// else about a transformer is owned elsewhere.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformer {
    /// Surrogate key referenced by inspections
    pub id: i64,
    /// Unique business code, e.g. `TX-1001`
    pub transformer_no: String,
}

impl Transformer {
    pub fn new(id: i64, transformer_no: impl Into<String>) -> Self {
        Self {
            id,
            transformer_no: transformer_no.into(),
        }
    }
}

/// An inspection that has not been persisted yet
#[derive(Debug, Clone, PartialEq)]
pub struct NewInspection {
    pub transformer_id: i64,
    pub inspected_at: DateTime<Utc>,
    pub maintenance_at: Option<DateTime<Utc>>,
    pub status: InspectionStatus,
    pub notes: Option<String>,
    pub starred: bool,
}

/// A stored inspection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Inspection {
    /// System-assigned identifier
    pub id: i64,
    /// Owning transformer; fixed at creation
    pub transformer_id: i64,
    /// When the inspection took place
    pub inspected_at: DateTime<Utc>,
    /// Scheduled or completed maintenance, if any
    pub maintenance_at: Option<DateTime<Utc>>,
    /// Workflow status
    pub status: InspectionStatus,
    /// Free-text notes
    pub notes: Option<String>,
    /// Flagged by a user
    pub starred: bool,
}

impl Inspection {
    /// Materialize a new inspection under an assigned id
    pub fn from_new(id: i64, new: NewInspection) -> Self {
        Self {
            id,
            transformer_id: new.transformer_id,
            inspected_at: new.inspected_at,
            maintenance_at: new.maintenance_at,
            status: new.status,
            notes: new.notes,
            starred: new.starred,
        }
    }
}
