//! Inspection Manager - request handling between the HTTP layer and storage

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::error::{InspectionError, InspectionResult};
use crate::patch::{deserialize_opt_instant, InspectionPatch};
use crate::store::traits::{InspectionStore, TransformerStore};
use crate::types::{Inspection, InspectionStatus, NewInspection, Transformer};

/// Body of `POST /api/transformers/{no}/inspections`
///
/// Every field is optional. Type errors (an unknown status name, a
/// non-boolean `starred`) are rejected by the JSON extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInspection {
    #[serde(default, deserialize_with = "deserialize_opt_instant")]
    pub inspected_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "deserialize_opt_instant")]
    pub maintenance_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub status: Option<InspectionStatus>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub starred: Option<bool>,
}

impl CreateInspection {
    /// Fill in defaults for a transformer
    pub fn into_new(self, transformer: &Transformer) -> NewInspection {
        NewInspection {
            transformer_id: transformer.id,
            inspected_at: self.inspected_at.unwrap_or_else(Utc::now),
            maintenance_at: self.maintenance_date,
            status: self.status.unwrap_or_default(),
            notes: self.notes,
            starred: self.starred == Some(true),
        }
    }
}

/// Inspection Manager - handles the inspection resource lifecycle
pub struct InspectionManager {
    transformer_store: Arc<dyn TransformerStore>,
    inspection_store: Arc<dyn InspectionStore>,
}

impl InspectionManager {
    /// Create a new InspectionManager
    pub fn new(
        transformer_store: Arc<dyn TransformerStore>,
        inspection_store: Arc<dyn InspectionStore>,
    ) -> Self {
        Self {
            transformer_store,
            inspection_store,
        }
    }

    async fn resolve_transformer(&self, transformer_no: &str) -> InspectionResult<Transformer> {
        match self.transformer_store.find_by_transformer_no(transformer_no).await? {
            Some(transformer) => Ok(transformer),
            None => {
                warn!(transformer_no, "Transformer not found");
                Err(InspectionError::TransformerNotFound(transformer_no.to_string()))
            }
        }
    }

    /// Create an inspection for the transformer with the given number
    pub async fn create_inspection(
        &self,
        transformer_no: &str,
        request: CreateInspection,
    ) -> InspectionResult<Inspection> {
        let transformer = self.resolve_transformer(transformer_no).await?;

        let inspection = self
            .inspection_store
            .create(request.into_new(&transformer))
            .await?;

        info!(
            id = inspection.id,
            transformer_no,
            status = %inspection.status,
            "Created inspection"
        );

        Ok(inspection)
    }

    /// All inspections of a transformer, newest first
    pub async fn list_inspections(&self, transformer_no: &str) -> InspectionResult<Vec<Inspection>> {
        let transformer = self.resolve_transformer(transformer_no).await?;

        let inspections = self
            .inspection_store
            .list_by_transformer(transformer.id)
            .await?;

        debug!(transformer_no, count = inspections.len(), "Listed inspections");
        Ok(inspections)
    }

    /// Get an inspection by id
    pub async fn get_inspection(&self, id: i64) -> InspectionResult<Option<Inspection>> {
        debug!(id, "Getting inspection");
        self.inspection_store.get(id).await
    }

    /// Apply a partial update
    pub async fn patch_inspection(
        &self,
        id: i64,
        patch: &InspectionPatch,
    ) -> InspectionResult<Inspection> {
        let mut inspection = self
            .inspection_store
            .get(id)
            .await?
            .ok_or(InspectionError::NotFound(id))?;

        patch.apply(&mut inspection);
        debug!(id, keys = ?patch.present_keys(), "Patching inspection");

        self.inspection_store.update(&inspection).await
    }

    /// Delete an inspection
    pub async fn delete_inspection(&self, id: i64) -> InspectionResult<()> {
        if !self.inspection_store.exists(id).await? {
            warn!(id, "Inspection not found for delete");
            return Err(InspectionError::NotFound(id));
        }

        self.inspection_store.delete(id).await?;
        info!(id, "Deleted inspection");
        Ok(())
    }
}
