//! In-memory transformer and inspection stores

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use crate::error::{InspectionError, InspectionResult};
use crate::store::traits::{InspectionStore, TransformerStore};
use crate::types::{Inspection, NewInspection, Transformer};

/// In-memory transformer registry for development and testing
pub struct InMemoryTransformerStore {
    transformers: RwLock<HashMap<String, Transformer>>,
    next_id: AtomicI64,
}

impl InMemoryTransformerStore {
    /// Create an empty transformer store
    pub fn new() -> Self {
        Self {
            transformers: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Register a transformer number, returning the existing record if it
    /// is already known
    pub fn insert(&self, transformer_no: impl Into<String>) -> Transformer {
        let transformer_no = transformer_no.into();
        let mut transformers = self.transformers.write();
        transformers
            .entry(transformer_no.clone())
            .or_insert_with(|| {
                let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                Transformer::new(id, transformer_no)
            })
            .clone()
    }

    /// Number of registered transformers
    pub fn len(&self) -> usize {
        self.transformers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryTransformerStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransformerStore for InMemoryTransformerStore {
    async fn find_by_transformer_no(
        &self,
        transformer_no: &str,
    ) -> InspectionResult<Option<Transformer>> {
        Ok(self.transformers.read().get(transformer_no).cloned())
    }
}

/// In-memory inspection store for development and testing
pub struct InMemoryInspectionStore {
    inspections: RwLock<HashMap<i64, Inspection>>,
    next_id: AtomicI64,
}

impl InMemoryInspectionStore {
    /// Create an empty inspection store
    pub fn new() -> Self {
        Self {
            inspections: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }

    /// Number of stored inspections
    pub fn len(&self) -> usize {
        self.inspections.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for InMemoryInspectionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InspectionStore for InMemoryInspectionStore {
    async fn create(&self, inspection: NewInspection) -> InspectionResult<Inspection> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let inspection = Inspection::from_new(id, inspection);

        self.inspections.write().insert(id, inspection.clone());

        Ok(inspection)
    }

    async fn get(&self, id: i64) -> InspectionResult<Option<Inspection>> {
        Ok(self.inspections.read().get(&id).cloned())
    }

    async fn list_by_transformer(&self, transformer_id: i64) -> InspectionResult<Vec<Inspection>> {
        let mut result: Vec<Inspection> = self
            .inspections
            .read()
            .values()
            .filter(|i| i.transformer_id == transformer_id)
            .cloned()
            .collect();

        // Ties on inspected_at keep insertion (id) order
        result.sort_by_key(|i| i.id);
        result.sort_by(|a, b| b.inspected_at.cmp(&a.inspected_at));

        Ok(result)
    }

    async fn update(&self, inspection: &Inspection) -> InspectionResult<Inspection> {
        let mut inspections = self.inspections.write();

        match inspections.get_mut(&inspection.id) {
            Some(stored) => {
                *stored = inspection.clone();
                Ok(stored.clone())
            }
            None => Err(InspectionError::NotFound(inspection.id)),
        }
    }

    async fn exists(&self, id: i64) -> InspectionResult<bool> {
        Ok(self.inspections.read().contains_key(&id))
    }

    async fn delete(&self, id: i64) -> InspectionResult<()> {
        self.inspections.write().remove(&id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::InspectionStatus;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    fn new_inspection(transformer_id: i64, minutes_ago: i64) -> NewInspection {
        NewInspection {
            transformer_id,
            inspected_at: Utc::now() - Duration::minutes(minutes_ago),
            maintenance_at: None,
            status: InspectionStatus::InProgress,
            notes: None,
            starred: false,
        }
    }

    #[tokio::test]
    async fn test_transformer_insert_is_idempotent() {
        let store = InMemoryTransformerStore::new();
        let first = store.insert("TX-1");
        let again = store.insert("TX-1");
        let other = store.insert("TX-2");

        assert_eq!(first, again);
        assert_ne!(first.id, other.id);
        assert_eq!(store.len(), 2);

        let found = store.find_by_transformer_no("TX-2").await.unwrap();
        assert_eq!(found, Some(other));
        assert!(store.find_by_transformer_no("TX-3").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let store = InMemoryInspectionStore::new();

        let a = store.create(new_inspection(1, 0)).await.unwrap();
        let b = store.create(new_inspection(1, 0)).await.unwrap();
        assert_ne!(a.id, b.id);

        let retrieved = store.get(a.id).await.unwrap();
        assert_eq!(retrieved, Some(a));
        assert!(store.get(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_newest_first_per_transformer() {
        let store = InMemoryInspectionStore::new();

        let old = store.create(new_inspection(1, 60)).await.unwrap();
        let newest = store.create(new_inspection(1, 1)).await.unwrap();
        let middle = store.create(new_inspection(1, 30)).await.unwrap();
        store.create(new_inspection(2, 0)).await.unwrap();

        let ids: Vec<i64> = store
            .list_by_transformer(1)
            .await
            .unwrap()
            .into_iter()
            .map(|i| i.id)
            .collect();

        assert_eq!(ids, vec![newest.id, middle.id, old.id]);
        assert!(store.list_by_transformer(3).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let store = InMemoryInspectionStore::new();
        let mut inspection = store.create(new_inspection(1, 0)).await.unwrap();

        inspection.notes = Some("updated".to_string());
        let updated = store.update(&inspection).await.unwrap();
        assert_eq!(updated.notes.as_deref(), Some("updated"));

        store.delete(inspection.id).await.unwrap();
        assert_matches!(
            store.update(&inspection).await,
            Err(InspectionError::NotFound(id)) if id == inspection.id
        );
    }

    #[tokio::test]
    async fn test_exists_and_delete() {
        let store = InMemoryInspectionStore::new();
        let inspection = store.create(new_inspection(1, 0)).await.unwrap();

        assert!(store.exists(inspection.id).await.unwrap());
        store.delete(inspection.id).await.unwrap();
        assert!(!store.exists(inspection.id).await.unwrap());
        assert!(store.is_empty());

        // Deleting again is a no-op
        store.delete(inspection.id).await.unwrap();
    }
}
