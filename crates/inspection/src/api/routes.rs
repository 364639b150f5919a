//! Axum route definitions for the inspection API.

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{self, InspectionApiState};

/// Create all inspection routes.
///
/// # Routes
///
/// - `POST /api/transformers/{no}/inspections` - Create an inspection
/// - `GET /api/transformers/{no}/inspections` - List inspections, newest first
/// - `GET /api/inspections/{id}` - Get by id
/// - `PATCH /api/inspections/{id}` - Partial update
/// - `DELETE /api/inspections/{id}` - Delete
pub fn inspection_routes(state: Arc<InspectionApiState>) -> Router {
    Router::new()
        .route(
            "/api/transformers/:no/inspections",
            post(handlers::create_inspection).get(handlers::list_inspections),
        )
        .route(
            "/api/inspections/:id",
            get(handlers::get_inspection)
                .patch(handlers::patch_inspection)
                .delete(handlers::delete_inspection),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::models::InspectionResponse;
    use crate::manager::InspectionManager;
    use crate::store::memory::{InMemoryInspectionStore, InMemoryTransformerStore};
    use crate::types::InspectionStatus;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router {
        let transformers = Arc::new(InMemoryTransformerStore::new());
        transformers.insert("TX-1001");
        transformers.insert("TX-2002");
        let manager = InspectionManager::new(transformers, Arc::new(InMemoryInspectionStore::new()));
        inspection_routes(Arc::new(InspectionApiState::new(Arc::new(manager))))
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> Response {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .unwrap();

        app.clone().oneshot(request).await.unwrap()
    }

    async fn read_json<T: serde::de::DeserializeOwned>(response: Response) -> T {
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn create(app: &Router, transformer_no: &str, body: Value) -> InspectionResponse {
        let uri = format!("/api/transformers/{}/inspections", transformer_no);
        let response = send(app, "POST", &uri, Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        read_json(response).await
    }

    async fn patch(app: &Router, id: i64, body: Value) -> InspectionResponse {
        let response = send(app, "PATCH", &format!("/api/inspections/{}", id), Some(body)).await;
        assert_eq!(response.status(), StatusCode::OK);
        read_json(response).await
    }

    #[tokio::test]
    async fn test_create_with_empty_body() {
        let app = app();
        let response = send(&app, "POST", "/api/transformers/TX-1001/inspections", Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body: Value = read_json(response).await;
        assert!(body["id"].as_i64().is_some());
        assert!(body["transformerId"].as_i64().is_some());
        assert!(body["inspectedAt"].is_string());
        assert_eq!(body["maintenanceAt"], Value::Null);
        assert_eq!(body["status"], "IN_PROGRESS");
        assert_eq!(body["notes"], Value::Null);
        assert_eq!(body["starred"], false);
    }

    #[tokio::test]
    async fn test_create_unknown_transformer() {
        let app = app();
        let response = send(&app, "POST", "/api/transformers/NOPE/inspections", Some(json!({}))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());

        // Nothing was persisted for the known transformers either
        let listed = send(&app, "GET", "/api/transformers/TX-1001/inspections", None).await;
        let listed: Vec<InspectionResponse> = read_json(listed).await;
        assert!(listed.is_empty());
    }

    #[tokio::test]
    async fn test_create_rejects_mistyped_body() {
        let app = app();
        let response = send(
            &app,
            "POST",
            "/api/transformers/TX-1001/inspections",
            Some(json!({ "starred": "yes" })),
        )
        .await;
        assert!(response.status().is_client_error());

        let response = send(
            &app,
            "POST",
            "/api/transformers/TX-1001/inspections",
            Some(json!({ "status": "bogus" })),
        )
        .await;
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let app = app();
        let older = create(&app, "TX-1001", json!({ "inspectedAt": "2025-01-01T08:00:00Z" })).await;
        let newer = create(&app, "TX-1001", json!({ "inspectedAt": "2025-03-01T08:00:00Z" })).await;
        create(&app, "TX-2002", json!({})).await;

        let response = send(&app, "GET", "/api/transformers/TX-1001/inspections", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let listed: Vec<InspectionResponse> = read_json(response).await;
        assert_eq!(listed, vec![newer, older]);

        let response = send(&app, "GET", "/api/transformers/TX-9999/inspections", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_get_one() {
        let app = app();
        let created = create(&app, "TX-1001", json!({ "notes": "baseline" })).await;

        let response = send(&app, "GET", &format!("/api/inspections/{}", created.id), None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let fetched: InspectionResponse = read_json(response).await;
        assert_eq!(fetched, created);

        let response = send(&app, "GET", "/api/inspections/424242", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_status() {
        let app = app();
        let created = create(&app, "TX-1001", json!({})).await;

        let updated = patch(&app, created.id, json!({ "status": "completed" })).await;
        assert_eq!(updated.status, InspectionStatus::Completed);

        let unchanged = patch(&app, created.id, json!({ "status": "bogus" })).await;
        assert_eq!(unchanged.status, InspectionStatus::Completed);
    }

    #[tokio::test]
    async fn test_patch_maintenance_date() {
        let app = app();
        let created = create(
            &app,
            "TX-1001",
            json!({ "maintenanceDate": "2025-04-01T00:00:00Z" }),
        )
        .await;
        assert!(created.maintenance_at.is_some());

        let kept = patch(&app, created.id, json!({ "maintenanceDate": "not-a-date" })).await;
        assert_eq!(kept.maintenance_at, created.maintenance_at);

        let cleared = patch(&app, created.id, json!({ "maintenanceDate": "" })).await;
        assert_eq!(cleared.maintenance_at, None);
    }

    #[tokio::test]
    async fn test_patch_starred() {
        let app = app();
        let created = create(&app, "TX-1001", json!({ "starred": true })).await;
        assert!(created.starred);

        let updated = patch(&app, created.id, json!({ "starred": "yes" })).await;
        assert!(!updated.starred);

        let updated = patch(&app, created.id, json!({ "starred": "true" })).await;
        assert!(updated.starred);
    }

    #[tokio::test]
    async fn test_patch_leaves_absent_fields() {
        let app = app();
        let created = create(
            &app,
            "TX-1001",
            json!({ "notes": "keep me", "maintenanceDate": "2025-04-01T00:00:00Z" }),
        )
        .await;

        let updated = patch(&app, created.id, json!({ "starred": true })).await;
        assert_eq!(updated.notes.as_deref(), Some("keep me"));
        assert_eq!(updated.maintenance_at, created.maintenance_at);
        assert_eq!(updated.inspected_at, created.inspected_at);
        assert_eq!(updated.transformer_id, created.transformer_id);
    }

    #[tokio::test]
    async fn test_patch_unknown_id() {
        let app = app();
        let response = send(&app, "PATCH", "/api/inspections/77", Some(json!({ "notes": "x" }))).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_delete() {
        let app = app();
        let created = create(&app, "TX-1001", json!({})).await;
        let uri = format!("/api/inspections/{}", created.id);

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());

        let response = send(&app, "GET", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, "DELETE", &uri, None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
