//! API handlers for inspection HTTP endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::error;

use crate::api::models::*;
use crate::error::InspectionError;
use crate::manager::InspectionManager;

pub struct InspectionApiState {
    pub manager: Arc<InspectionManager>,
}

impl InspectionApiState {
    pub fn new(manager: Arc<InspectionManager>) -> Self {
        Self { manager }
    }
}

/// "Not found" is a bare 404; anything else is a 500 with a JSON body
fn error_response(err: InspectionError) -> Response {
    if err.is_not_found() {
        return StatusCode::NOT_FOUND.into_response();
    }

    error!(%err, "Inspection request failed");
    let code = match err {
        InspectionError::StorageError(_) => "STORAGE_ERROR",
        InspectionError::ConfigError(_) => "CONFIG_ERROR",
        InspectionError::TransformerNotFound(_) | InspectionError::NotFound(_) => "NOT_FOUND",
    };
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse::new(code, err.to_string())),
    )
        .into_response()
}

/// POST /api/transformers/{no}/inspections
pub async fn create_inspection(
    State(state): State<Arc<InspectionApiState>>,
    Path(transformer_no): Path<String>,
    Json(req): Json<CreateInspectionRequest>,
) -> Result<Json<InspectionResponse>, Response> {
    state
        .manager
        .create_inspection(&transformer_no, req)
        .await
        .map(|inspection| Json(InspectionResponse::from(inspection)))
        .map_err(error_response)
}

/// GET /api/transformers/{no}/inspections
pub async fn list_inspections(
    State(state): State<Arc<InspectionApiState>>,
    Path(transformer_no): Path<String>,
) -> Result<Json<Vec<InspectionResponse>>, Response> {
    let inspections = state
        .manager
        .list_inspections(&transformer_no)
        .await
        .map_err(error_response)?;

    Ok(Json(
        inspections.into_iter().map(InspectionResponse::from).collect(),
    ))
}

/// GET /api/inspections/{id}
pub async fn get_inspection(
    State(state): State<Arc<InspectionApiState>>,
    Path(id): Path<i64>,
) -> Result<Json<InspectionResponse>, Response> {
    match state.manager.get_inspection(id).await {
        Ok(Some(inspection)) => Ok(Json(InspectionResponse::from(inspection))),
        Ok(None) => Err(StatusCode::NOT_FOUND.into_response()),
        Err(e) => Err(error_response(e)),
    }
}

/// PATCH /api/inspections/{id}
pub async fn patch_inspection(
    State(state): State<Arc<InspectionApiState>>,
    Path(id): Path<i64>,
    Json(patch): Json<PatchInspectionRequest>,
) -> Result<Json<InspectionResponse>, Response> {
    state
        .manager
        .patch_inspection(id, &patch)
        .await
        .map(|inspection| Json(InspectionResponse::from(inspection)))
        .map_err(error_response)
}

/// DELETE /api/inspections/{id}
pub async fn delete_inspection(
    State(state): State<Arc<InspectionApiState>>,
    Path(id): Path<i64>,
) -> Result<StatusCode, Response> {
    state
        .manager
        .delete_inspection(id)
        .await
        .map(|()| StatusCode::NO_CONTENT)
        .map_err(error_response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[tokio::test]
    async fn test_not_found_has_empty_body() {
        let response = error_response(InspectionError::NotFound(3));
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn test_storage_error_is_json_500() {
        let response = error_response(InspectionError::StorageError("pool timed out".into()));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let parsed: ErrorResponse = serde_json::from_slice(&body).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.error.code, "STORAGE_ERROR");
        assert!(parsed.error.message.contains("pool timed out"));
    }
}
