//! Health endpoints
//!
//! `/health` is a cheap liveness check. `/health/detailed` runs every
//! registered [`HealthProbe`] and answers 503 if any dependency is down.

use async_trait::async_trait;
use axum::{extract::State, http::StatusCode, response::Json, routing::get, Router};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::warn;

/// Connection status of one dependency
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionStatus {
    pub service: String,
    pub address: String,
    pub connected: bool,
    pub latency_ms: Option<u64>,
    pub error: Option<String>,
}

/// A dependency check run on each detailed health request
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn check(&self) -> ConnectionStatus;
}

/// Shared state for the health endpoints
#[derive(Clone)]
pub struct HealthState {
    pub service_name: String,
    pub version: String,
    pub start_time: Instant,
    probes: Vec<Arc<dyn HealthProbe>>,
}

impl HealthState {
    pub fn new(service_name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            service_name: service_name.into(),
            version: version.into(),
            start_time: Instant::now(),
            probes: Vec::new(),
        }
    }

    /// Add a dependency check
    pub fn with_probe(mut self, probe: Arc<dyn HealthProbe>) -> Self {
        self.probes.push(probe);
        self
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Run every probe
    pub async fn check_connections(&self) -> Vec<ConnectionStatus> {
        let mut statuses = Vec::with_capacity(self.probes.len());
        for probe in &self.probes {
            let status = probe.check().await;
            if !status.connected {
                warn!(service = %status.service, error = ?status.error, "Health probe failed");
            }
            statuses.push(status);
        }
        statuses
    }
}

/// Liveness
pub async fn health_handler(State(state): State<Arc<HealthState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": state.service_name,
        "version": state.version,
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
    }))
}

/// Liveness plus dependency status
pub async fn detailed_health_handler(
    State(state): State<Arc<HealthState>>,
) -> (StatusCode, Json<Value>) {
    let connections = state.check_connections().await;

    let all_healthy = connections.iter().all(|c| c.connected);
    let status_code = if all_healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let health = json!({
        "status": if all_healthy { "healthy" } else { "degraded" },
        "service": state.service_name,
        "version": state.version,
        "timestamp": Utc::now().to_rfc3339(),
        "uptime_seconds": state.uptime_seconds(),
        "connections": connections,
        "healthy": all_healthy,
    });

    (status_code, Json(health))
}

pub fn health_routes(state: Arc<HealthState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/health/detailed", get(detailed_health_handler))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    struct FixedProbe(bool);

    #[async_trait]
    impl HealthProbe for FixedProbe {
        async fn check(&self) -> ConnectionStatus {
            ConnectionStatus {
                service: "storage".to_string(),
                address: "localhost:5432".to_string(),
                connected: self.0,
                latency_ms: Some(1),
                error: (!self.0).then(|| "connection refused".to_string()),
            }
        }
    }

    async fn get_json(router: Router, uri: &str) -> (StatusCode, Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_liveness() {
        let state = Arc::new(HealthState::new("inspection-service", "1.2.3"));
        let (status, body) = get_json(health_routes(state), "/health").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "inspection-service");
        assert_eq!(body["version"], "1.2.3");
        assert!(body["uptime_seconds"].is_u64());
    }

    #[tokio::test]
    async fn test_detailed_without_probes_is_healthy() {
        let state = Arc::new(HealthState::new("svc", "0.1.0"));
        let (status, body) = get_json(health_routes(state), "/health/detailed").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["healthy"], true);
        assert_eq!(body["connections"], json!([]));
    }

    #[tokio::test]
    async fn test_detailed_reports_storage_down() {
        let state = HealthState::new("svc", "0.1.0")
            .with_probe(Arc::new(FixedProbe(true)))
            .with_probe(Arc::new(FixedProbe(false)));
        let (status, body) = get_json(health_routes(Arc::new(state)), "/health/detailed").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["connections"].as_array().unwrap().len(), 2);
        assert_eq!(body["connections"][1]["error"], "connection refused");
    }
}
