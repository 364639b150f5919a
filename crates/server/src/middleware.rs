//! Request metrics middleware

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use observability::{RequestMetricsGuard, ServerMetrics};

/// Record count, status and latency of every request.
///
/// Install with `axum::middleware::from_fn_with_state(metrics, track_metrics)`.
pub async fn track_metrics(
    State(metrics): State<ServerMetrics>,
    request: Request,
    next: Next,
) -> Response {
    let mut guard = RequestMetricsGuard::new(&metrics);
    let response = next.run(request).await;
    guard.set_status(response.status().as_u16());
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_passes_response_through() {
        let app = Router::new()
            .route("/teapot", get(|| async { StatusCode::IM_A_TEAPOT }))
            .layer(axum::middleware::from_fn_with_state(
                ServerMetrics::new("test"),
                track_metrics,
            ));

        let response = app
            .oneshot(Request::builder().uri("/teapot").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
