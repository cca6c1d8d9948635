use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;
use axum::Json;

use backend_application::queries::{readiness, ReadinessReport};
use backend_application::AppState;

pub async fn health_live() -> StatusCode {
    StatusCode::OK
}

pub async fn health_ready(State(state): State<AppState>) -> Json<ReadinessReport> {
    Json(readiness(&state))
}

pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let payload = state.metrics.render_prometheus();
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    (headers, payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixture_state;

    #[tokio::test]
    async fn ready_reports_artifact_identity() {
        let Json(report) = health_ready(State(fixture_state())).await;
        assert_eq!(report.status, "ready");
        assert_eq!(report.backend, "json-isolation-forest");
        assert_eq!(report.dataset_rows, 12);
    }

    #[tokio::test]
    async fn metrics_are_plain_text() {
        let response = metrics_prometheus(State(fixture_state())).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4; charset=utf-8"
        );
    }
}
