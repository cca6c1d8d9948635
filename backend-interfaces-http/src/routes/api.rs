use axum::routing::{get, post};
use axum::Router;

use backend_application::AppState;

use crate::handlers::{ops_handlers, scoring_handlers, transaction_handlers};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(scoring_handlers::predict))
        .route("/predict_batch", post(scoring_handlers::predict_batch))
        .route("/predict_batch/csv", post(scoring_handlers::predict_batch_csv))
        .route("/transactions", get(transaction_handlers::list_transactions))
        .route(
            "/transactions/filters",
            get(transaction_handlers::transaction_filters),
        )
        .route(
            "/transactions/summary",
            get(transaction_handlers::transaction_summary),
        )
        .route(
            "/transactions/anomalies.csv",
            get(transaction_handlers::export_anomalies),
        )
        .route("/health/live", get(ops_handlers::health_live))
        .route("/health/ready", get(ops_handlers::health_ready))
        .route("/metrics/prometheus", get(ops_handlers::metrics_prometheus))
        .with_state(state)
}
