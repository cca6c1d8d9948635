use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;
use chrono::Local;

use backend_application::queries::transaction_queries;
use backend_application::AppState;
use backend_domain::{FilterOptions, ScoredRow, TransactionSummary};

use crate::error::HttpError;
use crate::middleware::parse_listing_query;

pub async fn list_transactions(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Vec<ScoredRow>>, HttpError> {
    let query = parse_listing_query(pairs)?;
    let rows = transaction_queries::list_transactions(&state, query).await?;
    Ok(Json(rows))
}

pub async fn transaction_summary(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<TransactionSummary>, HttpError> {
    let query = parse_listing_query(pairs)?;
    let summary = transaction_queries::summarize_transactions(&state, query).await?;
    Ok(Json(summary))
}

pub async fn transaction_filters(
    State(state): State<AppState>,
) -> Result<Json<FilterOptions>, HttpError> {
    let options = transaction_queries::transaction_filter_options(&state).await?;
    Ok(Json(options))
}

pub async fn export_anomalies(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<impl IntoResponse, HttpError> {
    let query = parse_listing_query(pairs)?;
    let csv = transaction_queries::export_anomalies_csv(&state, query).await?;
    let disposition = format!(
        "attachment; filename=\"anomalies-{}.csv\"",
        Local::now().format("%Y%m%d")
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&disposition).map_err(|err| HttpError::Internal(err.to_string()))?,
    );
    Ok((headers, csv))
}
