use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::IntoResponse;
use axum::Json;

use backend_application::commands::scoring_commands;
use backend_application::AppState;
use backend_domain::{BatchScoringResponse, ScoringResult};

use crate::error::HttpError;
use crate::middleware::{decode_body, parse_batch, parse_transaction};

pub async fn predict(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ScoringResult>, HttpError> {
    let transaction = parse_transaction(&state, &headers, &body)?;
    let result = scoring_commands::score_transaction(&state, transaction).await?;
    Ok(Json(result))
}

pub async fn predict_batch(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<BatchScoringResponse>, HttpError> {
    let transactions = parse_batch(&state, &headers, &body)?;
    let response = scoring_commands::score_batch(&state, transactions).await?;
    Ok(Json(response))
}

pub async fn predict_batch_csv(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse, HttpError> {
    let content = decode_body(&state, &headers, &body)?;
    let scored = scoring_commands::score_batch_csv(&state, content).await?;
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("text/csv; charset=utf-8"),
    );
    Ok((headers, scored))
}
