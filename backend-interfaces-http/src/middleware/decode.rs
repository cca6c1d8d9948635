use std::io::Read;

use axum::http::{header, HeaderMap};
use flate2::read::GzDecoder;
use serde::de::DeserializeOwned;

use backend_application::execution::report;
use backend_application::AppState;
use backend_domain::{
    BatchTransactionRequest, ScoringError, Transaction, TransactionFilter, TransactionQuery,
};

use crate::error::HttpError;

pub fn parse_transaction(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Transaction, HttpError> {
    parse_json(state, headers, body)
}

pub fn parse_batch(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Vec<Transaction>, HttpError> {
    let request: BatchTransactionRequest = parse_json(state, headers, body)?;
    Ok(request.transactions)
}

/// Inflates a gzip body, bounded by `max_body_bytes`. Rejections are counted
/// like any other refused scoring input.
pub fn decode_body(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<Vec<u8>, HttpError> {
    maybe_gunzip(headers, body, state.config.max_body_bytes).map_err(|err| rejected(state, err))
}

fn parse_json<T: DeserializeOwned>(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<T, HttpError> {
    let content = decode_body(state, headers, body)?;
    serde_json::from_slice(&content)
        .map_err(|err| rejected(state, ScoringError::Schema(err.to_string())))
}

fn rejected(state: &AppState, err: ScoringError) -> HttpError {
    HttpError::from(report(state, err))
}

fn maybe_gunzip(headers: &HeaderMap, body: &[u8], limit: u64) -> Result<Vec<u8>, ScoringError> {
    let gzipped = headers
        .get(header::CONTENT_ENCODING)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.trim().eq_ignore_ascii_case("gzip"))
        .unwrap_or(false);
    if !gzipped {
        return Ok(body.to_vec());
    }

    let mut out = Vec::new();
    GzDecoder::new(body)
        .take(limit.saturating_add(1))
        .read_to_end(&mut out)
        .map_err(|err| ScoringError::Schema(format!("failed to decompress gzip body: {}", err)))?;
    if out.len() as u64 > limit {
        return Err(ScoringError::BodyTooLarge { limit });
    }
    Ok(out)
}

/// Builds a listing query from raw query pairs. Selector keys may repeat;
/// empty values are skipped. `limit` must be a non-negative integer.
pub fn parse_listing_query(pairs: Vec<(String, String)>) -> Result<TransactionQuery, HttpError> {
    let mut filter = TransactionFilter::default();
    let mut limit = None;
    for (key, value) in pairs {
        let value = value.trim().to_string();
        if value.is_empty() {
            continue;
        }
        match key.as_str() {
            "transaction_type" => filter.transaction_type.push(value),
            "location" => filter.location.push(value),
            "user_type" => filter.user_type.push(value),
            "limit" => {
                let parsed = value.parse::<usize>().map_err(|_| {
                    HttpError::validation(format!(
                        "limit must be a non-negative integer, got '{}'",
                        value
                    ))
                })?;
                limit = Some(parsed);
            }
            _ => {}
        }
    }
    Ok(TransactionQuery { filter, limit })
}
