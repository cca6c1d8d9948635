use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use backend_application::AppError;

#[derive(Debug)]
pub enum HttpError {
    BadRequest { kind: &'static str, message: String },
    Processing(String),
    Internal(String),
}

impl HttpError {
    pub fn schema(message: impl Into<String>) -> Self {
        HttpError::BadRequest {
            kind: "schema",
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        HttpError::BadRequest {
            kind: "validation",
            message: message.into(),
        }
    }
}

impl From<AppError> for HttpError {
    fn from(value: AppError) -> Self {
        let kind = value.kind_str();
        match value {
            AppError::BadRequest { message, .. } => HttpError::BadRequest { kind, message },
            AppError::Processing(message) => HttpError::Processing(message),
            AppError::Internal(err) => HttpError::Internal(err.to_string()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    kind: &'static str,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            HttpError::BadRequest { kind, message } => (StatusCode::BAD_REQUEST, kind, message),
            HttpError::Processing(message) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "processing", message)
            }
            HttpError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, "internal", message),
        };
        (status, Json(ErrorBody { error: message, kind })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn error_body_names_kind() {
        let response = HttpError::validation("limit must be a non-negative integer").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), 1024)
            .await
            .expect("body");
        let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json");
        assert_eq!(body["kind"], "validation");
        assert_eq!(body["error"], "limit must be a non-negative integer");

        let response = HttpError::Processing("unknown location".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
