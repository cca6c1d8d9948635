use thiserror::Error;

use backend_domain::{ErrorKind, ScoringError};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{message}")]
    BadRequest { kind: ErrorKind, message: String },
    #[error("{0}")]
    Processing(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn schema(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            kind: ErrorKind::Schema,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        AppError::BadRequest {
            kind: ErrorKind::Validation,
            message: message.into(),
        }
    }

    pub fn kind_str(&self) -> &'static str {
        match self {
            AppError::BadRequest { kind, .. } => kind.as_str(),
            AppError::Processing(_) => ErrorKind::Processing.as_str(),
            AppError::Internal(_) => "internal",
        }
    }
}

impl From<ScoringError> for AppError {
    fn from(err: ScoringError) -> Self {
        if err.is_rejected_request() {
            AppError::BadRequest {
                kind: err.kind(),
                message: err.to_string(),
            }
        } else {
            AppError::Processing(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use backend_domain::FeatureColumn;

    #[test]
    fn scoring_errors_split_into_rejections_and_failures() {
        let rejected = AppError::from(ScoringError::InvalidAmount { row: 3, value: -1.0 });
        assert_eq!(rejected.kind_str(), "validation");
        assert!(rejected.to_string().contains("row 3"));

        let schema = AppError::from(ScoringError::Schema("missing column(s): amount".to_string()));
        assert_eq!(schema.kind_str(), "schema");

        let failed = AppError::from(ScoringError::UnknownCategory {
            row: 0,
            column: FeatureColumn::Location,
            value: "Kisumu".to_string(),
        });
        assert!(matches!(failed, AppError::Processing(_)));
        assert_eq!(failed.kind_str(), "processing");
    }
}
