// Scoring error taxonomy

use thiserror::Error;

use crate::entities::FeatureColumn;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScoringError {
    #[error("schema error: {0}")]
    Schema(String),
    #[error("row {row}: amount must be a finite non-negative number, got {value}")]
    InvalidAmount { row: usize, value: f64 },
    #[error("row {row}: {column} must be 0 or 1, got {value}")]
    InvalidFlag {
        row: usize,
        column: FeatureColumn,
        value: i64,
    },
    #[error("request body exceeds {limit} bytes once decompressed")]
    BodyTooLarge { limit: u64 },
    #[error("batch must contain at least one transaction")]
    EmptyBatch,
    #[error("batch of {size} transactions exceeds the limit of {max}")]
    BatchTooLarge { size: usize, max: usize },
    #[error("row {row}: unknown {column} '{value}' not seen when the transformer was fitted")]
    UnknownCategory {
        row: usize,
        column: FeatureColumn,
        value: String,
    },
    #[error("feature matrix has {actual} columns, model was fitted on {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
    #[error("scoring backend error: {0}")]
    Backend(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Schema,
    Validation,
    Processing,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Schema => "schema",
            ErrorKind::Validation => "validation",
            ErrorKind::Processing => "processing",
        }
    }
}

impl ScoringError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ScoringError::Schema(_) => ErrorKind::Schema,
            ScoringError::InvalidAmount { .. }
            | ScoringError::InvalidFlag { .. }
            | ScoringError::BodyTooLarge { .. }
            | ScoringError::EmptyBatch
            | ScoringError::BatchTooLarge { .. } => ErrorKind::Validation,
            ScoringError::UnknownCategory { .. }
            | ScoringError::DimensionMismatch { .. }
            | ScoringError::Backend(_) => ErrorKind::Processing,
        }
    }

    /// True when the caller sent something unusable, as opposed to the
    /// artifacts disagreeing with the request or each other.
    pub fn is_rejected_request(&self) -> bool {
        !matches!(self.kind(), ErrorKind::Processing)
    }
}
