// Fitted artifacts exported from the training pipeline as JSON

pub mod column_transformer;
pub mod fingerprint;
pub mod isolation_forest;

pub use column_transformer::*;
pub use fingerprint::*;
pub use isolation_forest::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {artifact}: {source}")]
    Parse {
        artifact: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {artifact}: {reason}")]
    Invalid {
        artifact: &'static str,
        reason: String,
    },
}
