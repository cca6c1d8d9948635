use serde::Serialize;

use crate::entities::PreparedTransaction;
use crate::error::ScoringError;
use crate::value_objects::{FeatureMatrix, OutlierLabel};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BackendInfo {
    pub name: String,
    pub n_features: usize,
    pub fingerprint: String,
}

/// The fitted transformer and outlier model behind one interface. Calls
/// must not mutate the backend; it is shared across concurrent requests.
pub trait ScoringBackend: Send + Sync {
    fn transform(&self, table: &[PreparedTransaction<'_>]) -> Result<FeatureMatrix, ScoringError>;
    fn classify(&self, matrix: &FeatureMatrix) -> Result<Vec<OutlierLabel>, ScoringError>;
    fn score(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>, ScoringError>;
    /// Width of the matrix the model was fitted on.
    fn n_features(&self) -> usize;
    fn info(&self) -> BackendInfo;
}
