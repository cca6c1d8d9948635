use serde::Serialize;

use crate::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadinessReport {
    pub status: &'static str,
    pub backend: String,
    pub model_features: usize,
    pub artifact_fingerprint: String,
    pub dataset_rows: usize,
}

/// Artifacts and dataset are loaded before the listener binds, so a running
/// process is always ready; the report identifies what it is serving.
pub fn readiness(state: &AppState) -> ReadinessReport {
    let info = state.pipeline.backend_info();
    ReadinessReport {
        status: "ready",
        backend: info.name,
        model_features: info.n_features,
        artifact_fingerprint: info.fingerprint,
        dataset_rows: state.transactions.len(),
    }
}
