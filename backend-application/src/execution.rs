use tokio::task;
use tracing::{error, warn};

use backend_domain::ScoringError;

use crate::{AppError, AppState};

/// Runs a CPU-bound scoring job on the blocking pool.
pub async fn run_scoring<T, F>(state: &AppState, job: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, ScoringError> + Send + 'static,
    T: Send + 'static,
{
    let outcome = task::spawn_blocking(job).await.map_err(|err| {
        error!("scoring task failed: {}", err);
        AppError::Internal(anyhow::anyhow!("scoring task failed: {}", err))
    })?;
    outcome.map_err(|err| report(state, err))
}

/// Counts and logs a scoring error before it leaves the application layer.
pub fn report(state: &AppState, err: ScoringError) -> AppError {
    if err.is_rejected_request() {
        state.metrics.record_rejected();
        warn!(kind = err.kind().as_str(), "rejected scoring input: {}", err);
    } else {
        state.metrics.record_processing_error();
        error!(kind = err.kind().as_str(), "scoring failed: {}", err);
    }
    AppError::from(err)
}
