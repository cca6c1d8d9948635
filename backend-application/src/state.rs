use std::sync::Arc;

use backend_domain::ports::TransactionRepository;
use backend_domain::{RuntimeConfig, ScoringPipeline};

use crate::Metrics;

/// Everything a request needs, shared read-only across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: RuntimeConfig,
    pub pipeline: Arc<ScoringPipeline>,
    pub transactions: Arc<dyn TransactionRepository>,
    pub metrics: Arc<Metrics>,
}
