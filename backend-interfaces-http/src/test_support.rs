use std::sync::Arc;

use backend_application::{AppState, Metrics};
use backend_domain::{RuntimeConfig, ScoringPipeline, UnknownCategoryPolicy};
use backend_infrastructure::{ArtifactScoringBackend, CsvTransactionRepository};

const PREPROCESSOR: &[u8] = include_bytes!("../../fixtures/models/preprocessor.json");
const MODEL: &[u8] = include_bytes!("../../fixtures/models/isolation_forest.json");
const DATASET: &[u8] = include_bytes!("../../fixtures/data/transactions.csv");

pub(crate) const NAIROBI_TRANSFER: &str = r#"{
    "transaction_type": "transfer",
    "amount": 1000.0,
    "location": "Nairobi",
    "device_type": "mobile",
    "network_provider": "Safaricom",
    "user_type": "individual",
    "is_foreign_number": 0,
    "is_sim_recently_swapped": 1,
    "has_multiple_accounts": 0
}"#;

pub(crate) fn fixture_state() -> AppState {
    let backend = ArtifactScoringBackend::from_json(PREPROCESSOR, MODEL, UnknownCategoryPolicy::Artifact)
        .expect("fixture artifacts load");
    let repository = CsvTransactionRepository::from_reader(DATASET).expect("fixture dataset loads");
    AppState {
        config: RuntimeConfig::default(),
        pipeline: Arc::new(ScoringPipeline::new(Arc::new(backend))),
        transactions: Arc::new(repository),
        metrics: Arc::new(Metrics::default()),
    }
}
