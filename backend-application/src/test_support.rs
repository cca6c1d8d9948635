use std::sync::Arc;

use backend_domain::{RuntimeConfig, ScoringPipeline, Transaction, UnknownCategoryPolicy};
use backend_infrastructure::{ArtifactScoringBackend, CsvTransactionRepository};

use crate::{AppState, Metrics};

const PREPROCESSOR: &[u8] = include_bytes!("../../fixtures/models/preprocessor.json");
const MODEL: &[u8] = include_bytes!("../../fixtures/models/isolation_forest.json");
const DATASET: &[u8] = include_bytes!("../../fixtures/data/transactions.csv");

pub(crate) fn fixture_state(config: RuntimeConfig) -> AppState {
    let backend = ArtifactScoringBackend::from_json(PREPROCESSOR, MODEL, UnknownCategoryPolicy::Artifact)
        .expect("fixture artifacts load");
    let repository = CsvTransactionRepository::from_reader(DATASET).expect("fixture dataset loads");
    AppState {
        config,
        pipeline: Arc::new(ScoringPipeline::new(Arc::new(backend))),
        transactions: Arc::new(repository),
        metrics: Arc::new(Metrics::default()),
    }
}

pub(crate) fn nairobi_transfer() -> Transaction {
    Transaction {
        transaction_type: "transfer".to_string(),
        amount: 1000.0,
        location: "Nairobi".to_string(),
        device_type: "mobile".to_string(),
        network_provider: "Safaricom".to_string(),
        user_type: "individual".to_string(),
        is_foreign_number: 0,
        is_sim_recently_swapped: 1,
        has_multiple_accounts: 0,
    }
}
