use std::sync::Arc;

use anyhow::Result;

use backend_application::{AppState, Metrics};
use backend_domain::ScoringPipeline;
use backend_infrastructure::{AppConfig, ArtifactScoringBackend, CsvTransactionRepository};

pub struct AppContext {
    pub state: AppState,
}

impl AppContext {
    pub async fn new() -> Result<Self> {
        let config = AppConfig::load().await?;
        Self::from_config(&config).await
    }

    /// Loads both artifacts and the historical dataset. Any failure here is
    /// fatal; nothing is served from partially loaded state.
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let runtime_config = config.to_runtime_config();
        let artifact_config = config.to_artifact_config();

        let backend = ArtifactScoringBackend::load(&artifact_config).await?;
        let repository = CsvTransactionRepository::load(&artifact_config.dataset_path).await?;

        let state = AppState {
            config: runtime_config,
            pipeline: Arc::new(ScoringPipeline::new(Arc::new(backend))),
            transactions: Arc::new(repository),
            metrics: Arc::new(Metrics::default()),
        };

        Ok(Self { state })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture_config() -> AppConfig {
        let root = concat!(env!("CARGO_MANIFEST_DIR"), "/../fixtures");
        AppConfig {
            dataset_path: format!("{}/data/transactions.csv", root),
            preprocessor_path: format!("{}/models/preprocessor.json", root),
            model_path: format!("{}/models/isolation_forest.json", root),
            ..AppConfig::default()
        }
    }

    #[tokio::test]
    async fn context_loads_fixture_artifacts() {
        let context = AppContext::from_config(&fixture_config())
            .await
            .expect("context");
        assert_eq!(context.state.transactions.len(), 12);
        assert_eq!(context.state.pipeline.backend_info().n_features, 15);
    }

    #[tokio::test]
    async fn missing_dataset_is_fatal() {
        let config = AppConfig {
            dataset_path: "/nonexistent/transactions.csv".to_string(),
            ..fixture_config()
        };
        let err = AppContext::from_config(&config).await.err().expect("missing dataset");
        assert!(err.to_string().contains("/nonexistent/transactions.csv"));
    }
}
