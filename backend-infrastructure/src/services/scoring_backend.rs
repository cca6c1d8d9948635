use anyhow::{Context, Result};
use tokio::fs;
use tracing::info;

use backend_domain::{
    ArtifactConfig, BackendInfo, FeatureMatrix, OutlierLabel, PreparedTransaction, ScoringBackend,
    ScoringError, UnknownCategoryPolicy,
};

use crate::artifacts::{
    artifact_fingerprint, ArtifactError, FittedColumnTransformer, FittedIsolationForest,
};

pub const ARTIFACT_BACKEND_NAME: &str = "json-isolation-forest";

/// Scores with the exported column transformer and isolation forest.
pub struct ArtifactScoringBackend {
    transformer: FittedColumnTransformer,
    forest: FittedIsolationForest,
    fingerprint: String,
}

impl ArtifactScoringBackend {
    pub fn from_json(
        preprocessor: &[u8],
        model: &[u8],
        policy: UnknownCategoryPolicy,
    ) -> Result<Self, ArtifactError> {
        let transformer = FittedColumnTransformer::from_json(preprocessor, policy)?;
        let forest = FittedIsolationForest::from_json(model)?;
        if transformer.n_output_features() != forest.n_features() {
            return Err(ArtifactError::Invalid {
                artifact: "artifact pair",
                reason: format!(
                    "transformer emits {} features, model was fitted on {}",
                    transformer.n_output_features(),
                    forest.n_features()
                ),
            });
        }
        Ok(Self {
            transformer,
            forest,
            fingerprint: artifact_fingerprint(&[preprocessor, model]),
        })
    }

    pub async fn load(config: &ArtifactConfig) -> Result<Self> {
        let preprocessor = read_artifact(&config.preprocessor_path).await?;
        let model = read_artifact(&config.model_path).await?;
        let backend = Self::from_json(&preprocessor, &model, config.unknown_category_policy)
            .context("failed to load scoring artifacts")?;
        info!(
            preprocessor = %config.preprocessor_path,
            model = %config.model_path,
            n_features = backend.forest.n_features(),
            n_trees = backend.forest.n_trees(),
            unknown_category_policy = config.unknown_category_policy.as_str(),
            fingerprint = %backend.fingerprint,
            "scoring artifacts loaded"
        );
        Ok(backend)
    }

    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }
}

async fn read_artifact(path: &str) -> Result<Vec<u8>> {
    fs::read(path)
        .await
        .map_err(|source| ArtifactError::Read {
            path: path.to_string(),
            source,
        })
        .map_err(anyhow::Error::from)
}

impl ScoringBackend for ArtifactScoringBackend {
    fn transform(&self, table: &[PreparedTransaction<'_>]) -> Result<FeatureMatrix, ScoringError> {
        self.transformer.transform(table)
    }

    fn classify(&self, matrix: &FeatureMatrix) -> Result<Vec<OutlierLabel>, ScoringError> {
        self.forest.predict(matrix)
    }

    fn score(&self, matrix: &FeatureMatrix) -> Result<Vec<f64>, ScoringError> {
        self.forest.decision_function(matrix)
    }

    fn n_features(&self) -> usize {
        self.forest.n_features()
    }

    fn info(&self) -> BackendInfo {
        BackendInfo {
            name: ARTIFACT_BACKEND_NAME.to_string(),
            n_features: self.forest.n_features(),
            fingerprint: self.fingerprint.clone(),
        }
    }
}
