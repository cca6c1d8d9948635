use crate::entities::RawPrediction;
use crate::error::ScoringError;
use crate::ports::ScoringBackend;
use crate::value_objects::FeatureMatrix;

/// Runs the fitted model's classification and decision calls over a feature
/// matrix and pairs them up per row.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnomalyScorer;

impl AnomalyScorer {
    pub fn score(
        &self,
        backend: &dyn ScoringBackend,
        matrix: &FeatureMatrix,
    ) -> Result<Vec<RawPrediction>, ScoringError> {
        let expected = backend.n_features();
        if matrix.n_cols() != expected {
            return Err(ScoringError::DimensionMismatch {
                expected,
                actual: matrix.n_cols(),
            });
        }

        let labels = backend.classify(matrix)?;
        let decisions = backend.score(matrix)?;
        if labels.len() != matrix.n_rows() || decisions.len() != matrix.n_rows() {
            return Err(ScoringError::Backend(format!(
                "model returned {} labels and {} scores for {} rows",
                labels.len(),
                decisions.len(),
                matrix.n_rows()
            )));
        }

        Ok(labels
            .into_iter()
            .zip(decisions)
            .map(|(label, decision)| RawPrediction { label, decision })
            .collect())
    }
}
