use std::sync::Arc;

use crate::entities::{HistoricalRow, PreparedTransaction, RawPrediction, ScoredRow, ScoredTransaction};
use crate::error::ScoringError;

/// Puts predictions back onto their input rows, one for one, in input order.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResultAssembler;

impl ResultAssembler {
    pub fn assemble(
        &self,
        prepared: &[PreparedTransaction<'_>],
        predictions: Vec<RawPrediction>,
    ) -> Result<Vec<ScoredTransaction>, ScoringError> {
        if prepared.len() != predictions.len() {
            return Err(ScoringError::Backend(format!(
                "{} predictions for {} rows",
                predictions.len(),
                prepared.len()
            )));
        }
        Ok(prepared
            .iter()
            .zip(predictions)
            .map(|(row, prediction)| ScoredTransaction {
                log_amount: row.log_amount,
                result: prediction.to_result(),
            })
            .collect())
    }

    pub fn attach_rows(
        &self,
        columns: Arc<[String]>,
        rows: Vec<HistoricalRow>,
        scored: Vec<ScoredTransaction>,
    ) -> Result<Vec<ScoredRow>, ScoringError> {
        if rows.len() != scored.len() {
            return Err(ScoringError::Backend(format!(
                "{} results for {} dataset rows",
                scored.len(),
                rows.len()
            )));
        }
        Ok(rows
            .into_iter()
            .zip(scored)
            .map(|(row, scored)| ScoredRow {
                columns: columns.clone(),
                row,
                scored,
            })
            .collect())
    }
}
