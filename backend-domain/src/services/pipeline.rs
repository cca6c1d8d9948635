use std::sync::Arc;

use crate::entities::{HistoricalRow, ScoredRow, ScoredTransaction, ScoringResult, Transaction};
use crate::error::ScoringError;
use crate::ports::{BackendInfo, ScoringBackend};
use crate::services::{AnomalyScorer, FeaturePreparer, ResultAssembler};

/// Feature preparation, scoring and assembly over one shared backend.
///
/// Every call is atomic over its input: the whole table goes through one
/// transform call and one scoring call, and any failing row fails the call.
#[derive(Clone)]
pub struct ScoringPipeline {
    backend: Arc<dyn ScoringBackend>,
    preparer: FeaturePreparer,
    scorer: AnomalyScorer,
    assembler: ResultAssembler,
}

impl ScoringPipeline {
    pub fn new(backend: Arc<dyn ScoringBackend>) -> Self {
        Self {
            backend,
            preparer: FeaturePreparer,
            scorer: AnomalyScorer,
            assembler: ResultAssembler,
        }
    }

    pub fn backend_info(&self) -> BackendInfo {
        self.backend.info()
    }

    pub fn score_one(&self, transaction: &Transaction) -> Result<ScoringResult, ScoringError> {
        let mut scored = self.run(std::iter::once(transaction))?;
        scored
            .pop()
            .map(|row| row.result)
            .ok_or_else(|| ScoringError::Backend("no result for single transaction".to_string()))
    }

    pub fn score_batch(&self, transactions: &[Transaction]) -> Result<Vec<ScoringResult>, ScoringError> {
        Ok(self
            .run(transactions)?
            .into_iter()
            .map(|row| row.result)
            .collect())
    }

    pub fn score_detailed(
        &self,
        transactions: &[Transaction],
    ) -> Result<Vec<ScoredTransaction>, ScoringError> {
        self.run(transactions)
    }

    /// Scores already-filtered dataset rows and attaches the results.
    pub fn score_rows(
        &self,
        columns: Arc<[String]>,
        rows: Vec<HistoricalRow>,
    ) -> Result<Vec<ScoredRow>, ScoringError> {
        let scored = self.run(rows.iter().map(|row| &row.transaction))?;
        self.assembler.attach_rows(columns, rows, scored)
    }

    fn run<'a, I>(&self, transactions: I) -> Result<Vec<ScoredTransaction>, ScoringError>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        let prepared = self.preparer.prepare(transactions)?;
        if prepared.is_empty() {
            return Ok(Vec::new());
        }
        let matrix = self.preparer.featurize(self.backend.as_ref(), &prepared)?;
        let predictions = self.scorer.score(self.backend.as_ref(), &matrix)?;
        self.assembler.assemble(&prepared, predictions)
    }
}
