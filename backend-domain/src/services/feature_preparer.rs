use crate::entities::{PreparedTransaction, Transaction};
use crate::error::ScoringError;
use crate::ports::ScoringBackend;
use crate::value_objects::FeatureMatrix;

/// Validates raw rows, derives `log_amount` and runs the fitted transformer
/// over the whole table in one call.
#[derive(Debug, Default, Clone, Copy)]
pub struct FeaturePreparer;

impl FeaturePreparer {
    pub fn validate(row: usize, transaction: &Transaction) -> Result<(), ScoringError> {
        let amount = transaction.amount;
        if !amount.is_finite() || amount < 0.0 {
            return Err(ScoringError::InvalidAmount { row, value: amount });
        }
        for (column, value) in transaction.flags() {
            if value != 0 && value != 1 {
                return Err(ScoringError::InvalidFlag { row, column, value });
            }
        }
        Ok(())
    }

    pub fn prepare<'a, I>(&self, transactions: I) -> Result<Vec<PreparedTransaction<'a>>, ScoringError>
    where
        I: IntoIterator<Item = &'a Transaction>,
    {
        transactions
            .into_iter()
            .enumerate()
            .map(|(row, transaction)| {
                Self::validate(row, transaction)?;
                Ok(PreparedTransaction {
                    transaction,
                    log_amount: transaction.amount.ln_1p(),
                })
            })
            .collect()
    }

    pub fn featurize(
        &self,
        backend: &dyn ScoringBackend,
        table: &[PreparedTransaction<'_>],
    ) -> Result<FeatureMatrix, ScoringError> {
        let matrix = backend.transform(table)?;
        if matrix.n_rows() != table.len() {
            return Err(ScoringError::Backend(format!(
                "transformer returned {} rows for {} inputs",
                matrix.n_rows(),
                table.len()
            )));
        }
        Ok(matrix)
    }
}
