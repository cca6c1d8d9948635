use serde::Deserialize;

use backend_domain::{
    ColumnValue, FeatureColumn, FeatureMatrix, PreparedTransaction, ScoringError,
    UnknownCategoryPolicy,
};

use super::ArtifactError;

const ARTIFACT: &str = "column transformer";

#[derive(Debug, Clone, Deserialize)]
pub struct ColumnTransformerArtifact {
    pub blocks: Vec<EncoderBlockArtifact>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EncoderBlockArtifact {
    OneHot {
        columns: Vec<FeatureColumn>,
        categories: Vec<Vec<String>>,
        #[serde(default)]
        handle_unknown: UnknownCategoryPolicy,
    },
    StandardScaler {
        columns: Vec<FeatureColumn>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    Passthrough {
        columns: Vec<FeatureColumn>,
    },
}

#[derive(Debug, Clone)]
struct CategoryEncoder {
    column: FeatureColumn,
    categories: Vec<String>,
    // Numeric view of each category, for flag columns encoded one-hot.
    numeric: Vec<Option<f64>>,
    policy: UnknownCategoryPolicy,
}

impl CategoryEncoder {
    fn position(&self, value: ColumnValue<'_>) -> Option<usize> {
        match value {
            ColumnValue::Text(text) => self.categories.iter().position(|c| c == text),
            ColumnValue::Number(number) => self.numeric.iter().position(|c| *c == Some(number)),
        }
    }
}

#[derive(Debug, Clone)]
enum EncoderBlock {
    OneHot(Vec<CategoryEncoder>),
    Scaler {
        columns: Vec<FeatureColumn>,
        mean: Vec<f64>,
        scale: Vec<f64>,
    },
    Passthrough(Vec<FeatureColumn>),
}

impl EncoderBlock {
    fn width(&self) -> usize {
        match self {
            EncoderBlock::OneHot(encoders) => encoders.iter().map(|e| e.categories.len()).sum(),
            EncoderBlock::Scaler { columns, .. } => columns.len(),
            EncoderBlock::Passthrough(columns) => columns.len(),
        }
    }
}

/// A fitted column transformer: ordered encoder blocks whose outputs are
/// concatenated into one dense row per input.
#[derive(Debug, Clone)]
pub struct FittedColumnTransformer {
    blocks: Vec<EncoderBlock>,
    n_output_features: usize,
}

impl FittedColumnTransformer {
    pub fn from_json(bytes: &[u8], policy: UnknownCategoryPolicy) -> Result<Self, ArtifactError> {
        let artifact: ColumnTransformerArtifact =
            serde_json::from_slice(bytes).map_err(|source| ArtifactError::Parse {
                artifact: ARTIFACT,
                source,
            })?;
        Self::from_artifact(artifact, policy)
    }

    /// Validates the exported blocks and resolves each one-hot block's
    /// unknown-category handling against the configured policy.
    pub fn from_artifact(
        artifact: ColumnTransformerArtifact,
        policy: UnknownCategoryPolicy,
    ) -> Result<Self, ArtifactError> {
        if artifact.blocks.is_empty() {
            return Err(invalid("no encoder blocks"));
        }

        let mut blocks = Vec::with_capacity(artifact.blocks.len());
        for (index, block) in artifact.blocks.into_iter().enumerate() {
            let block = match block {
                EncoderBlockArtifact::OneHot {
                    columns,
                    categories,
                    handle_unknown,
                } => {
                    if columns.len() != categories.len() {
                        return Err(invalid(format!(
                            "block {}: {} columns but {} category lists",
                            index,
                            columns.len(),
                            categories.len()
                        )));
                    }
                    let resolved = policy.resolve(handle_unknown);
                    let encoders = columns
                        .into_iter()
                        .zip(categories)
                        .map(|(column, categories)| {
                            if categories.is_empty() {
                                return Err(invalid(format!(
                                    "block {}: no categories for {}",
                                    index, column
                                )));
                            }
                            let numeric = categories
                                .iter()
                                .map(|c| {
                                    if column.is_categorical() {
                                        None
                                    } else {
                                        c.trim().parse::<f64>().ok()
                                    }
                                })
                                .collect();
                            Ok(CategoryEncoder {
                                column,
                                categories,
                                numeric,
                                policy: resolved,
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()?;
                    EncoderBlock::OneHot(encoders)
                }
                EncoderBlockArtifact::StandardScaler {
                    columns,
                    mean,
                    scale,
                } => {
                    if mean.len() != columns.len() || scale.len() != columns.len() {
                        return Err(invalid(format!(
                            "block {}: {} columns, {} means, {} scales",
                            index,
                            columns.len(),
                            mean.len(),
                            scale.len()
                        )));
                    }
                    ensure_numeric(index, &columns)?;
                    if mean.iter().chain(scale.iter()).any(|v| !v.is_finite()) {
                        return Err(invalid(format!("block {}: non-finite statistics", index)));
                    }
                    let scale = scale
                        .into_iter()
                        .map(|s| if s == 0.0 { 1.0 } else { s })
                        .collect();
                    EncoderBlock::Scaler {
                        columns,
                        mean,
                        scale,
                    }
                }
                EncoderBlockArtifact::Passthrough { columns } => {
                    ensure_numeric(index, &columns)?;
                    EncoderBlock::Passthrough(columns)
                }
            };
            blocks.push(block);
        }

        let n_output_features = blocks.iter().map(EncoderBlock::width).sum();
        if n_output_features == 0 {
            return Err(invalid("transformer produces no output columns"));
        }
        Ok(Self {
            blocks,
            n_output_features,
        })
    }

    pub fn n_output_features(&self) -> usize {
        self.n_output_features
    }

    pub fn transform(&self, table: &[PreparedTransaction<'_>]) -> Result<FeatureMatrix, ScoringError> {
        let mut matrix = FeatureMatrix::with_capacity(table.len(), self.n_output_features);
        let mut row_values = Vec::with_capacity(self.n_output_features);
        for (row, prepared) in table.iter().enumerate() {
            row_values.clear();
            for block in &self.blocks {
                encode_block(block, row, prepared, &mut row_values)?;
            }
            if !matrix.push_row(&row_values) {
                return Err(ScoringError::Backend(format!(
                    "row {} encoded to {} columns, expected {}",
                    row,
                    row_values.len(),
                    self.n_output_features
                )));
            }
        }
        Ok(matrix)
    }
}

fn encode_block(
    block: &EncoderBlock,
    row: usize,
    prepared: &PreparedTransaction<'_>,
    out: &mut Vec<f64>,
) -> Result<(), ScoringError> {
    match block {
        EncoderBlock::OneHot(encoders) => {
            for encoder in encoders {
                let value = prepared.value(encoder.column);
                let hit = encoder.position(value);
                if hit.is_none() && encoder.policy != UnknownCategoryPolicy::Ignore {
                    return Err(ScoringError::UnknownCategory {
                        row,
                        column: encoder.column,
                        value: display_value(value),
                    });
                }
                out.extend((0..encoder.categories.len()).map(|i| {
                    if Some(i) == hit {
                        1.0
                    } else {
                        0.0
                    }
                }));
            }
        }
        EncoderBlock::Scaler {
            columns,
            mean,
            scale,
        } => {
            for (i, column) in columns.iter().enumerate() {
                let x = numeric_value(row, *column, prepared.value(*column))?;
                out.push((x - mean[i]) / scale[i]);
            }
        }
        EncoderBlock::Passthrough(columns) => {
            for column in columns {
                out.push(numeric_value(row, *column, prepared.value(*column))?);
            }
        }
    }
    Ok(())
}

fn numeric_value(row: usize, column: FeatureColumn, value: ColumnValue<'_>) -> Result<f64, ScoringError> {
    match value {
        ColumnValue::Number(number) => Ok(number),
        ColumnValue::Text(_) => Err(ScoringError::Backend(format!(
            "row {}: {} is not numeric",
            row, column
        ))),
    }
}

fn display_value(value: ColumnValue<'_>) -> String {
    match value {
        ColumnValue::Text(text) => text.to_string(),
        ColumnValue::Number(number) => number.to_string(),
    }
}

fn ensure_numeric(index: usize, columns: &[FeatureColumn]) -> Result<(), ArtifactError> {
    if columns.is_empty() {
        return Err(invalid(format!("block {}: no columns", index)));
    }
    if let Some(column) = columns.iter().find(|c| c.is_categorical()) {
        return Err(invalid(format!(
            "block {}: categorical column {} cannot be scaled or passed through",
            index, column
        )));
    }
    Ok(())
}

fn invalid(reason: impl Into<String>) -> ArtifactError {
    ArtifactError::Invalid {
        artifact: ARTIFACT,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use backend_domain::Transaction;

    fn tx(transaction_type: &str, amount: f64) -> Transaction {
        Transaction {
            transaction_type: transaction_type.to_string(),
            amount,
            location: "Nairobi".to_string(),
            device_type: "mobile".to_string(),
            network_provider: "Safaricom".to_string(),
            user_type: "individual".to_string(),
            is_foreign_number: 1,
            is_sim_recently_swapped: 0,
            has_multiple_accounts: 0,
        }
    }

    fn prepared(transaction: &Transaction) -> PreparedTransaction<'_> {
        PreparedTransaction {
            transaction,
            log_amount: transaction.amount.ln_1p(),
        }
    }

    fn transformer(handle_unknown: &str, policy: UnknownCategoryPolicy) -> FittedColumnTransformer {
        let artifact = json!({
            "blocks": [
                {"kind": "standard_scaler", "columns": ["log_amount"], "mean": [1.0], "scale": [0.0]},
                {"kind": "passthrough", "columns": ["is_foreign_number"]},
                {
                    "kind": "one_hot",
                    "columns": ["transaction_type", "has_multiple_accounts"],
                    "categories": [["deposit", "transfer"], ["0", "1"]],
                    "handle_unknown": handle_unknown
                }
            ]
        });
        let bytes = serde_json::to_vec(&artifact).expect("serialize");
        FittedColumnTransformer::from_json(&bytes, policy).expect("valid transformer")
    }

    #[test]
    fn blocks_are_concatenated_in_order() {
        let transformer = transformer("error", UnknownCategoryPolicy::Artifact);
        assert_eq!(transformer.n_output_features(), 6);

        let row = tx("transfer", 0.0);
        let matrix = transformer.transform(&[prepared(&row)]).expect("transform");
        // scale 0 is treated as 1, so log_amount 0 minus mean 1 gives -1
        assert_eq!(matrix.row(0), &[-1.0, 1.0, 0.0, 1.0, 1.0, 0.0]);
    }

    #[test]
    fn unknown_category_follows_resolved_policy() {
        let row = tx("loan", 10.0);
        let table = [prepared(&row)];

        let strict = transformer("error", UnknownCategoryPolicy::Artifact);
        let err = strict.transform(&table).expect_err("unknown category");
        assert_eq!(
            err,
            ScoringError::UnknownCategory {
                row: 0,
                column: FeatureColumn::TransactionType,
                value: "loan".to_string(),
            }
        );

        let lenient = transformer("error", UnknownCategoryPolicy::Ignore);
        let matrix = lenient.transform(&table).expect("ignored");
        assert_eq!(&matrix.row(0)[2..4], &[0.0, 0.0]);

        let fitted_ignore = transformer("ignore", UnknownCategoryPolicy::Artifact);
        assert!(fitted_ignore.transform(&table).is_ok());

        let forced = transformer("ignore", UnknownCategoryPolicy::Error);
        assert!(forced.transform(&table).is_err());
    }

    #[test]
    fn handle_unknown_defaults_to_error() {
        let artifact = json!({
            "blocks": [{"kind": "one_hot", "columns": ["location"], "categories": [["Nairobi"]]}]
        });
        let transformer = FittedColumnTransformer::from_json(
            &serde_json::to_vec(&artifact).expect("serialize"),
            UnknownCategoryPolicy::Artifact,
        )
        .expect("valid");
        let mut row = tx("deposit", 1.0);
        row.location = "Kisumu".to_string();
        assert!(transformer.transform(&[prepared(&row)]).is_err());
    }

    #[test]
    fn malformed_artifacts_are_rejected() {
        let cases = [
            json!({"blocks": []}),
            json!({"blocks": [{"kind": "passthrough", "columns": ["location"]}]}),
            json!({"blocks": [{"kind": "standard_scaler", "columns": ["amount"], "mean": [1.0], "scale": []}]}),
            json!({"blocks": [{"kind": "one_hot", "columns": ["location"], "categories": []}]}),
            json!({"blocks": [{"kind": "one_hot", "columns": ["location"], "categories": [[]]}]}),
        ];
        for case in cases {
            let bytes = serde_json::to_vec(&case).expect("serialize");
            let err = FittedColumnTransformer::from_json(&bytes, UnknownCategoryPolicy::Artifact)
                .expect_err("invalid artifact");
            assert!(matches!(err, ArtifactError::Invalid { .. }), "{case}");
        }

        let unknown_column = json!({"blocks": [{"kind": "passthrough", "columns": ["balance"]}]});
        let err = FittedColumnTransformer::from_json(
            &serde_json::to_vec(&unknown_column).expect("serialize"),
            UnknownCategoryPolicy::Artifact,
        )
        .expect_err("unknown column");
        assert!(matches!(err, ArtifactError::Parse { .. }));
    }
}
