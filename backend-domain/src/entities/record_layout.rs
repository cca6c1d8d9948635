// Tabular record layout
// Locates the nine attribute columns in a CSV-style header

use crate::entities::{FeatureColumn, Transaction};
use crate::error::ScoringError;

/// Reads a flag cell written as `0`/`1` (integer or float form) or `Yes`/`No`.
/// Out-of-range integers are returned as-is so validation can name them.
pub fn parse_flag_cell(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("yes") {
        return Some(1);
    }
    if trimmed.eq_ignore_ascii_case("no") {
        return Some(0);
    }
    if let Ok(value) = trimmed.parse::<i64>() {
        return Some(value);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Some(value as i64),
        _ => None,
    }
}

/// Column positions of the nine attributes within one header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordLayout {
    indices: [usize; 9],
}

impl RecordLayout {
    pub fn from_header<S: AsRef<str>>(header: &[S]) -> Result<Self, ScoringError> {
        let mut indices = [0usize; 9];
        let mut missing = Vec::new();
        for (slot, column) in FeatureColumn::ATTRIBUTES.iter().enumerate() {
            match header
                .iter()
                .position(|name| name.as_ref().trim() == column.as_str())
            {
                Some(index) => indices[slot] = index,
                None => missing.push(column.as_str()),
            }
        }
        if !missing.is_empty() {
            return Err(ScoringError::Schema(format!(
                "missing column(s): {}",
                missing.join(", ")
            )));
        }
        Ok(Self { indices })
    }

    /// Builds the transaction for data row `row` from its fields. Amount and
    /// flag ranges are left to the feature preparer.
    pub fn transaction<'r, F>(&self, row: usize, field: F) -> Result<Transaction, ScoringError>
    where
        F: Fn(usize) -> Option<&'r str>,
    {
        let mut values: [&str; 9] = [""; 9];
        for (slot, column) in FeatureColumn::ATTRIBUTES.iter().enumerate() {
            values[slot] = field(self.indices[slot]).ok_or_else(|| {
                ScoringError::Schema(format!("row {}: no value for {}", row, column))
            })?;
        }

        let amount = values[1].trim().parse::<f64>().map_err(|_| {
            ScoringError::Schema(format!("row {}: amount '{}' is not a number", row, values[1]))
        })?;
        let flag = |slot: usize| {
            parse_flag_cell(values[slot]).ok_or_else(|| {
                ScoringError::Schema(format!(
                    "row {}: {} '{}' is not 0/1 or Yes/No",
                    row,
                    FeatureColumn::ATTRIBUTES[slot],
                    values[slot]
                ))
            })
        };

        Ok(Transaction {
            transaction_type: values[0].trim().to_string(),
            amount,
            location: values[2].trim().to_string(),
            device_type: values[3].trim().to_string(),
            network_provider: values[4].trim().to_string(),
            user_type: values[5].trim().to_string(),
            is_foreign_number: flag(6)?,
            is_sim_recently_swapped: flag(7)?,
            has_multiple_accounts: flag(8)?,
        })
    }
}
