// Historical dataset entities
// Rows of the flat transaction file, carried through to listing output verbatim

use std::sync::Arc;

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::entities::{ScoredTransaction, Transaction};

/// Output columns appended by scoring. Source columns with these names are
/// replaced, not duplicated.
pub const DERIVED_COLUMNS: [&str; 3] = ["log_amount", "is_anomaly", "anomaly_score"];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Integer(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return CellValue::Null;
        }
        if let Ok(value) = trimmed.parse::<i64>() {
            return CellValue::Integer(value);
        }
        if let Ok(value) = trimmed.parse::<f64>() {
            if value.is_finite() {
                return CellValue::Float(value);
            }
        }
        CellValue::Text(raw.to_string())
    }

    pub fn to_csv_field(&self) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Integer(value) => value.to_string(),
            CellValue::Float(value) => value.to_string(),
            CellValue::Text(value) => value.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistoricalRow {
    pub transaction: Transaction,
    /// One cell per dataset column, aligned with the dataset header.
    pub cells: Vec<CellValue>,
}

/// A historical row after scoring. Serializes as a flat record: source
/// columns in header order, then the derived columns.
#[derive(Debug, Clone)]
pub struct ScoredRow {
    pub columns: Arc<[String]>,
    pub row: HistoricalRow,
    pub scored: ScoredTransaction,
}

impl ScoredRow {
    pub fn is_anomaly(&self) -> bool {
        self.scored.result.is_anomaly == 1
    }

    fn source_cells(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.columns
            .iter()
            .zip(self.row.cells.iter())
            .filter(|(name, _)| !DERIVED_COLUMNS.contains(&name.as_str()))
            .map(|(name, cell)| (name.as_str(), cell))
    }

    pub fn csv_header(columns: &[String]) -> Vec<String> {
        columns
            .iter()
            .filter(|name| !DERIVED_COLUMNS.contains(&name.as_str()))
            .cloned()
            .chain(DERIVED_COLUMNS.iter().map(|name| name.to_string()))
            .collect()
    }

    pub fn csv_record(&self) -> Vec<String> {
        self.source_cells()
            .map(|(_, cell)| cell.to_csv_field())
            .chain([
                self.scored.log_amount.to_string(),
                self.scored.result.is_anomaly.to_string(),
                self.scored.result.anomaly_score.to_string(),
            ])
            .collect()
    }
}

impl Serialize for ScoredRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (name, cell) in self.source_cells() {
            map.serialize_entry(name, cell)?;
        }
        map.serialize_entry("log_amount", &self.scored.log_amount)?;
        map.serialize_entry("is_anomaly", &self.scored.result.is_anomaly)?;
        map.serialize_entry("anomaly_score", &self.scored.result.anomaly_score)?;
        map.end()
    }
}
