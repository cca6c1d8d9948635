// Scoring result entities

use serde::{Deserialize, Serialize};

use crate::value_objects::OutlierLabel;

/// Caller-facing outcome for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringResult {
    pub is_anomaly: u8,
    pub anomaly_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchScoringResponse {
    pub results: Vec<ScoringResult>,
}

/// What the model said about one row, before relabelling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPrediction {
    pub label: OutlierLabel,
    pub decision: f64,
}

impl RawPrediction {
    pub fn to_result(self) -> ScoringResult {
        ScoringResult {
            is_anomaly: self.label.anomaly_indicator(),
            anomaly_score: self.decision,
        }
    }
}

/// Assembled output for one input row: the derived feature plus its result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredTransaction {
    pub log_amount: f64,
    pub result: ScoringResult,
}
