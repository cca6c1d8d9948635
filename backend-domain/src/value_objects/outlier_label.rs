// Outlier label value object
// Label encoding of the isolation-forest model family: -1 outlier, 1 inlier

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutlierLabel {
    Outlier,
    Inlier,
}

impl OutlierLabel {
    pub fn from_decision(decision: f64) -> Self {
        if decision < 0.0 {
            OutlierLabel::Outlier
        } else {
            OutlierLabel::Inlier
        }
    }

    pub fn as_raw(&self) -> i8 {
        match self {
            OutlierLabel::Outlier => -1,
            OutlierLabel::Inlier => 1,
        }
    }

    pub fn anomaly_indicator(&self) -> u8 {
        match self {
            OutlierLabel::Outlier => 1,
            OutlierLabel::Inlier => 0,
        }
    }
}

impl TryFrom<i64> for OutlierLabel {
    type Error = i64;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        match raw {
            -1 => Ok(OutlierLabel::Outlier),
            1 => Ok(OutlierLabel::Inlier),
            other => Err(other),
        }
    }
}
