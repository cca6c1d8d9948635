// Out-of-vocabulary policy for categorical encoding

use serde::{Deserialize, Serialize};

/// How a categorical value the transformer was not fitted on is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnknownCategoryPolicy {
    /// Use whatever each fitted encoder block declares.
    #[default]
    Artifact,
    /// Fail the call.
    Error,
    /// Encode as an all-zero block.
    Ignore,
}

impl UnknownCategoryPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            UnknownCategoryPolicy::Artifact => "artifact",
            UnknownCategoryPolicy::Error => "error",
            UnknownCategoryPolicy::Ignore => "ignore",
        }
    }

    /// Resolves the configured policy against a block's fitted policy.
    pub fn resolve(self, fitted: UnknownCategoryPolicy) -> UnknownCategoryPolicy {
        match (self, fitted) {
            (UnknownCategoryPolicy::Artifact, UnknownCategoryPolicy::Artifact) => {
                UnknownCategoryPolicy::Error
            }
            (UnknownCategoryPolicy::Artifact, fitted) => fitted,
            (configured, _) => configured,
        }
    }
}

impl std::str::FromStr for UnknownCategoryPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "artifact" => Ok(UnknownCategoryPolicy::Artifact),
            "error" => Ok(UnknownCategoryPolicy::Error),
            "ignore" => Ok(UnknownCategoryPolicy::Ignore),
            other => Err(format!(
                "unknown category policy '{}', expected artifact|error|ignore",
                other
            )),
        }
    }
}
