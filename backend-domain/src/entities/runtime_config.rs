use serde::{Deserialize, Serialize};

use crate::value_objects::UnknownCategoryPolicy;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub bind_addr: String,
    pub default_list_limit: usize,
    pub max_list_limit: usize,
    pub max_batch_size: usize,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl RuntimeConfig {
    /// Applies the listing default and ceiling to a caller-supplied cap.
    pub fn effective_limit(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_list_limit)
            .min(self.max_list_limit)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
            default_list_limit: 1000,
            max_list_limit: 100_000,
            max_batch_size: 10_000,
            max_body_bytes: 8 * 1024 * 1024,
            request_timeout_seconds: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactConfig {
    pub dataset_path: String,
    pub preprocessor_path: String,
    pub model_path: String,
    pub unknown_category_policy: UnknownCategoryPolicy,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn effective_limit_defaults_and_clamps() {
        let config = RuntimeConfig {
            default_list_limit: 1000,
            max_list_limit: 5000,
            ..RuntimeConfig::default()
        };
        assert_eq!(config.effective_limit(None), 1000);
        assert_eq!(config.effective_limit(Some(0)), 0);
        assert_eq!(config.effective_limit(Some(20)), 20);
        assert_eq!(config.effective_limit(Some(1_000_000)), 5000);
    }
}
