use std::env;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use tokio::fs;
use tracing::warn;

use backend_domain::{ArtifactConfig, RuntimeConfig, UnknownCategoryPolicy};

use super::validation::{validate_bind_addr, validate_non_zero, validate_path};

pub const CONFIG_PATH_ENV: &str = "FRAUDSCORE_CONFIG";

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AppConfig {
    pub bind_addr: String,
    pub dataset_path: String,
    pub preprocessor_path: String,
    pub model_path: String,
    pub unknown_category_policy: UnknownCategoryPolicy,
    pub default_list_limit: usize,
    pub max_list_limit: usize,
    pub max_batch_size: usize,
    pub max_body_bytes: u64,
    pub request_timeout_seconds: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        let runtime = RuntimeConfig::default();
        Self {
            bind_addr: runtime.bind_addr,
            dataset_path: "./data/cleaned_Kenya_Fraud_data.csv".to_string(),
            preprocessor_path: "./models/preprocessor.json".to_string(),
            model_path: "./models/isolation_forest.json".to_string(),
            unknown_category_policy: UnknownCategoryPolicy::Artifact,
            default_list_limit: runtime.default_list_limit,
            max_list_limit: runtime.max_list_limit,
            max_batch_size: runtime.max_batch_size,
            max_body_bytes: runtime.max_body_bytes,
            request_timeout_seconds: runtime.request_timeout_seconds,
        }
    }
}

impl AppConfig {
    pub async fn load() -> Result<Self> {
        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| "./config.toml".to_string());
        Self::load_from(Path::new(&path), |key| env::var(key).ok()).await
    }

    /// Reads `file_path` (defaults when absent), then applies overrides from
    /// `lookup`, resolves relative paths against the file's directory and
    /// validates the result.
    pub async fn load_from<F>(file_path: &Path, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_dir = file_path.parent();
        let mut config = if file_path.exists() {
            let content = fs::read_to_string(file_path)
                .await
                .with_context(|| format!("failed to read {}", file_path.display()))?;
            toml::from_str::<AppConfig>(&content)
                .with_context(|| format!("failed to parse {}", file_path.display()))?
        } else {
            warn!(path = %file_path.display(), "config file not found, using defaults");
            AppConfig::default()
        };
        config.apply_overrides(lookup)?;
        config.resolve_paths(base_dir);
        config.normalize();
        config.validate()?;
        Ok(config)
    }

    pub fn normalize(&mut self) {
        self.bind_addr = self.bind_addr.trim().to_string();
        self.dataset_path = self.dataset_path.trim().to_string();
        self.preprocessor_path = self.preprocessor_path.trim().to_string();
        self.model_path = self.model_path.trim().to_string();
    }

    fn resolve_paths(&mut self, base_dir: Option<&Path>) {
        let Some(base) = base_dir else {
            return;
        };
        self.dataset_path = resolve_path(base, &self.dataset_path);
        self.preprocessor_path = resolve_path(base, &self.preprocessor_path);
        self.model_path = resolve_path(base, &self.model_path);
    }

    pub fn validate(&self) -> Result<()> {
        validate_bind_addr(&self.bind_addr)?;
        validate_path("dataset_path", &self.dataset_path)?;
        validate_path("preprocessor_path", &self.preprocessor_path)?;
        validate_path("model_path", &self.model_path)?;
        validate_non_zero("max_list_limit", self.max_list_limit as u64)?;
        validate_non_zero("max_batch_size", self.max_batch_size as u64)?;
        validate_non_zero("max_body_bytes", self.max_body_bytes)?;
        validate_non_zero("request_timeout_seconds", self.request_timeout_seconds)?;
        if self.default_list_limit > self.max_list_limit {
            return Err(anyhow!(
                "default_list_limit ({}) exceeds max_list_limit ({})",
                self.default_list_limit,
                self.max_list_limit
            ));
        }
        Ok(())
    }

    pub fn to_runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            bind_addr: self.bind_addr.clone(),
            default_list_limit: self.default_list_limit,
            max_list_limit: self.max_list_limit,
            max_batch_size: self.max_batch_size,
            max_body_bytes: self.max_body_bytes,
            request_timeout_seconds: self.request_timeout_seconds,
        }
    }

    pub fn to_artifact_config(&self) -> ArtifactConfig {
        ArtifactConfig {
            dataset_path: self.dataset_path.clone(),
            preprocessor_path: self.preprocessor_path.clone(),
            model_path: self.model_path.clone(),
            unknown_category_policy: self.unknown_category_policy,
        }
    }

    fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup("FRAUDSCORE_BIND_ADDR") {
            self.bind_addr = value;
        }
        if let Some(value) = lookup("FRAUDSCORE_DATASET_PATH") {
            self.dataset_path = value;
        }
        if let Some(value) = lookup("FRAUDSCORE_PREPROCESSOR_PATH") {
            self.preprocessor_path = value;
        }
        if let Some(value) = lookup("FRAUDSCORE_MODEL_PATH") {
            self.model_path = value;
        }
        if let Some(value) = lookup("FRAUDSCORE_UNKNOWN_CATEGORY_POLICY") {
            // Unlike the numeric knobs, a bad policy is fatal.
            self.unknown_category_policy = value
                .parse::<UnknownCategoryPolicy>()
                .map_err(|err| anyhow!("FRAUDSCORE_UNKNOWN_CATEGORY_POLICY: {}", err))?;
        }
        if let Some(value) = lookup("FRAUDSCORE_DEFAULT_LIST_LIMIT") {
            self.default_list_limit =
                parse_or_keep("FRAUDSCORE_DEFAULT_LIST_LIMIT", &value, self.default_list_limit);
        }
        if let Some(value) = lookup("FRAUDSCORE_MAX_LIST_LIMIT") {
            self.max_list_limit =
                parse_or_keep("FRAUDSCORE_MAX_LIST_LIMIT", &value, self.max_list_limit);
        }
        if let Some(value) = lookup("FRAUDSCORE_MAX_BATCH_SIZE") {
            self.max_batch_size =
                parse_or_keep("FRAUDSCORE_MAX_BATCH_SIZE", &value, self.max_batch_size);
        }
        if let Some(value) = lookup("FRAUDSCORE_MAX_BODY_BYTES") {
            self.max_body_bytes =
                parse_or_keep("FRAUDSCORE_MAX_BODY_BYTES", &value, self.max_body_bytes);
        }
        if let Some(value) = lookup("FRAUDSCORE_REQUEST_TIMEOUT_SECONDS") {
            self.request_timeout_seconds = parse_or_keep(
                "FRAUDSCORE_REQUEST_TIMEOUT_SECONDS",
                &value,
                self.request_timeout_seconds,
            );
        }
        Ok(())
    }
}

fn parse_or_keep<T: std::str::FromStr>(key: &str, value: &str, current: T) -> T {
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            warn!(key, value, "ignoring unparsable environment override");
            current
        }
    }
}

fn resolve_path(base: &Path, value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return trimmed.to_string();
    }
    let path = Path::new(trimmed);
    if path.is_absolute() {
        trimmed.to_string()
    } else {
        base.join(path).to_string_lossy().to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use super::*;

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = env::temp_dir().join(format!("fraudscore-config-{}-{}", name, std::process::id()));
        std::fs::create_dir_all(&dir).expect("create scratch dir");
        dir
    }

    #[tokio::test]
    async fn missing_file_falls_back_to_defaults() {
        let dir = scratch_dir("missing");
        let config = AppConfig::load_from(&dir.join("absent.toml"), |_| None)
            .await
            .expect("defaults load");
        assert_eq!(config.bind_addr, "127.0.0.1:8000");
        assert_eq!(config.default_list_limit, 1000);
        assert_eq!(config.unknown_category_policy, UnknownCategoryPolicy::Artifact);
        assert!(config.model_path.ends_with("models/isolation_forest.json"));
    }

    #[tokio::test]
    async fn file_values_resolve_relative_to_config_dir() {
        let dir = scratch_dir("file");
        let path = dir.join("config.toml");
        std::fs::write(
            &path,
            r#"
bind_addr = "0.0.0.0:9000"
preprocessor_path = "artifacts/pre.json"
model_path = "/srv/model.json"
unknown_category_policy = "ignore"
max_batch_size = 50
"#,
        )
        .expect("write config");

        let config = AppConfig::load_from(&path, |_| None).await.expect("load");
        assert_eq!(config.bind_addr, "0.0.0.0:9000");
        assert_eq!(
            PathBuf::from(&config.preprocessor_path),
            dir.join("artifacts/pre.json")
        );
        assert_eq!(config.model_path, "/srv/model.json");
        assert_eq!(config.unknown_category_policy, UnknownCategoryPolicy::Ignore);
        assert_eq!(config.to_runtime_config().max_batch_size, 50);
    }

    #[tokio::test]
    async fn environment_overrides_win_over_file() {
        let dir = scratch_dir("env");
        let path = dir.join("config.toml");
        std::fs::write(&path, "max_list_limit = 500\ndefault_list_limit = 100\n")
            .expect("write config");
        let vars: HashMap<&str, &str> = HashMap::from([
            ("FRAUDSCORE_MAX_LIST_LIMIT", "2000"),
            ("FRAUDSCORE_UNKNOWN_CATEGORY_POLICY", "error"),
            ("FRAUDSCORE_REQUEST_TIMEOUT_SECONDS", "not-a-number"),
        ]);

        let config = AppConfig::load_from(&path, |key| vars.get(key).map(|v| v.to_string()))
            .await
            .expect("load");
        assert_eq!(config.max_list_limit, 2000);
        assert_eq!(config.default_list_limit, 100);
        assert_eq!(config.unknown_category_policy, UnknownCategoryPolicy::Error);
        assert_eq!(config.request_timeout_seconds, 15);
        assert_eq!(
            config.to_artifact_config().unknown_category_policy,
            UnknownCategoryPolicy::Error
        );
    }

    #[tokio::test]
    async fn unparsable_policy_override_fails_load() {
        let dir = scratch_dir("policy");
        let err = AppConfig::load_from(&dir.join("absent.toml"), |key| {
            (key == "FRAUDSCORE_UNKNOWN_CATEGORY_POLICY").then(|| "ignroe".to_string())
        })
        .await
        .expect_err("policy typo");
        assert!(err.to_string().contains("ignroe"));
    }

    #[test]
    fn validation_rejects_inconsistent_limits() {
        let config = AppConfig {
            default_list_limit: 10,
            max_list_limit: 5,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            bind_addr: "nowhere".to_string(),
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());

        let config = AppConfig {
            max_batch_size: 0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
        assert!(AppConfig::default().validate().is_ok());
    }

    #[tokio::test]
    async fn malformed_file_is_an_error() {
        let dir = scratch_dir("malformed");
        let path = dir.join("config.toml");
        std::fs::write(&path, "max_batch_size = \"lots\"\n").expect("write config");
        assert!(AppConfig::load_from(&path, |_| None).await.is_err());
    }
}
