use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use url::Url;

use crate::error::{AppError, Result};

pub const ENV_MINIFLUX_URL: &str = "MINIFLUX_URL";
pub const ENV_MINIFLUX_API_KEY: &str = "MINIFLUX_API_KEY";
pub const ENV_OPENAI_MODEL: &str = "OPENAI_MODEL";
pub const ENV_CATEGORY_ID: &str = "CATEGORY_ID";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const ENV_MAX_ENTRIES: &str = "MAX_ENTRIES";
pub const ENV_CONFIG_PATH: &str = "FEED_ANNOTATOR_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub miniflux_url: Option<String>,
    pub miniflux_api_key: Option<String>,
    pub openai_model: Option<String>,
    pub openai_api_key: Option<String>,

    #[serde(default = "default_openai_base_url")]
    pub openai_base_url: String,

    #[serde(default = "default_category_id")]
    pub category_id: i64,

    #[serde(default = "default_max_entries")]
    pub max_entries: usize,

    #[serde(default = "default_feed_timeout")]
    pub feed_timeout_secs: u64,

    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,

    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,

    #[serde(default = "default_translation_max_tokens")]
    pub translation_max_tokens: u32,
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_category_id() -> i64 {
    4
}

fn default_max_entries() -> usize {
    1
}

fn default_feed_timeout() -> u64 {
    10
}

fn default_model_timeout() -> u64 {
    600
}

fn default_summary_max_tokens() -> u32 {
    300
}

fn default_translation_max_tokens() -> u32 {
    30000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            miniflux_url: None,
            miniflux_api_key: None,
            openai_model: None,
            openai_api_key: None,
            openai_base_url: default_openai_base_url(),
            category_id: default_category_id(),
            max_entries: default_max_entries(),
            feed_timeout_secs: default_feed_timeout(),
            model_timeout_secs: default_model_timeout(),
            summary_max_tokens: default_summary_max_tokens(),
            translation_max_tokens: default_translation_max_tokens(),
        }
    }
}

/// Fully validated settings for one run.
#[derive(Debug, Clone)]
pub struct JobConfig {
    pub feed: FeedSettings,
    pub model: ModelSettings,
    pub category_id: i64,
    pub max_entries: usize,
}

#[derive(Debug, Clone)]
pub struct FeedSettings {
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct ModelSettings {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub timeout: Duration,
    pub summary_max_tokens: u32,
    pub translation_max_tokens: u32,
}

impl Config {
    /// Reads the optional config file, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let config_path = std::env::var(ENV_CONFIG_PATH)
            .ok()
            .filter(|p| !p.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(Self::config_path);

        let mut config = Self::from_file(&config_path)?;
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            tracing::debug!("Loaded config from {:?}", path);
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Overrides fields with values from `lookup`. Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(v) = get(ENV_MINIFLUX_URL) {
            self.miniflux_url = Some(v);
        }
        if let Some(v) = get(ENV_MINIFLUX_API_KEY) {
            self.miniflux_api_key = Some(v);
        }
        if let Some(v) = get(ENV_OPENAI_MODEL) {
            self.openai_model = Some(v);
        }
        if let Some(v) = get(ENV_OPENAI_API_KEY) {
            self.openai_api_key = Some(v);
        }
        if let Some(v) = get(ENV_OPENAI_BASE_URL) {
            self.openai_base_url = v;
        }
        if let Some(v) = get(ENV_CATEGORY_ID) {
            self.category_id = v.parse().map_err(|_| {
                AppError::Config(format!("{} must be an integer, got {:?}", ENV_CATEGORY_ID, v))
            })?;
        }
        if let Some(v) = get(ENV_MAX_ENTRIES) {
            self.max_entries = v.parse().map_err(|_| {
                AppError::Config(format!(
                    "{} must be a non-negative integer, got {:?}",
                    ENV_MAX_ENTRIES, v
                ))
            })?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<JobConfig> {
        let mut missing = Vec::new();
        if is_blank(&self.miniflux_url) {
            missing.push(ENV_MINIFLUX_URL);
        }
        if is_blank(&self.miniflux_api_key) {
            missing.push(ENV_MINIFLUX_API_KEY);
        }
        if is_blank(&self.openai_model) {
            missing.push(ENV_OPENAI_MODEL);
        }
        if !missing.is_empty() {
            return Err(AppError::Config(format!(
                "missing required settings: {}",
                missing.join(", ")
            )));
        }

        let miniflux_url = normalize_base_url(self.miniflux_url.as_deref().unwrap_or_default())?;
        let openai_base_url = normalize_base_url(&self.openai_base_url)?;

        if self.max_entries == 0 {
            return Err(AppError::Config(
                "max_entries must be at least 1".to_string(),
            ));
        }

        Ok(JobConfig {
            feed: FeedSettings {
                base_url: miniflux_url,
                api_key: self.miniflux_api_key.clone().unwrap_or_default(),
                timeout: Duration::from_secs(self.feed_timeout_secs),
            },
            model: ModelSettings {
                model: self.openai_model.clone().unwrap_or_default(),
                api_key: self.openai_api_key.clone(),
                base_url: openai_base_url,
                timeout: Duration::from_secs(self.model_timeout_secs),
                summary_max_tokens: self.summary_max_tokens,
                translation_max_tokens: self.translation_max_tokens,
            },
            category_id: self.category_id,
            max_entries: self.max_entries,
        })
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("feed-annotator")
            .join("config.toml")
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, |v| v.trim().is_empty())
}

fn normalize_base_url(raw: &str) -> Result<String> {
    let parsed = Url::parse(raw)
        .map_err(|e| AppError::Config(format!("invalid base URL {:?}: {}", raw, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(AppError::Config(format!(
            "base URL {:?} must use http or https",
            raw
        )));
    }
    Ok(raw.trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn required() -> Vec<(&'static str, &'static str)> {
        vec![
            (ENV_MINIFLUX_URL, "https://reader.example.com/"),
            (ENV_MINIFLUX_API_KEY, "secret"),
            (ENV_OPENAI_MODEL, "gpt-4o-mini"),
        ]
    }

    #[test]
    fn defaults_apply_when_only_required_values_set() {
        let mut config = Config::default();
        config.apply_env(env(&required())).unwrap();
        let job = config.validate().unwrap();

        assert_eq!(job.category_id, 4);
        assert_eq!(job.max_entries, 1);
        assert_eq!(job.feed.base_url, "https://reader.example.com");
        assert_eq!(job.feed.timeout, Duration::from_secs(10));
        assert_eq!(job.model.base_url, "https://api.openai.com/v1");
        assert_eq!(job.model.summary_max_tokens, 300);
        assert_eq!(job.model.translation_max_tokens, 30000);
        assert!(job.model.api_key.is_none());
    }

    #[test]
    fn missing_required_values_are_all_reported() {
        let mut config = Config::default();
        config
            .apply_env(env(&[(ENV_MINIFLUX_URL, "https://reader.example.com")]))
            .unwrap();

        let err = tokio_test::assert_err!(config.validate());
        let message = err.to_string();
        assert!(matches!(err, AppError::Config(_)));
        assert!(message.contains(ENV_MINIFLUX_API_KEY));
        assert!(message.contains(ENV_OPENAI_MODEL));
        assert!(!message.contains(ENV_MINIFLUX_URL));
    }

    #[test]
    fn empty_env_values_count_as_missing() {
        let mut pairs = required();
        pairs[1] = (ENV_MINIFLUX_API_KEY, "  ");
        let mut config = Config::default();
        config.apply_env(env(&pairs)).unwrap();

        tokio_test::assert_err!(config.validate());
    }

    #[test]
    fn overrides_category_and_batch_cap() {
        let mut pairs = required();
        pairs.push((ENV_CATEGORY_ID, "12"));
        pairs.push((ENV_MAX_ENTRIES, "5"));
        pairs.push((ENV_OPENAI_API_KEY, "sk-test"));
        pairs.push((ENV_OPENAI_BASE_URL, "http://localhost:11434/v1/"));

        let mut config = Config::default();
        config.apply_env(env(&pairs)).unwrap();
        let job = config.validate().unwrap();

        assert_eq!(job.category_id, 12);
        assert_eq!(job.max_entries, 5);
        assert_eq!(job.model.api_key.as_deref(), Some("sk-test"));
        assert_eq!(job.model.base_url, "http://localhost:11434/v1");
    }

    #[test]
    fn non_numeric_category_is_rejected() {
        let mut pairs = required();
        pairs.push((ENV_CATEGORY_ID, "news"));
        let mut config = Config::default();

        let err = config.apply_env(env(&pairs)).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
    }

    #[test]
    fn zero_batch_cap_is_rejected() {
        let mut pairs = required();
        pairs.push((ENV_MAX_ENTRIES, "0"));
        let mut config = Config::default();
        config.apply_env(env(&pairs)).unwrap();

        tokio_test::assert_err!(config.validate());
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let mut pairs = required();
        pairs[0] = (ENV_MINIFLUX_URL, "reader.example.com");
        let mut config = Config::default();
        config.apply_env(env(&pairs)).unwrap();

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("invalid base URL"));
    }

    #[test]
    fn env_overrides_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
miniflux_url = "https://file.example.com"
miniflux_api_key = "from-file"
openai_model = "file-model"
category_id = 7
summary_max_tokens = 512
"#
        )
        .unwrap();

        let mut config = Config::from_file(file.path()).unwrap();
        config
            .apply_env(env(&[(ENV_OPENAI_MODEL, "env-model")]))
            .unwrap();
        let job = config.validate().unwrap();

        assert_eq!(job.feed.base_url, "https://file.example.com");
        assert_eq!(job.feed.api_key, "from-file");
        assert_eq!(job.model.model, "env-model");
        assert_eq!(job.category_id, 7);
        assert_eq!(job.model.summary_max_tokens, 512);
        assert_eq!(job.model.translation_max_tokens, 30000);
    }

    #[test]
    fn missing_config_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_file(&dir.path().join("absent.toml")).unwrap();

        assert!(config.miniflux_url.is_none());
        assert_eq!(config.category_id, 4);
    }
}
