//! Run configuration: which feeds to poll, how sources map to digest
//! categories, and the politeness delays between external calls.
//!
//! A default configuration is compiled into the binary from
//! `config/default.yaml`. Passing `--config path.yaml` replaces it entirely.

use crate::error::{DigestError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument};
use url::Url;

const BUILTIN_CONFIG: &str = include_str!("../config/default.yaml");

/// Category assigned to sources missing from the lookup table.
pub const FALLBACK_CATEGORY: &str = "Other";

/// Everything the pipeline needs to know that is not a per-run parameter.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DigestConfig {
    /// Feed URLs, polled in this order.
    pub feeds: Vec<String>,
    /// Feed title to category name.
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
    #[serde(default)]
    pub delays: Delays,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Timeout for a single article page fetch.
    #[serde(default = "default_page_timeout_secs")]
    pub page_timeout_secs: u64,
    /// Model used for summaries.
    #[serde(default = "default_model")]
    pub model: String,
}

/// Fixed pauses between external calls, in milliseconds.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct Delays {
    #[serde(default = "default_between_entries_ms")]
    pub between_entries_ms: u64,
    #[serde(default = "default_between_feeds_ms")]
    pub between_feeds_ms: u64,
    #[serde(default = "default_between_summaries_ms")]
    pub between_summaries_ms: u64,
}

impl Default for Delays {
    fn default() -> Self {
        Self {
            between_entries_ms: default_between_entries_ms(),
            between_feeds_ms: default_between_feeds_ms(),
            between_summaries_ms: default_between_summaries_ms(),
        }
    }
}

impl Delays {
    /// No pauses at all.
    #[cfg(test)]
    pub fn none() -> Self {
        Self {
            between_entries_ms: 0,
            between_feeds_ms: 0,
            between_summaries_ms: 0,
        }
    }

    pub fn between_entries(&self) -> Duration {
        Duration::from_millis(self.between_entries_ms)
    }

    pub fn between_feeds(&self) -> Duration {
        Duration::from_millis(self.between_feeds_ms)
    }

    pub fn between_summaries(&self) -> Duration {
        Duration::from_millis(self.between_summaries_ms)
    }
}

fn default_between_entries_ms() -> u64 {
    1500
}

fn default_between_feeds_ms() -> u64 {
    2000
}

fn default_between_summaries_ms() -> u64 {
    1000
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".to_string()
}

fn default_page_timeout_secs() -> u64 {
    10
}

fn default_model() -> String {
    "claude-3-5-sonnet-20241022".to_string()
}

impl DigestConfig {
    /// The configuration compiled into the binary.
    pub fn builtin() -> Result<Self> {
        Self::from_yaml_str(BUILTIN_CONFIG)
    }

    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: DigestConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, or fall back to the built-in configuration.
    #[instrument(level = "info")]
    pub async fn load(path: Option<&str>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let yaml = fs::read_to_string(path).await?;
                Self::from_yaml_str(&yaml)?
            }
            None => Self::builtin()?,
        };
        info!(
            feeds = config.feeds.len(),
            categories = config.categories.len(),
            source = path.unwrap_or("builtin"),
            "Loaded configuration"
        );
        Ok(config)
    }

    /// Every feed must be an absolute http(s) URL.
    pub fn validate(&self) -> Result<()> {
        for feed in &self.feeds {
            let parsed = Url::parse(feed)
                .map_err(|e| DigestError::Config(format!("invalid feed URL {feed:?}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(DigestError::Config(format!(
                    "feed URL {feed:?} must use http or https"
                )));
            }
        }
        if self.page_timeout_secs == 0 {
            return Err(DigestError::Config(
                "page_timeout_secs must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Category for a source name, or [`FALLBACK_CATEGORY`].
    pub fn category_for(&self, source: &str) -> &str {
        self.categories
            .get(source)
            .map(String::as_str)
            .unwrap_or(FALLBACK_CATEGORY)
    }

    pub fn page_timeout(&self) -> Duration {
        Duration::from_secs(self.page_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_config_loads() {
        let config = DigestConfig::builtin().unwrap();
        assert_eq!(config.feeds.len(), 28);
        assert_eq!(config.delays, Delays::default());
        assert_eq!(config.page_timeout_secs, 10);
        assert_eq!(
            config.category_for("Lenny's Newsletter"),
            "Product & Entrepreneurship"
        );
        assert_eq!(
            config.category_for("6 'P's in AI Pods (AI6P)"),
            "AI Analysis & Insights"
        );
    }

    #[test]
    fn test_unknown_source_is_other() {
        let config = DigestConfig::builtin().unwrap();
        assert_eq!(config.category_for("Some Brand New Newsletter"), "Other");
        assert_eq!(config.category_for(""), "Other");
    }

    #[test]
    fn test_minimal_yaml_uses_defaults() {
        let config = DigestConfig::from_yaml_str("feeds:\n  - https://example.com/feed\n").unwrap();
        assert_eq!(config.feeds, vec!["https://example.com/feed".to_string()]);
        assert!(config.categories.is_empty());
        assert_eq!(config.delays.between_feeds_ms, 2000);
        assert_eq!(config.model, "claude-3-5-sonnet-20241022");
    }

    #[test]
    fn test_rejects_invalid_feed_url() {
        let err = DigestConfig::from_yaml_str("feeds:\n  - not a url\n").unwrap_err();
        assert!(matches!(err, DigestError::Config(_)));

        let err = DigestConfig::from_yaml_str("feeds:\n  - ftp://example.com/feed\n").unwrap_err();
        assert!(matches!(err, DigestError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_yaml() {
        let err = DigestConfig::from_yaml_str("feeds: [unterminated").unwrap_err();
        assert!(matches!(err, DigestError::ConfigParse(_)));
    }

    #[tokio::test]
    async fn test_load_from_file_replaces_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digest.yaml");
        std::fs::write(
            &path,
            "feeds:\n  - https://example.com/feed\ncategories:\n  Example: Testing\n",
        )
        .unwrap();

        let config = DigestConfig::load(path.to_str()).await.unwrap();
        assert_eq!(config.feeds.len(), 1);
        assert_eq!(config.category_for("Example"), "Testing");
        assert_eq!(config.category_for("Lenny's Newsletter"), "Other");
    }
}
