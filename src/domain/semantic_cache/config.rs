//! Semantic cache configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_SIMILARITY_THRESHOLD: f32 = 0.95;
pub const DEFAULT_MODEL_NAME: &str = "text-embedding-3-small";
pub const DEFAULT_STORAGE_PREFIX: &str = "semantic-cache";

/// Configuration for one semantic cache instance
///
/// Bound at construction and never changed afterwards. Entries written under
/// one `storage_prefix` must all come from the same `model_name`, since
/// vectors of different models are not comparable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticCacheConfig {
    /// Minimum similarity (0.0 to 1.0) for a stored prompt to count as a hit
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Maximum entry age in milliseconds; `None` keeps entries forever
    #[serde(default)]
    pub max_age_ms: Option<u64>,

    /// Embedding model identifier
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Log every lookup decision at info level
    #[serde(default)]
    pub debug: bool,

    /// Namespace prefix for stored entries
    #[serde(default = "default_storage_prefix")]
    pub storage_prefix: String,
}

fn default_similarity_threshold() -> f32 {
    DEFAULT_SIMILARITY_THRESHOLD
}

fn default_model_name() -> String {
    DEFAULT_MODEL_NAME.to_string()
}

fn default_storage_prefix() -> String {
    DEFAULT_STORAGE_PREFIX.to_string()
}

impl Default for SemanticCacheConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: default_similarity_threshold(),
            max_age_ms: None,
            model_name: default_model_name(),
            debug: false,
            storage_prefix: default_storage_prefix(),
        }
    }
}

impl SemanticCacheConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the maximum age as a Duration
    pub fn max_age(&self) -> Option<Duration> {
        self.max_age_ms.map(Duration::from_millis)
    }

    /// Bring values loaded from files or the environment into range
    pub fn normalized(mut self) -> Self {
        self.similarity_threshold = clamp_threshold(self.similarity_threshold);
        self.max_age_ms = self.max_age_ms.filter(|ms| *ms > 0);
        self
    }

    /// Set the similarity threshold
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = clamp_threshold(threshold);
        self
    }

    /// Set the maximum entry age; zero disables expiration
    pub fn with_max_age(mut self, max_age: Duration) -> Self {
        let ms = max_age.as_millis() as u64;
        self.max_age_ms = (ms > 0).then_some(ms);
        self
    }

    /// Set the embedding model
    pub fn with_model_name(mut self, model: impl Into<String>) -> Self {
        self.model_name = model.into();
        self
    }

    /// Set debug logging
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Set the storage prefix
    pub fn with_storage_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.storage_prefix = prefix.into();
        self
    }
}

fn clamp_threshold(threshold: f32) -> f32 {
    if threshold.is_nan() {
        return DEFAULT_SIMILARITY_THRESHOLD;
    }
    threshold.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SemanticCacheConfig::default();

        assert!((config.similarity_threshold - 0.95).abs() < f32::EPSILON);
        assert_eq!(config.max_age(), None);
        assert_eq!(config.model_name, "text-embedding-3-small");
        assert!(!config.debug);
        assert_eq!(config.storage_prefix, "semantic-cache");
    }

    #[test]
    fn test_config_builder() {
        let config = SemanticCacheConfig::new()
            .with_similarity_threshold(0.9)
            .with_max_age(Duration::from_secs(60))
            .with_model_name("custom-model")
            .with_debug(true)
            .with_storage_prefix("custom:ns");

        assert!((config.similarity_threshold - 0.9).abs() < f32::EPSILON);
        assert_eq!(config.max_age_ms, Some(60_000));
        assert_eq!(config.max_age(), Some(Duration::from_secs(60)));
        assert_eq!(config.model_name, "custom-model");
        assert!(config.debug);
        assert_eq!(config.storage_prefix, "custom:ns");
    }

    #[test]
    fn test_zero_max_age_never_expires() {
        let config = SemanticCacheConfig::new().with_max_age(Duration::ZERO);
        assert_eq!(config.max_age_ms, None);
    }

    #[test]
    fn test_similarity_threshold_clamped() {
        let config = SemanticCacheConfig::new().with_similarity_threshold(1.5);
        assert_eq!(config.similarity_threshold, 1.0);

        let config = SemanticCacheConfig::new().with_similarity_threshold(-0.5);
        assert_eq!(config.similarity_threshold, 0.0);

        let config = SemanticCacheConfig::new().with_similarity_threshold(f32::NAN);
        assert_eq!(config.similarity_threshold, DEFAULT_SIMILARITY_THRESHOLD);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: SemanticCacheConfig =
            serde_json::from_str(r#"{"similarity_threshold": 2.0, "max_age_ms": 0}"#).unwrap();
        let config = config.normalized();

        assert_eq!(config.similarity_threshold, 1.0);
        assert_eq!(config.max_age_ms, None);
        assert_eq!(config.storage_prefix, DEFAULT_STORAGE_PREFIX);
    }
}
