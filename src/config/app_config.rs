use serde::{Deserialize, Serialize};

use crate::domain::semantic_cache::SemanticCacheConfig;
use crate::infrastructure::embedding::{DEFAULT_HASHING_DIMENSIONS, DEFAULT_OPENAI_BASE_URL};
use crate::infrastructure::kv::StoreSettings;

/// Environment variable holding the OpenAI key unless configured otherwise
pub const DEFAULT_API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub cache: SemanticCacheConfig,
    pub store: StoreSettings,
    pub embedding: EmbeddingSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

/// Which model loader produces embeddings
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    #[default]
    OpenAi,
    Hashing,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    pub backend: EmbeddingBackend,
    /// OpenAI-compatible API root
    pub base_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Vector size of the hashing backend
    pub dimensions: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::default(),
            base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            dimensions: DEFAULT_HASHING_DIMENSIONS,
        }
    }
}

impl AppConfig {
    /// Load from `config/default`, `config/local` and `SEMCACHE__*` variables
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("SEMCACHE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut loaded: Self = config.try_deserialize()?;
        loaded.cache = loaded.cache.normalized();

        Ok(loaded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::kv::StoreBackend;

    fn from_json(json: serde_json::Value) -> AppConfig {
        config::Config::builder()
            .add_source(config::File::from_str(
                &json.to_string(),
                config::FileFormat::Json,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Pretty);
        assert_eq!(config.cache, SemanticCacheConfig::default());
        assert_eq!(config.store.backend, StoreBackend::InMemory);
        assert_eq!(config.embedding.backend, EmbeddingBackend::OpenAi);
        assert_eq!(config.embedding.api_key_env, "OPENAI_API_KEY");
        assert_eq!(config.embedding.base_url, "https://api.openai.com");
    }

    #[test]
    fn test_empty_source_uses_defaults() {
        let config = from_json(serde_json::json!({}));

        assert_eq!(config.cache.similarity_threshold, 0.95);
        assert_eq!(config.cache.storage_prefix, "semantic-cache");
        assert_eq!(config.embedding.dimensions, 384);
    }

    #[test]
    fn test_partial_sections() {
        let config = from_json(serde_json::json!({
            "logging": { "format": "json" },
            "cache": { "similarity_threshold": 0.9, "max_age_ms": 60000, "debug": true },
            "store": { "backend": "redis", "redis_url": "redis://cache:6379" },
            "embedding": { "backend": "hashing", "dimensions": 128 }
        }));

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, LogFormat::Json);
        assert_eq!(config.cache.similarity_threshold, 0.9);
        assert_eq!(config.cache.max_age_ms, Some(60_000));
        assert!(config.cache.debug);
        assert_eq!(config.cache.model_name, "text-embedding-3-small");
        assert_eq!(config.store.backend, StoreBackend::Redis);
        assert_eq!(config.store.redis_url.as_deref(), Some("redis://cache:6379"));
        assert_eq!(config.embedding.backend, EmbeddingBackend::Hashing);
        assert_eq!(config.embedding.dimensions, 128);
    }
}
