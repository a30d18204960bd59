//! PMP Semantic Cache
//!
//! Replays stored LLM responses for prompts that are close in meaning to one
//! already answered:
//! - Cosine similarity over prompt embeddings with a configurable threshold
//! - Fail-open lookups, fail-loud writes
//! - Namespaced entries over in-memory (moka) or Redis key-value stores
//! - OpenAI or offline hashing embeddings, loaded lazily

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{EmbeddingBackend, EmbeddingSettings};
use crate::domain::embedding::ModelLoader;
use crate::infrastructure::{
    embedding::{HashingModelLoader, OpenAiModelLoader},
    kv::KeyValueStoreFactory,
    llm::HttpClient,
    services::SemanticCacheEngine,
};

/// Build a semantic cache engine from configuration
///
/// Connects to the configured store. The embedding model is not loaded
/// until first use.
pub async fn create_engine(config: &AppConfig) -> anyhow::Result<SemanticCacheEngine> {
    let kv = KeyValueStoreFactory::new().create(&config.store).await?;
    let loader = create_model_loader(&config.embedding);
    let engine = SemanticCacheEngine::from_config(kv, loader, config.cache.clone());

    info!(
        "Semantic cache '{}' ready (store: {}, embeddings: {:?}, threshold: {})",
        engine.namespace(),
        config.store.backend,
        config.embedding.backend,
        config.cache.similarity_threshold
    );

    Ok(engine)
}

fn create_model_loader(settings: &EmbeddingSettings) -> Arc<dyn ModelLoader> {
    match settings.backend {
        EmbeddingBackend::OpenAi => {
            let api_key = std::env::var(&settings.api_key_env).unwrap_or_else(|_| {
                warn!(
                    "{} is not set; embedding requests will fail",
                    settings.api_key_env
                );
                String::new()
            });

            Arc::new(OpenAiModelLoader::with_base_url(
                HttpClient::new(),
                api_key,
                settings.base_url.clone(),
            ))
        }
        EmbeddingBackend::Hashing => Arc::new(HashingModelLoader::new(settings.dimensions)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_engine_with_defaults() {
        let engine = create_engine(&AppConfig::default()).await.unwrap();

        assert_eq!(engine.namespace(), "semantic-cache");
        assert!(!engine.is_model_loaded());
        assert_eq!(engine.get_stats().await.unwrap().total_entries, 0);
    }

    #[tokio::test]
    async fn test_openai_without_key_fails_open() {
        let mut config = AppConfig::default();
        config.embedding.api_key_env = "SEMCACHE_TEST_KEY_THAT_IS_NOT_SET".to_string();
        let engine = create_engine(&config).await.unwrap();

        let result = engine.query("anything").await.unwrap();

        assert!(!result.hit);
        assert!(engine.save("anything", "answer", None).await.is_err());
        assert_eq!(engine.counters().fail_open, 1);
    }

    #[tokio::test]
    async fn test_hashing_engine_round_trip() {
        let mut config = AppConfig::default();
        config.embedding.backend = EmbeddingBackend::Hashing;
        config.embedding.dimensions = 64;
        let engine = create_engine(&config).await.unwrap();

        engine.save("How do I sort a vector?", "Use sort()", None).await.unwrap();
        let result = engine.query("how do i sort a vector").await.unwrap();

        assert!(result.hit);
        assert_eq!(result.response.as_deref(), Some("Use sort()"));
    }

    #[tokio::test]
    async fn test_hashing_engine_round_trip_without_words() {
        let mut config = AppConfig::default();
        config.embedding.backend = EmbeddingBackend::Hashing;
        config.embedding.dimensions = 64;
        let engine = create_engine(&config).await.unwrap();

        for prompt in ["🙂🙂", "?!"] {
            engine.save(prompt, "reply", None).await.unwrap();
            let result = engine.query(prompt).await.unwrap();

            assert!(result.hit, "no hit for {:?}", prompt);
            assert_eq!(result.similarity, Some(1.0));
        }
    }
}
