//! Semantic cache engine
//!
//! Decides hit or miss for a prompt by comparing its embedding against every
//! entry stored under the configured namespace. Lookups fail open: embedding
//! and storage failures during `query` are logged and answered with a miss.
//! Writes (`save`, `clear`, `invalidate`) propagate their errors.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::embedding::{EmbeddingProvider, ModelLoader};
use crate::domain::kv::KeyValueStore;
use crate::domain::semantic_cache::{
    entry_key, now_millis, CacheCounters, CacheEntry, CacheStats, CounterSnapshot, EntryMetadata,
    EntryStore, QueryResult, SemanticCacheConfig,
};
use crate::domain::similarity::cosine_similarity;
use crate::domain::DomainError;
use crate::infrastructure::embedding::LazyEmbeddingProvider;
use crate::infrastructure::semantic_cache::NamespacedEntryStore;

/// Text embedded by [`SemanticCacheEngine::preload_model`]
const WARMUP_TEXT: &str = "warmup";

/// Best candidate of a scan
struct BestMatch {
    entry: CacheEntry,
    similarity: f32,
}

/// Semantic cache over an entry store and an embedding provider
#[derive(Debug)]
pub struct SemanticCacheEngine {
    store: Arc<dyn EntryStore>,
    embedder: Arc<dyn EmbeddingProvider>,
    config: SemanticCacheConfig,
    counters: CacheCounters,
}

impl SemanticCacheEngine {
    /// Engine over ready-made parts
    ///
    /// `storage_prefix` and `model_name` of the stored config are taken from
    /// `store` and `embedder`, which are authoritative.
    pub fn new(
        store: Arc<dyn EntryStore>,
        embedder: Arc<dyn EmbeddingProvider>,
        config: SemanticCacheConfig,
    ) -> Self {
        let mut config = config.normalized();
        config.storage_prefix = store.namespace().to_string();
        config.model_name = embedder.model_name().to_string();

        Self {
            store,
            embedder,
            config,
            counters: CacheCounters::default(),
        }
    }

    /// Engine whose namespace is `config.storage_prefix` on `kv` and whose
    /// `config.model_name` is loaded lazily through `loader`
    pub fn from_config(
        kv: Arc<dyn KeyValueStore>,
        loader: Arc<dyn ModelLoader>,
        config: SemanticCacheConfig,
    ) -> Self {
        let config = config.normalized();
        let store = Arc::new(NamespacedEntryStore::new(kv, config.storage_prefix.clone()));
        let embedder = Arc::new(LazyEmbeddingProvider::new(loader, config.model_name.clone()));

        Self::new(store, embedder, config)
    }

    pub fn config(&self) -> &SemanticCacheConfig {
        &self.config
    }

    /// Namespace of the underlying store
    pub fn namespace(&self) -> &str {
        self.store.namespace()
    }

    /// Look up a semantically similar prompt
    ///
    /// Only a dimension mismatch between the query and a stored vector is
    /// returned as an error; any other failure yields a miss.
    pub async fn query(&self, prompt: &str) -> Result<QueryResult, DomainError> {
        match self.lookup(prompt).await {
            Ok(result) => {
                if result.hit {
                    self.counters.record_hit();
                } else {
                    self.counters.record_miss();
                }
                Ok(result)
            }
            Err(e) if e.is_fail_open() => {
                warn!("Semantic cache lookup failed, treating as miss: {}", e);
                self.counters.record_fail_open();
                Ok(QueryResult::miss(None))
            }
            Err(e) => Err(e),
        }
    }

    async fn lookup(&self, prompt: &str) -> Result<QueryResult, DomainError> {
        let swept = self.sweep_expired().await?;

        let query_embedding = self.embedder.generate(prompt).await?;
        let entries = self.store.get_all().await?;
        let candidates = entries.len();

        let Some(best) = Self::best_match(&query_embedding, entries)? else {
            self.log_decision(format_args!(
                "Semantic cache miss: no candidates (swept {})",
                swept
            ));
            return Ok(QueryResult::miss(None));
        };

        if best.similarity >= self.config.similarity_threshold {
            self.log_decision(format_args!(
                "Semantic cache hit: similarity {:.4} >= {:.4} over {} candidates (swept {})",
                best.similarity, self.config.similarity_threshold, candidates, swept
            ));
            Ok(QueryResult::hit(best.entry, best.similarity))
        } else {
            self.log_decision(format_args!(
                "Semantic cache miss: best similarity {:.4} < {:.4} over {} candidates (swept {})",
                best.similarity, self.config.similarity_threshold, candidates, swept
            ));
            Ok(QueryResult::miss(Some(best.similarity)))
        }
    }

    /// First entry reaching the maximum similarity, in store order
    fn best_match(
        query_embedding: &[f32],
        entries: Vec<CacheEntry>,
    ) -> Result<Option<BestMatch>, DomainError> {
        let mut best: Option<BestMatch> = None;

        for entry in entries {
            let similarity = cosine_similarity(query_embedding, entry.embedding())?;

            let better = best
                .as_ref()
                .is_none_or(|current| similarity > current.similarity);

            if better {
                best = Some(BestMatch { entry, similarity });
            }
        }

        Ok(best)
    }

    fn log_decision(&self, message: std::fmt::Arguments<'_>) {
        if self.config.debug {
            info!(namespace = %self.store.namespace(), "{}", message);
        } else {
            debug!(namespace = %self.store.namespace(), "{}", message);
        }
    }

    /// Store `response` for `prompt`, replacing any entry for the same text
    pub async fn save(
        &self,
        prompt: &str,
        response: &str,
        metadata: Option<EntryMetadata>,
    ) -> Result<CacheEntry, DomainError> {
        let embedding = self.embedder.generate(prompt).await?;

        let mut entry = CacheEntry::new(prompt, embedding, response);
        if let Some(metadata) = metadata {
            entry = entry.with_metadata(metadata);
        }

        self.store.save(&entry.key(), &entry).await?;

        self.log_decision(format_args!("Saved semantic cache entry {}", entry.key()));

        Ok(entry)
    }

    /// Remove every entry in this namespace
    pub async fn clear(&self) -> Result<usize, DomainError> {
        let removed = self.store.clear().await?;
        info!(
            "Cleared {} entries from semantic cache '{}'",
            removed,
            self.store.namespace()
        );
        Ok(removed)
    }

    /// Entry statistics; does not sweep expired entries
    pub async fn get_stats(&self) -> Result<CacheStats, DomainError> {
        let entries = self.store.get_all().await?;
        Ok(CacheStats::from_entries(&entries))
    }

    /// Delete the entry stored for exactly `prompt`
    pub async fn invalidate(&self, prompt: &str) -> Result<bool, DomainError> {
        self.store.delete(&entry_key(prompt)).await
    }

    /// Entry stored for exactly `prompt`
    pub async fn entry(&self, prompt: &str) -> Result<Option<CacheEntry>, DomainError> {
        self.store.get(&entry_key(prompt)).await
    }

    /// Run the expiration sweep now
    pub async fn cleanup_expired(&self) -> Result<usize, DomainError> {
        self.sweep_expired().await
    }

    async fn sweep_expired(&self) -> Result<usize, DomainError> {
        let Some(max_age_ms) = self.config.max_age_ms else {
            return Ok(0);
        };

        let now = now_millis();
        let mut removed = 0;

        for entry in self.store.get_all().await? {
            if entry.is_expired(max_age_ms, now) && self.store.delete(&entry.key()).await? {
                removed += 1;
            }
        }

        if removed > 0 {
            debug!("Swept {} expired semantic cache entries", removed);
        }

        Ok(removed)
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.counters.snapshot()
    }

    /// Load the embedding model ahead of the first query
    pub async fn preload_model(&self) -> Result<(), DomainError> {
        self.embedder.generate(WARMUP_TEXT).await?;
        info!("Embedding model {} preloaded", self.embedder.model_name());
        Ok(())
    }

    pub async fn unload_model(&self) {
        self.embedder.unload().await;
    }

    pub fn is_model_loaded(&self) -> bool {
        self.embedder.is_loaded()
    }
}
