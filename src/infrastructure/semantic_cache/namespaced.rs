//! Entry store over a shared key-value store

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::domain::kv::KeyValueStore;
use crate::domain::semantic_cache::{CacheEntry, EntryStore};
use crate::domain::DomainError;

/// Stores entries as JSON under `{namespace}:{entry-key}`
///
/// Only keys with exactly one segment after the namespace belong to it, so a
/// namespace `a` never sees the entries of a namespace `a:b` sharing the
/// same backend.
#[derive(Debug, Clone)]
pub struct NamespacedEntryStore {
    kv: Arc<dyn KeyValueStore>,
    namespace: String,
    key_prefix: String,
}

impl NamespacedEntryStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let key_prefix = format!("{}:", namespace);

        Self {
            kv,
            namespace,
            key_prefix,
        }
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}", self.key_prefix, key)
    }

    fn owns(&self, storage_key: &str) -> bool {
        storage_key
            .strip_prefix(&self.key_prefix)
            .is_some_and(|rest| !rest.is_empty() && !rest.contains(':'))
    }

    async fn owned_keys(&self) -> Result<Vec<String>, DomainError> {
        let keys = self.kv.keys(&self.key_prefix).await?;
        Ok(keys.into_iter().filter(|k| self.owns(k)).collect())
    }

    fn decode(storage_key: &str, raw: &str) -> Option<CacheEntry> {
        match serde_json::from_str(raw) {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping undecodable cache entry '{}': {}", storage_key, e);
                None
            }
        }
    }
}

#[async_trait]
impl EntryStore for NamespacedEntryStore {
    async fn save(&self, key: &str, entry: &CacheEntry) -> Result<(), DomainError> {
        let raw = serde_json::to_string(entry).map_err(|e| {
            DomainError::storage(format!("Failed to serialize cache entry: {}", e))
        })?;

        self.kv.set_raw(&self.storage_key(key), &raw).await
    }

    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError> {
        let storage_key = self.storage_key(key);

        Ok(self
            .kv
            .get_raw(&storage_key)
            .await?
            .and_then(|raw| Self::decode(&storage_key, &raw)))
    }

    async fn get_all(&self) -> Result<Vec<CacheEntry>, DomainError> {
        let keys = self.owned_keys().await?;

        if keys.is_empty() {
            return Ok(Vec::new());
        }

        let values = self.kv.get_many_raw(&keys).await?;

        // Keys deleted between listing and fetching come back as None
        Ok(keys
            .iter()
            .zip(values)
            .filter_map(|(key, raw)| raw.and_then(|raw| Self::decode(key, &raw)))
            .collect())
    }

    async fn delete(&self, key: &str) -> Result<bool, DomainError> {
        self.kv.delete(&self.storage_key(key)).await
    }

    async fn clear(&self) -> Result<usize, DomainError> {
        let keys = self.owned_keys().await?;
        let mut deleted = 0;

        for key in &keys {
            if self.kv.delete(key).await? {
                deleted += 1;
            }
        }

        debug!("Cleared {} entries from namespace '{}'", deleted, self.namespace);

        Ok(deleted)
    }

    fn namespace(&self) -> &str {
        &self.namespace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::kv::MockKeyValueStore;
    use crate::domain::semantic_cache::entry_key;
    use crate::infrastructure::kv::InMemoryKeyValueStore;

    fn entry(prompt: &str, timestamp: u64) -> CacheEntry {
        CacheEntry::with_timestamp(prompt, vec![1.0, 0.0], format!("answer to {}", prompt), timestamp)
    }

    fn store_on(kv: &Arc<dyn KeyValueStore>, namespace: &str) -> NamespacedEntryStore {
        NamespacedEntryStore::new(kv.clone(), namespace)
    }

    #[tokio::test]
    async fn test_save_and_get() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let store = store_on(&kv, "ns");
        let e = entry("hello", 1);

        store.save(&e.key(), &e).await.unwrap();

        assert_eq!(store.get(&e.key()).await.unwrap(), Some(e.clone()));
        assert!(kv
            .get_raw(&format!("ns:{}", entry_key("hello")))
            .await
            .unwrap()
            .is_some());
    }

    #[tokio::test]
    async fn test_save_overwrites_same_key() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let store = store_on(&kv, "ns");
        let first = entry("hello", 1);
        let second = CacheEntry::with_timestamp("hello", vec![0.0, 1.0], "newer", 2);

        store.save(&first.key(), &first).await.unwrap();
        store.save(&second.key(), &second).await.unwrap();

        let all = store.get_all().await.unwrap();
        assert_eq!(all, vec![second]);
    }

    #[tokio::test]
    async fn test_get_all_and_delete() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let store = store_on(&kv, "ns");

        for (i, prompt) in ["a", "b", "c"].iter().enumerate() {
            let e = entry(prompt, i as u64);
            store.save(&e.key(), &e).await.unwrap();
        }

        assert_eq!(store.get_all().await.unwrap().len(), 3);

        assert!(store.delete(&entry_key("b")).await.unwrap());
        assert!(!store.delete(&entry_key("b")).await.unwrap());

        let mut prompts: Vec<String> = store
            .get_all()
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.prompt().to_string())
            .collect();
        prompts.sort();
        assert_eq!(prompts, vec!["a".to_string(), "c".to_string()]);
    }

    #[tokio::test]
    async fn test_namespaces_are_isolated() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let left = store_on(&kv, "app");
        let nested = store_on(&kv, "app:v2");
        let right = store_on(&kv, "other");

        let e1 = entry("shared prompt", 1);
        let e2 = entry("nested prompt", 2);
        let e3 = entry("other prompt", 3);
        left.save(&e1.key(), &e1).await.unwrap();
        nested.save(&e2.key(), &e2).await.unwrap();
        right.save(&e3.key(), &e3).await.unwrap();

        assert_eq!(left.get_all().await.unwrap(), vec![e1.clone()]);
        assert_eq!(nested.get_all().await.unwrap(), vec![e2.clone()]);

        assert_eq!(left.clear().await.unwrap(), 1);

        assert!(left.get_all().await.unwrap().is_empty());
        assert_eq!(nested.get_all().await.unwrap(), vec![e2]);
        assert_eq!(right.get_all().await.unwrap(), vec![e3]);
    }

    #[tokio::test]
    async fn test_undecodable_blob_is_skipped() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKeyValueStore::new());
        let store = store_on(&kv, "ns");
        let good = entry("good", 1);
        store.save(&good.key(), &good).await.unwrap();
        kv.set_raw("ns:corrupt", "not json").await.unwrap();

        assert_eq!(store.get_all().await.unwrap(), vec![good]);
        assert_eq!(store.get("corrupt").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_as_storage_error() {
        let kv: Arc<dyn KeyValueStore> =
            Arc::new(MockKeyValueStore::new().with_error("quota exceeded"));
        let store = store_on(&kv, "ns");
        let e = entry("hello", 1);

        assert!(matches!(
            store.save(&e.key(), &e).await,
            Err(DomainError::Storage { .. })
        ));
        assert!(matches!(store.get_all().await, Err(DomainError::Storage { .. })));
        assert!(matches!(store.clear().await, Err(DomainError::Storage { .. })));
    }

    #[test]
    fn test_namespace_accessor() {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MockKeyValueStore::new());
        assert_eq!(store_on(&kv, "semantic-cache").namespace(), "semantic-cache");
    }
}
