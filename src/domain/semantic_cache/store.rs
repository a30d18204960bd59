//! Entry store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

use super::CacheEntry;

/// Durable mapping from entry key to cache entry, scoped to one namespace
///
/// Every operation only sees entries of the store's own namespace, even when
/// the backend is shared with other namespaces.
#[async_trait]
pub trait EntryStore: Send + Sync + Debug {
    /// Stores an entry under `key`, replacing any existing one
    async fn save(&self, key: &str, entry: &CacheEntry) -> Result<(), DomainError>;

    /// Gets the entry stored under `key`
    async fn get(&self, key: &str) -> Result<Option<CacheEntry>, DomainError>;

    /// Gets every entry of the namespace, in unspecified order
    async fn get_all(&self) -> Result<Vec<CacheEntry>, DomainError>;

    /// Deletes the entry under `key`, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Deletes every entry of the namespace, returning how many were removed
    async fn clear(&self) -> Result<usize, DomainError>;

    /// The namespace this store is scoped to
    fn namespace(&self) -> &str;
}
