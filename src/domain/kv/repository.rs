//! Key-value store trait definition

use std::fmt::Debug;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Durable string-to-string store
///
/// Values are opaque blobs (JSON in practice). Several logical namespaces
/// may share one store by prefixing their keys; the store itself knows
/// nothing about namespaces beyond [`KeyValueStore::keys`].
#[async_trait]
pub trait KeyValueStore: Send + Sync + Debug {
    /// Gets a raw value
    async fn get_raw(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Sets a raw value, overwriting any existing one
    async fn set_raw(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Deletes a value, returning whether it existed
    async fn delete(&self, key: &str) -> Result<bool, DomainError>;

    /// Lists every key starting with `prefix`
    async fn keys(&self, prefix: &str) -> Result<Vec<String>, DomainError>;

    /// Gets several values at once, in the order of `keys`
    async fn get_many_raw(&self, keys: &[String]) -> Result<Vec<Option<String>>, DomainError> {
        let mut values = Vec::with_capacity(keys.len());

        for key in keys {
            values.push(self.get_raw(key).await?);
        }

        Ok(values)
    }
}
