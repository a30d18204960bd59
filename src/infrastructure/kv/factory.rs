//! Key-value store factory for runtime backend selection

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::kv::KeyValueStore;
use crate::domain::DomainError;

use super::in_memory::{InMemoryKeyValueStore, InMemoryStoreConfig};
use super::redis::{RedisKeyValueStore, RedisStoreConfig};

/// Supported store backends
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreBackend {
    /// Process-local store using moka
    #[default]
    #[serde(alias = "memory", alias = "inmemory")]
    InMemory,
    /// Redis
    Redis,
}

impl std::fmt::Display for StoreBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreBackend::InMemory => write!(f, "in_memory"),
            StoreBackend::Redis => write!(f, "redis"),
        }
    }
}

impl std::str::FromStr for StoreBackend {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "in_memory" | "inmemory" | "memory" => Ok(StoreBackend::InMemory),
            "redis" => Ok(StoreBackend::Redis),
            _ => Err(DomainError::configuration(format!(
                "Unknown store backend: {}. Valid backends: in_memory, redis",
                s
            ))),
        }
    }
}

/// Settings for building a key-value store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Backend to create
    #[serde(default)]
    pub backend: StoreBackend,
    /// Redis URL (required for the Redis backend)
    #[serde(default)]
    pub redis_url: Option<String>,
    /// Maximum capacity (in-memory backend only)
    #[serde(default = "default_max_capacity")]
    pub max_capacity: u64,
}

fn default_max_capacity() -> u64 {
    InMemoryStoreConfig::default().max_capacity
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: StoreBackend::InMemory,
            redis_url: None,
            max_capacity: default_max_capacity(),
        }
    }
}

impl StoreSettings {
    /// Settings for an in-memory store
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Settings for a Redis store
    pub fn redis(url: impl Into<String>) -> Self {
        Self {
            backend: StoreBackend::Redis,
            redis_url: Some(url.into()),
            ..Default::default()
        }
    }

    /// Sets the maximum capacity (in-memory only)
    pub fn with_max_capacity(mut self, capacity: u64) -> Self {
        self.max_capacity = capacity;
        self
    }
}

/// Factory for creating key-value stores
#[derive(Debug, Default)]
pub struct KeyValueStoreFactory;

impl KeyValueStoreFactory {
    pub fn new() -> Self {
        Self
    }

    /// Creates a store based on settings
    pub async fn create(
        &self,
        settings: &StoreSettings,
    ) -> Result<Arc<dyn KeyValueStore>, DomainError> {
        info!("Creating {} key-value store", settings.backend);

        match settings.backend {
            StoreBackend::InMemory => {
                let config = InMemoryStoreConfig::default().with_max_capacity(settings.max_capacity);
                Ok(Arc::new(InMemoryKeyValueStore::with_config(config)))
            }
            StoreBackend::Redis => {
                let url = settings.redis_url.clone().ok_or_else(|| {
                    DomainError::configuration("Redis URL is required for the redis backend")
                })?;

                let store = RedisKeyValueStore::new(RedisStoreConfig::new(url)).await?;
                Ok(Arc::new(store))
            }
        }
    }
}
