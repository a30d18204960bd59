//! Key-value store implementations

mod factory;
mod in_memory;
mod redis;

pub use factory::{KeyValueStoreFactory, StoreBackend, StoreSettings};
pub use in_memory::{InMemoryKeyValueStore, InMemoryStoreConfig};
pub use redis::{RedisKeyValueStore, RedisStoreConfig};
