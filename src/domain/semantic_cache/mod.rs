//! Semantic cache domain models and traits
//!
//! Entries are matched by embedding similarity rather than exact prompt
//! text, so a reworded prompt can replay an earlier response.

mod config;
mod entry;
mod result;
mod store;

pub use config::{
    SemanticCacheConfig, DEFAULT_MODEL_NAME, DEFAULT_SIMILARITY_THRESHOLD, DEFAULT_STORAGE_PREFIX,
};
pub use entry::{entry_key, now_millis, CacheEntry, EntryMetadata};
pub use result::{CacheCounters, CacheStats, CounterSnapshot, QueryResult};
pub use store::EntryStore;

#[cfg(test)]
pub use store::mock::{FailOn, MockEntryStore};
