//! Semantic cache entry store implementations

mod namespaced;

pub use namespaced::NamespacedEntryStore;
