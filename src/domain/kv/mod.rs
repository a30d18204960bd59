//! Key-value domain - the raw blob store shared by cache namespaces

mod repository;

pub use repository::KeyValueStore;

#[cfg(test)]
pub use repository::mock::MockKeyValueStore;
