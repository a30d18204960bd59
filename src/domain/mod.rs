//! Domain layer - Core types and the ports the cache depends on

pub mod embedding;
pub mod error;
pub mod kv;
pub mod llm;
pub mod semantic_cache;
pub mod similarity;

pub use error::DomainError;
