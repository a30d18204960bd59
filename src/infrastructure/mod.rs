//! Infrastructure layer - External service implementations

pub mod embedding;
pub mod kv;
pub mod llm;
pub mod logging;
pub mod semantic_cache;
pub mod services;
