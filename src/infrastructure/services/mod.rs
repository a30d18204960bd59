//! Infrastructure services

mod cached_chat_service;
mod semantic_cache_engine;

pub use cached_chat_service::{CachedChatService, ChatOutcome};
pub use semantic_cache_engine::SemanticCacheEngine;
