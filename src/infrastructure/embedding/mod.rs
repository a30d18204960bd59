//! Embedding backends and the lazy provider wrapping them

mod hashing;
mod lazy;
mod openai;

pub use hashing::{HashingEmbeddingModel, HashingModelLoader, DEFAULT_HASHING_DIMENSIONS};
pub use lazy::LazyEmbeddingProvider;
pub use openai::{
    openai_dimensions, OpenAiEmbeddingModel, OpenAiModelLoader, DEFAULT_OPENAI_BASE_URL,
};
