//! Embedding provider trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use crate::domain::DomainError;

/// Source of query and entry embeddings for the semantic cache
///
/// Initialization is lazy and idempotent: the first `generate` loads the
/// model and concurrent callers wait on that same load. `unload` releases
/// the model; the next `generate` loads it again.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync + Debug {
    /// Generate the embedding of `text`
    async fn generate(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Release the loaded model, if any
    async fn unload(&self);

    /// Whether a model is currently loaded
    fn is_loaded(&self) -> bool;

    /// Identifier of the configured model
    fn model_name(&self) -> &str;
}
