//! Loaded embedding models and the loaders that produce them

use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::DomainError;

#[cfg(test)]
use mockall::automock;

/// A ready-to-use embedding model
#[async_trait]
pub trait EmbeddingModel: Send + Sync + Debug {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError>;

    /// Identifier of the model
    fn model_name(&self) -> &str;

    /// Length of every vector this model produces
    fn dimensions(&self) -> usize;
}

/// Loads an embedding model by name
///
/// Loading may be expensive (network handshake, weights); callers are
/// expected to hold the result instead of loading per request.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ModelLoader: Send + Sync + Debug {
    /// Load the named model
    async fn load(&self, model_name: &str) -> Result<Arc<dyn EmbeddingModel>, DomainError>;

    /// Name of the backend, for logs
    fn backend_name(&self) -> &'static str;
}
