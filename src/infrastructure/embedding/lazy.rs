//! Lazily loaded embedding provider

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::{debug, info};

use crate::domain::embedding::{EmbeddingModel, EmbeddingProvider, ModelLoader};
use crate::domain::DomainError;

type ModelCell = Arc<OnceCell<Arc<dyn EmbeddingModel>>>;

/// Embedding provider that loads its model on first use
///
/// Concurrent first callers share one load. A failed load leaves the cell
/// empty so the next call retries. `unload` swaps in a fresh cell; calls
/// already holding the old cell finish against the old model.
#[derive(Debug)]
pub struct LazyEmbeddingProvider {
    loader: Arc<dyn ModelLoader>,
    model_name: String,
    slot: RwLock<ModelCell>,
}

impl LazyEmbeddingProvider {
    pub fn new(loader: Arc<dyn ModelLoader>, model_name: impl Into<String>) -> Self {
        Self {
            loader,
            model_name: model_name.into(),
            slot: RwLock::new(Arc::new(OnceCell::new())),
        }
    }

    fn current_cell(&self) -> Result<ModelCell, DomainError> {
        self.slot
            .read()
            .map(|cell| cell.clone())
            .map_err(|_| DomainError::internal("embedding model slot poisoned"))
    }

    async fn model(&self) -> Result<Arc<dyn EmbeddingModel>, DomainError> {
        let cell = self.current_cell()?;

        let model = cell
            .get_or_try_init(|| async {
                info!(
                    "Loading embedding model {} via {}",
                    self.model_name,
                    self.loader.backend_name()
                );
                self.loader.load(&self.model_name).await
            })
            .await?;

        Ok(model.clone())
    }
}

#[async_trait]
impl EmbeddingProvider for LazyEmbeddingProvider {
    async fn generate(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let model = self.model().await?;
        let vector = model.embed(text).await?;

        if vector.is_empty() {
            return Err(DomainError::embedding(format!(
                "Model {} returned an empty embedding",
                model.model_name()
            )));
        }

        Ok(vector)
    }

    async fn unload(&self) {
        match self.slot.write() {
            Ok(mut slot) => {
                if slot.initialized() {
                    debug!("Unloading embedding model {}", self.model_name);
                }
                *slot = Arc::new(OnceCell::new());
            }
            Err(poisoned) => {
                *poisoned.into_inner() = Arc::new(OnceCell::new());
            }
        }
    }

    fn is_loaded(&self) -> bool {
        self.current_cell()
            .map(|cell| cell.initialized())
            .unwrap_or(false)
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
