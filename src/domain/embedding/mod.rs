//! Embedding domain - turning text into vectors

mod model;
mod provider;

pub use model::{EmbeddingModel, ModelLoader};
pub use provider::EmbeddingProvider;

#[cfg(test)]
pub use model::MockModelLoader;
#[cfg(test)]
pub use provider::mock::MockEmbeddingProvider;
