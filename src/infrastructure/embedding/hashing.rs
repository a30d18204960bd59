//! Offline embedding backend based on feature hashing

use std::sync::Arc;

use async_trait::async_trait;
use xxhash_rust::xxh3::xxh3_64;

use crate::domain::embedding::{EmbeddingModel, ModelLoader};
use crate::domain::similarity::normalize;
use crate::domain::DomainError;

pub const DEFAULT_HASHING_DIMENSIONS: usize = 384;

/// Loads [`HashingEmbeddingModel`]s
///
/// Needs no network or weights, so it suits tests, demos and deployments
/// where near-verbatim repeats are the only hits that matter.
#[derive(Debug, Clone)]
pub struct HashingModelLoader {
    dimensions: usize,
}

impl HashingModelLoader {
    pub fn new(dimensions: usize) -> Self {
        Self {
            dimensions: dimensions.max(1),
        }
    }
}

impl Default for HashingModelLoader {
    fn default() -> Self {
        Self::new(DEFAULT_HASHING_DIMENSIONS)
    }
}

#[async_trait]
impl ModelLoader for HashingModelLoader {
    async fn load(&self, model_name: &str) -> Result<Arc<dyn EmbeddingModel>, DomainError> {
        Ok(Arc::new(HashingEmbeddingModel {
            model_name: model_name.to_string(),
            dimensions: self.dimensions,
        }))
    }

    fn backend_name(&self) -> &'static str {
        "hashing"
    }
}

/// Bag-of-words vectors with signed hashed buckets
#[derive(Debug, Clone)]
pub struct HashingEmbeddingModel {
    model_name: String,
    dimensions: usize,
}

impl HashingEmbeddingModel {
    fn vectorize(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];

        let mut tokens: Vec<String> = text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|t| !t.is_empty())
            .map(str::to_lowercase)
            .collect();

        // Emoji, punctuation or blank text: the whole trimmed text is the feature
        if tokens.is_empty() {
            tokens.push(text.trim().to_string());
        }

        for token in &tokens {
            let hash = xxh3_64(token.as_bytes());
            let bucket = (hash % self.dimensions as u64) as usize;
            // Top bit picks the sign so collisions tend to cancel out
            let sign = if hash >> 63 == 0 { 1.0 } else { -1.0 };
            vector[bucket] += sign;
        }

        normalize(&vector)
    }
}

#[async_trait]
impl EmbeddingModel for HashingEmbeddingModel {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        Ok(self.vectorize(text))
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}
