//! OpenAI embedding backend

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::embedding::{EmbeddingModel, ModelLoader};
use crate::domain::DomainError;
use crate::infrastructure::llm::HttpClientTrait;

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";

/// Known OpenAI embedding models and their dimensions
const EMBEDDING_MODELS: &[(&str, usize)] = &[
    ("text-embedding-3-small", 1536),
    ("text-embedding-3-large", 3072),
    ("text-embedding-ada-002", 1536),
];

/// Dimensions of a known OpenAI embedding model
pub fn openai_dimensions(model: &str) -> Option<usize> {
    EMBEDDING_MODELS
        .iter()
        .find(|(name, _)| *name == model)
        .map(|(_, dims)| *dims)
}

/// Loads OpenAI embedding models
///
/// Loading checks the model name against the known list; the remote model
/// itself needs no warm-up.
#[derive(Debug)]
pub struct OpenAiModelLoader<C: HttpClientTrait> {
    client: Arc<C>,
    has_api_key: bool,
    auth_header: String,
    base_url: String,
}

impl<C: HttpClientTrait + 'static> OpenAiModelLoader<C> {
    pub fn new(client: C, api_key: impl Into<String>) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_OPENAI_BASE_URL)
    }

    pub fn with_base_url(
        client: C,
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let api_key = api_key.into();
        let auth_header = format!("Bearer {}", api_key);
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            client: Arc::new(client),
            has_api_key: !api_key.is_empty(),
            auth_header,
            base_url,
        }
    }
}

#[async_trait]
impl<C: HttpClientTrait + 'static> ModelLoader for OpenAiModelLoader<C> {
    async fn load(&self, model_name: &str) -> Result<Arc<dyn EmbeddingModel>, DomainError> {
        if !self.has_api_key {
            return Err(DomainError::embedding("OpenAI API key is not set"));
        }

        let dimensions = openai_dimensions(model_name).ok_or_else(|| {
            DomainError::embedding(format!("Unknown OpenAI embedding model: {}", model_name))
        })?;

        debug!("Loaded OpenAI embedding model {} ({} dims)", model_name, dimensions);

        Ok(Arc::new(OpenAiEmbeddingModel {
            client: self.client.clone(),
            auth_header: self.auth_header.clone(),
            url: format!("{}/v1/embeddings", self.base_url),
            model: model_name.to_string(),
            dimensions,
        }))
    }

    fn backend_name(&self) -> &'static str {
        "openai"
    }
}

/// A loaded OpenAI embedding model
#[derive(Debug)]
pub struct OpenAiEmbeddingModel<C: HttpClientTrait> {
    client: Arc<C>,
    auth_header: String,
    url: String,
    model: String,
    dimensions: usize,
}

#[async_trait]
impl<C: HttpClientTrait> EmbeddingModel for OpenAiEmbeddingModel<C> {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, DomainError> {
        let body = serde_json::json!({
            "model": self.model,
            "input": text,
        });
        let headers = vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ];

        let json = self
            .client
            .post_json(&self.url, headers, &body)
            .await
            .map_err(|e| DomainError::embedding(format!("OpenAI embedding request failed: {}", e)))?;

        let response: OpenAiEmbeddingResponse = serde_json::from_value(json).map_err(|e| {
            DomainError::embedding(format!("Failed to parse embedding response: {}", e))
        })?;

        response
            .data
            .into_iter()
            .min_by_key(|d| d.index)
            .map(|d| d.embedding)
            .ok_or_else(|| DomainError::embedding("Embedding response contained no data"))
    }

    fn model_name(&self) -> &str {
        &self.model
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingResponse {
    data: Vec<OpenAiEmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct OpenAiEmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}
