//! Chat completions served through the semantic cache

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::llm::{ChatRequest, ChatResponse, FinishReason, LlmProvider, Message, Usage};
use crate::domain::semantic_cache::EntryMetadata;
use crate::domain::DomainError;

use super::SemanticCacheEngine;

/// Result of a chat call routed through the cache
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub response: ChatResponse,
    /// Whether the response was replayed from the cache
    pub cache_hit: bool,
    /// Best similarity seen by the lookup, if any
    pub similarity: Option<f32>,
}

/// Wraps an [`LlmProvider`] with semantic caching
///
/// The prompt is the user messages of a request joined by newlines.
/// Requests without user content skip the cache. Responses produced on a
/// miss are saved in the background so the caller is not delayed by the
/// write.
#[derive(Debug, Clone)]
pub struct CachedChatService {
    engine: Arc<SemanticCacheEngine>,
    provider: Arc<dyn LlmProvider>,
}

impl CachedChatService {
    pub fn new(engine: Arc<SemanticCacheEngine>, provider: Arc<dyn LlmProvider>) -> Self {
        Self { engine, provider }
    }

    pub fn engine(&self) -> &Arc<SemanticCacheEngine> {
        &self.engine
    }

    pub async fn chat(&self, model: &str, request: ChatRequest) -> Result<ChatOutcome, DomainError> {
        let prompt = request.user_prompt();

        if prompt.is_empty() {
            debug!("Request has no user content, bypassing semantic cache");
            let response = self.provider.chat(request).await?;
            return Ok(ChatOutcome {
                response,
                cache_hit: false,
                similarity: None,
            });
        }

        let lookup = self.engine.query(&prompt).await?;

        if let (true, Some(cached)) = (lookup.hit, lookup.response) {
            return Ok(ChatOutcome {
                response: Self::cached_response(model, cached),
                cache_hit: true,
                similarity: lookup.similarity,
            });
        }

        let response = self.provider.chat(request).await?;

        if let Some(content) = response.content() {
            self.save_in_background(model, prompt, content.to_string());
        }

        Ok(ChatOutcome {
            response,
            cache_hit: false,
            similarity: lookup.similarity,
        })
    }

    fn cached_response(model: &str, content: String) -> ChatResponse {
        ChatResponse::new(
            format!("cache-{}", Uuid::new_v4()),
            model,
            Message::assistant(content),
        )
        .with_finish_reason(FinishReason::Stop)
        .with_usage(Usage::default())
    }

    fn save_in_background(&self, model: &str, prompt: String, content: String) {
        let engine = self.engine.clone();
        let metadata: EntryMetadata = [("model".to_string(), serde_json::json!(model))]
            .into_iter()
            .collect();

        tokio::spawn(async move {
            if let Err(e) = engine.save(&prompt, &content, Some(metadata)).await {
                warn!("Failed to save chat response to semantic cache: {}", e);
            }
        });
    }
}
