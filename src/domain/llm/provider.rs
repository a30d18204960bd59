use async_trait::async_trait;
use std::fmt::Debug;

use super::{ChatRequest, ChatResponse};
use crate::domain::DomainError;

/// The expensive generation call the semantic cache sits in front of
#[async_trait]
pub trait LlmProvider: Send + Sync + Debug {
    /// Send a chat completion request
    async fn chat(&self, request: ChatRequest) -> Result<ChatResponse, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;
}
