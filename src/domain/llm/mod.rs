//! Chat completion data shapes and the generation provider trait

mod message;
mod provider;
mod request;
mod response;

pub use message::{Message, MessageRole};
pub use provider::LlmProvider;
pub use request::ChatRequest;
pub use response::{ChatChoice, ChatResponse, FinishReason, Usage};

#[cfg(test)]
pub use provider::mock::MockLlmProvider;
