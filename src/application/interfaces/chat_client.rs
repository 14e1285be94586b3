use async_trait::async_trait;
use serde::Serialize;

use crate::domain::DomainError;

/// A single chat-completion call: one system instruction, one user message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

/// An interface for sending chat-style prompts to an LLM and receiving text responses.
///
/// Implementors encapsulate transport, serialization, and vendor-specific API
/// details. Use cases stay decoupled from any particular provider or HTTP
/// client library.
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// Return the assistant's raw completion text, or an empty string when
    /// the provider sent no content.
    async fn complete(&self, request: &CompletionRequest) -> Result<String, DomainError>;
}
