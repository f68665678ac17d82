//! LlmProvider trait definition.
//!
//! This is the core abstraction that every chat backend implements.

use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for chat model backends (OpenAI, Gemini, xAI, ...).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition). Use
/// [`BoxLlmProvider`](super::box_provider::BoxLlmProvider) where runtime
/// selection of the backend is needed.
///
/// Implementations live in parley-infra (e.g., `OpenAiCompatibleProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "openai", "gemini").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
