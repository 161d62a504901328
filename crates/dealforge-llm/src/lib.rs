//! Dealforge LLM - Generation-service abstraction
//!
//! The negotiation engine never talks to a model backend directly; it goes
//! through [`LlmRouter`], which wraps one of the [`LlmProvider`]
//! implementations:
//!
//! - **Ollama** - local models via `/api/generate`
//! - **OpenAI-compatible** - LM Studio, OpenRouter, vLLM and friends via
//!   `/v1/chat/completions`
//! - **Deterministic** - no backend at all; canned negotiation-shaped
//!   replies so demos and tests run offline
//!
//! Retries, rate limits, and timeouts are the backend's concern. Callers
//! treat any `Err` from [`LlmProvider::complete`] as a single failed call.

pub mod providers;
pub mod router;
pub mod types;

pub use providers::{
    DeterministicProvider, LlmProvider, OllamaConfig, OllamaProvider, OpenAiCompatConfig,
    OpenAiCompatProvider,
};
pub use router::LlmRouter;
pub use types::{
    ChatMessage, ChatRole, CompletionRequest, CompletionResponse, LlmError, ProviderKind, Result,
};
