//! # LLM Integration Layer
//!
//! Provider-neutral request/response types plus the OpenRouter adapter used by
//! the model router.
//!
//! - [`provider`]: `LLMRequest`, `LLMResponse`, `Message`, `Usage`, `LLMError`
//!   and the async [`LLMProvider`] trait.
//! - [`providers::OpenRouterProvider`]: `POST /chat/completions` over `reqwest`
//!   with bearer auth and optional site attribution headers.

pub mod provider;
pub mod providers;

pub use provider::{
    FinishReason, LLMError, LLMProvider, LLMRequest, LLMResponse, Message, MessageRole, Usage,
};
pub use providers::OpenRouterProvider;
