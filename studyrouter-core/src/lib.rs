//! # studyrouter-core - Model routing for study content generation
//!
//! `studyrouter-core` decides which hosted LLM answers each generation request
//! of a study application (flashcards, quizzes, summaries, explanations) and
//! sends it through OpenRouter.
//!
//! ## Highlights
//!
//! - **Complexity Estimation**: a pure heuristic scoring text length, technical
//!   vocabulary, sentence structure and mathematical notation, plus an optional
//!   LLM classifier that falls back to the heuristic.
//! - **Rule-Based Routing**: an immutable routing table maps task types (with
//!   optional `complexity <op> <number>` conditions) to catalogue models.
//! - **Fallback**: failed calls walk an ordered fallback chain; caller overrides
//!   disable it.
//! - **Configuration-First**: tables and credentials come from
//!   `studyrouter.toml`, `.env` and the environment, with constants centralized
//!   in `config::constants`.
//!
//! ## Architecture Overview
//!
//! - `config/`: constants, API key resolution, the routing table and the loader.
//! - `core/`: the complexity estimator and the model router.
//! - `llm/`: provider-neutral request types and the OpenRouter client.
//!
//! ## Quickstart
//!
//! ```rust,ignore
//! use studyrouter_core::{ModelRouter, RouteRequest, TaskType, llm::Message};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), anyhow::Error> {
//!     let router = ModelRouter::from_env()?;
//!     let request = RouteRequest::new(
//!         TaskType::Explain,
//!         vec![Message::user("Explain eigenvectors")],
//!     )
//!     .with_complexity(0.8);
//!
//!     let response = router.route(request).await?;
//!     println!("{} via {}", response.content, response.model_id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod core;
pub mod llm;

pub use config::{ConfigError, ConfigManager, ModelConfig, RouterConfig, StudyRouterConfig};
pub use core::complexity::{
    ComplexityEstimator, ComplexityLevel, ComplexityResult, estimate_complexity,
};
pub use core::router::{
    ModelRouter, RouteRequest, RouteResponse, RouterError, RouterOptions, TaskType,
};
pub use llm::{LLMError, LLMProvider, Message};
