//! # Routing Core
//!
//! - [`complexity`]: heuristic complexity estimation of study material.
//! - [`router`]: task-based model selection, the OpenRouter call and the
//!   sequential fallback chain.
//!
//! ```rust,no_run
//! use studyrouter_core::core::router::{ModelRouter, TaskType};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = ModelRouter::from_env()?;
//!     let assessment = router.classify_complexity("Explain the Krebs cycle").await;
//!     let cards = router
//!         .complete(TaskType::Flashcard, "Write five flashcards.", "The Krebs cycle ...")
//!         .await?;
//!     println!("{} -> {}", assessment.level, cards);
//!     Ok(())
//! }
//! ```

pub mod complexity;
pub mod router;
