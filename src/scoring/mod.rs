//! Transcript scoring: the optional second pipeline stage.
//!
//! This module provides:
//! * [`Scorer`]: async trait implemented by scoring backends.
//! * [`ApiScorer`]: OpenAI-compatible chat-completions backend.
//! * [`ScoringClient`]: wraps any scorer; bounds it by a timeout and turns
//!   every failure into a [`ScoreResult`].
//! * [`PromptBuilder`]: debate-judge prompt.
//! * [`extract`]: first-`{`-to-last-`}` payload extraction.
//! * [`ScoreCard`] / [`ScoreFailure`] / [`ScoreResult`]: wire payloads.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use live_transcribe::config::ScoringConfig;
//! use live_transcribe::scoring::ScoringClient;
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = ScoringClient::from_config(&ScoringConfig::default());
//!     let scores = client.score("To counter your idea, consider the cost.").await;
//!     println!("{}", serde_json::to_string(&scores).unwrap());
//! }
//! ```

pub mod client;
pub mod extract;
pub mod prompt;
pub mod scorer;
pub mod types;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use client::ScoringClient;
pub use prompt::{Criterion, PromptBuilder, CRITERIA};
pub use scorer::{ApiScorer, ScoreError, Scorer};
pub use types::{ScoreCard, ScoreFailure, ScoreResult};
