//! `ScoringClient`: wraps any [`Scorer`] and always produces a [`ScoreResult`].
//!
//! Failure policy:
//!
//! | Outcome                                   | `scores` payload                          |
//! |-------------------------------------------|-------------------------------------------|
//! | payload parsed                            | the parsed card                           |
//! | 200 but no parsable payload               | [`ScoreCard::neutral`]                    |
//! | non-200 status                            | `{"error": "Scoring API error: <code>", …}`|
//! | timeout, transport, bad envelope, empty   | `{"error": "Scoring error: <detail>", …}` |
//!
//! Every call is bounded by the configured timeout regardless of what the
//! wrapped scorer does.

use std::sync::Arc;
use std::time::Duration;

use crate::config::ScoringConfig;
use crate::scoring::scorer::{ApiScorer, ScoreError, Scorer};
use crate::scoring::types::{ScoreCard, ScoreFailure, ScoreResult};

/// Shared by every debate session; cheap to clone.
#[derive(Clone)]
pub struct ScoringClient {
    inner: Arc<dyn Scorer>,
    timeout: Duration,
}

impl ScoringClient {
    /// Wrap `inner`, bounding each call by `timeout`.
    pub fn new(inner: Arc<dyn Scorer>, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    /// Production client: an [`ApiScorer`] bounded by `config.timeout_secs`.
    pub fn from_config(config: &ScoringConfig) -> Self {
        Self::new(
            Arc::new(ApiScorer::from_config(config)),
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Score `text`.  Never fails.
    pub async fn score(&self, text: &str) -> ScoreResult {
        let outcome = match tokio::time::timeout(self.timeout, self.inner.score(text)).await {
            Ok(result) => result,
            Err(_) => Err(ScoreError::Timeout),
        };

        match outcome {
            Ok(card) => ScoreResult::Scored(card),
            Err(ScoreError::Unparseable) => {
                log::warn!("scoring: no payload in completion, using neutral scores");
                ScoreResult::Scored(ScoreCard::neutral())
            }
            Err(ScoreError::Status(code)) => {
                log::warn!("scoring: collaborator returned status {code}");
                ScoreResult::Failed(ScoreFailure {
                    error: format!("Scoring API error: {code}"),
                    message: "Please check your API key and try again".into(),
                })
            }
            Err(e) => {
                log::warn!("scoring: {e}");
                ScoreResult::Failed(ScoreFailure {
                    error: format!("Scoring error: {e}"),
                    message: "Unable to score at this time".into(),
                })
            }
        }
    }
}

impl std::fmt::Debug for ScoringClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScoringClient")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
