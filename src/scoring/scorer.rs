//! Core `Scorer` trait and `ApiScorer` implementation.
//!
//! `ApiScorer` calls any OpenAI-compatible `/v1/chat/completions` endpoint
//! (xAI, OpenAI, Groq, Ollama in OpenAI mode, …).  All connection details
//! come from [`ScoringConfig`].

use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use thiserror::Error;

use crate::config::ScoringConfig;
use crate::scoring::extract::parse_score_card;
use crate::scoring::prompt::PromptBuilder;
use crate::scoring::types::ScoreCard;

// ---------------------------------------------------------------------------
// ScoreError
// ---------------------------------------------------------------------------

/// Errors that can occur while scoring a transcript.
#[derive(Debug, Error)]
pub enum ScoreError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The call did not complete within the configured timeout.
    #[error("scoring request timed out")]
    Timeout,

    /// The collaborator answered with a non-200 status.
    #[error("scoring API returned status {0}")]
    Status(u16),

    /// The response envelope was not the expected JSON.
    #[error("failed to parse scoring response: {0}")]
    Parse(String),

    /// The envelope held no completion text.
    #[error("scoring API returned an empty completion")]
    EmptyResponse,

    /// The completion held no parsable score payload.
    #[error("completion did not contain a score payload")]
    Unparseable,
}

impl From<reqwest::Error> for ScoreError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ScoreError::Timeout
        } else {
            ScoreError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Scorer trait
// ---------------------------------------------------------------------------

/// Async trait for transcript scoring backends.
///
/// Implementors must be `Send + Sync` so one instance can be shared by every
/// session behind an `Arc<dyn Scorer>`.
#[async_trait]
pub trait Scorer: Send + Sync {
    async fn score(&self, text: &str) -> Result<ScoreCard, ScoreError>;
}

// ---------------------------------------------------------------------------
// ApiScorer
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible chat-completions endpoint with a debate-judge
/// prompt and extracts the score payload from the completion.
///
/// The `reqwest::Client` pools connections; it is the only client-side state
/// and needs no locking.
pub struct ApiScorer {
    client: reqwest::Client,
    config: ScoringConfig,
    prompt_builder: PromptBuilder,
}

impl ApiScorer {
    /// Build an `ApiScorer` from service config.
    ///
    /// The HTTP client carries the per-request timeout from
    /// `config.timeout_secs`.  A default client is used if the builder fails.
    pub fn from_config(config: &ScoringConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
            prompt_builder: PromptBuilder::new(),
        }
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl Scorer for ApiScorer {
    /// Send `text` to the configured endpoint for evaluation.
    ///
    /// The `Authorization: Bearer …` header is attached only when an API key
    /// is configured.
    async fn score(&self, text: &str) -> Result<ScoreCard, ScoreError> {
        let (system_msg, user_msg) = self.prompt_builder.build_chat(text);

        let body = serde_json::json!({
            "model":       self.config.model,
            "messages": [
                { "role": "system", "content": system_msg },
                { "role": "user",   "content": user_msg   }
            ],
            "temperature": self.config.temperature
        });

        let mut req = self.client.post(self.endpoint()).json(&body);

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(ScoreError::Status(status.as_u16()));
        }

        let json: serde_json::Value = response.json().await.map_err(|e| {
            if e.is_timeout() {
                ScoreError::Timeout
            } else {
                ScoreError::Parse(e.to_string())
            }
        })?;

        let completion = json["choices"][0]["message"]["content"]
            .as_str()
            .ok_or(ScoreError::EmptyResponse)?;

        parse_score_card(completion).ok_or(ScoreError::Unparseable)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config_for(server: &MockServer, api_key: Option<&str>) -> ScoringConfig {
        ScoringConfig {
            base_url: server.uri(),
            api_key: api_key.map(str::to_string),
            timeout_secs: 5,
            ..ScoringConfig::default()
        }
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({ "choices": [ { "message": { "role": "assistant", "content": content } } ] })
    }

    #[test]
    fn endpoint_tolerates_trailing_slash() {
        let scorer = ApiScorer::from_config(&ScoringConfig {
            base_url: "https://api.example.com/".into(),
            ..ScoringConfig::default()
        });
        assert_eq!(scorer.endpoint(), "https://api.example.com/v1/chat/completions");
    }

    #[test]
    fn scorer_is_object_safe() {
        let scorer: Box<dyn Scorer> = Box::new(ApiScorer::from_config(&ScoringConfig::default()));
        drop(scorer);
    }

    #[tokio::test]
    async fn parses_embedded_payload_and_sends_auth_and_model() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer xai-test"))
            .and(body_partial_json(json!({ "model": "grok-beta" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion(
                "Scores below.\n{\"clarity\": 8, \"logic\": 6, \"evidence\": 5, \
                 \"persuasiveness\": 7, \"delivery\": 9, \"overall_score\": 7, \
                 \"feedback\": \"Cite a source.\"}",
            )))
            .expect(1)
            .mount(&server)
            .await;

        let scorer = ApiScorer::from_config(&config_for(&server, Some("xai-test")));
        let card = scorer.score("Cars pollute.").await.unwrap();

        assert_eq!(card.get("delivery"), Some(9.0));
        assert_eq!(card.feedback, "Cite a source.");
    }

    #[tokio::test]
    async fn non_200_is_status_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let scorer = ApiScorer::from_config(&config_for(&server, Some("k")));
        let err = scorer.score("x").await.unwrap_err();
        assert!(matches!(err, ScoreError::Status(500)), "got {err:?}");
    }

    #[tokio::test]
    async fn prose_only_completion_is_unparseable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("This was a strong argument overall.")),
            )
            .mount(&server)
            .await;

        let scorer = ApiScorer::from_config(&config_for(&server, None));
        let err = scorer.score("x").await.unwrap_err();
        assert!(matches!(err, ScoreError::Unparseable), "got {err:?}");
    }

    #[tokio::test]
    async fn missing_choices_is_empty_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "x" })))
            .mount(&server)
            .await;

        let scorer = ApiScorer::from_config(&config_for(&server, None));
        let err = scorer.score("x").await.unwrap_err();
        assert!(matches!(err, ScoreError::EmptyResponse), "got {err:?}");
    }

    #[tokio::test]
    async fn non_json_envelope_is_parse_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let scorer = ApiScorer::from_config(&config_for(&server, None));
        let err = scorer.score("x").await.unwrap_err();
        assert!(matches!(err, ScoreError::Parse(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn slow_collaborator_times_out() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion("{}"))
                    .set_delay(Duration::from_secs(3)),
            )
            .mount(&server)
            .await;

        let mut config = config_for(&server, None);
        config.timeout_secs = 1;
        let scorer = ApiScorer::from_config(&config);
        let err = scorer.score("x").await.unwrap_err();
        assert!(matches!(err, ScoreError::Timeout), "got {err:?}");
    }

    #[tokio::test]
    async fn unreachable_host_is_request_error() {
        let scorer = ApiScorer::from_config(&ScoringConfig {
            base_url: "http://127.0.0.1:1".into(),
            timeout_secs: 2,
            ..ScoringConfig::default()
        });
        let err = scorer.score("x").await.unwrap_err();
        assert!(
            matches!(err, ScoreError::Request(_) | ScoreError::Timeout),
            "got {err:?}"
        );
    }
}
