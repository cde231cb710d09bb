//! Score payloads as they appear on the wire.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::prompt::CRITERIA;

/// Feedback attached to the neutral fallback card.
pub const NEUTRAL_FEEDBACK: &str =
    "Analysis in progress - please check your scoring API configuration";

// ---------------------------------------------------------------------------
// ScoreCard
// ---------------------------------------------------------------------------

/// Named numeric criteria plus free-text feedback.
///
/// Serializes flat: `{"clarity": 8, "logic": 7, …, "feedback": "…"}`.  Any
/// JSON object deserializes: numbers become criteria and every other key the
/// judge added is kept in `extra` and sent back unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Value>")]
pub struct ScoreCard {
    #[serde(flatten)]
    pub criteria: BTreeMap<String, f64>,
    pub feedback: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for ScoreCard {
    fn from(object: Map<String, Value>) -> Self {
        let mut card = Self {
            criteria: BTreeMap::new(),
            feedback: String::new(),
            extra: Map::new(),
        };
        for (key, value) in object {
            if key == "feedback" {
                card.feedback = match value {
                    Value::String(text) => text,
                    Value::Null => String::new(),
                    other => other.to_string(),
                };
                continue;
            }
            match value.as_f64() {
                Some(score) => {
                    card.criteria.insert(key, score);
                }
                None => {
                    card.extra.insert(key, value);
                }
            }
        }
        card
    }
}

impl ScoreCard {
    /// Deterministic score set used when the collaborator answered but its
    /// completion carried no parsable payload.
    ///
    /// ```
    /// use live_transcribe::scoring::ScoreCard;
    ///
    /// let card = ScoreCard::neutral();
    /// assert_eq!(card.criteria["evidence"], 6.0);
    /// assert_eq!(card.criteria["overall_score"], 6.8);
    /// ```
    pub fn neutral() -> Self {
        let mut criteria: BTreeMap<String, f64> = CRITERIA
            .iter()
            .map(|c| (c.name.to_string(), c.neutral))
            .collect();
        criteria.insert("overall_score".into(), 6.8);
        Self {
            criteria,
            feedback: NEUTRAL_FEEDBACK.into(),
            extra: Map::new(),
        }
    }

    pub fn get(&self, criterion: &str) -> Option<f64> {
        self.criteria.get(criterion).copied()
    }
}

// ---------------------------------------------------------------------------
// ScoreFailure
// ---------------------------------------------------------------------------

/// Explicit error payload sent in place of scores.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreFailure {
    pub error: String,
    pub message: String,
}

impl ScoreFailure {
    /// Sent with a window whose transcription failed; the judge is not asked.
    pub fn transcription_failed() -> Self {
        Self {
            error: "Not scored: transcription failed".into(),
            message: "No transcript was available to score".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ScoreResult
// ---------------------------------------------------------------------------

/// What the debate variant puts in the `scores` field.  Always present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScoreResult {
    Failed(ScoreFailure),
    Scored(ScoreCard),
}

impl ScoreResult {
    pub fn is_failure(&self) -> bool {
        matches!(self, ScoreResult::Failed(_))
    }

    pub fn card(&self) -> Option<&ScoreCard> {
        match self {
            ScoreResult::Scored(card) => Some(card),
            ScoreResult::Failed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn neutral_card_covers_every_criterion() {
        let card = ScoreCard::neutral();
        for criterion in CRITERIA {
            assert!(card.get(criterion.name).is_some(), "{}", criterion.name);
        }
        assert_eq!(card.get("clarity"), Some(7.0));
        assert_eq!(card.feedback, NEUTRAL_FEEDBACK);
    }

    #[test]
    fn card_serializes_flat() {
        let value = serde_json::to_value(ScoreResult::Scored(ScoreCard::neutral())).unwrap();
        assert_eq!(value["delivery"], json!(7.0));
        assert_eq!(value["feedback"], json!(NEUTRAL_FEEDBACK));
        assert!(value.get("criteria").is_none());
    }

    #[test]
    fn judge_extras_pass_through_unchanged() {
        let card: ScoreCard = serde_json::from_value(json!({
            "clarity": 4,
            "strengths": ["concise"],
            "weaknesses": null,
            "feedback": "Needs evidence."
        }))
        .unwrap();
        assert_eq!(card.get("clarity"), Some(4.0));
        assert_eq!(card.feedback, "Needs evidence.");
        assert_eq!(card.extra["strengths"], json!(["concise"]));

        let value = serde_json::to_value(&card).unwrap();
        assert_eq!(value["clarity"], json!(4.0));
        assert_eq!(value["strengths"], json!(["concise"]));
        assert_eq!(value["weaknesses"], Value::Null);
        assert!(value.get("extra").is_none());
    }

    #[test]
    fn failure_serializes_error_and_message() {
        let failure = ScoreResult::Failed(ScoreFailure {
            error: "Scoring API error: 500".into(),
            message: "Please check your API key and try again".into(),
        });
        assert_eq!(
            serde_json::to_value(&failure).unwrap(),
            json!({
                "error": "Scoring API error: 500",
                "message": "Please check your API key and try again"
            })
        );
        assert!(failure.is_failure());
        assert!(failure.card().is_none());
    }

    #[test]
    fn failure_payload_deserializes_as_failure() {
        let parsed: ScoreResult =
            serde_json::from_value(json!({"error": "e", "message": "m"})).unwrap();
        assert!(parsed.is_failure());
    }
}
