//! Best-effort extraction of a JSON score payload from free-text completions.
//!
//! Models wrap the requested object in prose or code fences.  The policy is
//! deliberately simple: take everything from the first `{` to the last `}`
//! and try to parse it.  `None` is an ordinary outcome, not an error.

use super::types::ScoreCard;

/// Span from the first `{` to the last `}` inclusive, if both exist in that
/// order.
///
/// ```
/// use live_transcribe::scoring::extract::json_span;
///
/// assert_eq!(json_span("Sure! {\"a\": 1} Hope that helps."), Some("{\"a\": 1}"));
/// assert_eq!(json_span("} backwards {"), None);
/// ```
pub fn json_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    (end > start).then(|| &text[start..=end])
}

/// Parse the embedded score payload out of `completion`.
pub fn parse_score_card(completion: &str) -> Option<ScoreCard> {
    let span = json_span(completion)?;
    match serde_json::from_str(span) {
        Ok(card) => Some(card),
        Err(e) => {
            log::debug!("scoring: completion span is not a score card: {e}");
            None
        }
    }
}
