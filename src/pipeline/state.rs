//! Session lifecycle state machine.
//!
//! ```text
//! Connected ──greeting sent──▶ Streaming ──disconnect / transport error / bad frame──▶ Closed
//! Connected ──legacy path / send failure──────────────────────────────────────────────▶ Closed
//! ```
//!
//! Transcription and scoring failures never move the state; they degrade the
//! single message for that window and the loop stays in `Streaming`.

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// States of one connection's pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    /// Accepted; the greeting has not been delivered yet.
    #[default]
    Connected,

    /// Receiving chunks and emitting one message per non-silent window.
    Streaming,

    /// Terminal.  No message is sent after entering this state.
    Closed,
}

impl SessionState {
    /// Whether the machine allows moving from `self` to `next`.
    ///
    /// ```
    /// use live_transcribe::pipeline::SessionState;
    ///
    /// assert!(SessionState::Connected.can_transition_to(SessionState::Streaming));
    /// assert!(SessionState::Streaming.can_transition_to(SessionState::Closed));
    /// assert!(!SessionState::Closed.can_transition_to(SessionState::Streaming));
    /// ```
    pub fn can_transition_to(self, next: SessionState) -> bool {
        matches!(
            (self, next),
            (SessionState::Connected, SessionState::Streaming)
                | (SessionState::Connected, SessionState::Closed)
                | (SessionState::Streaming, SessionState::Closed)
        )
    }

    /// Short label for log lines.
    pub fn label(self) -> &'static str {
        match self {
            SessionState::Connected => "CONNECTED",
            SessionState::Streaming => "STREAMING",
            SessionState::Closed => "CLOSED",
        }
    }
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // ---- transitions ---

    #[test]
    fn connected_moves_to_streaming_or_closed() {
        assert!(SessionState::Connected.can_transition_to(SessionState::Streaming));
        assert!(SessionState::Connected.can_transition_to(SessionState::Closed));
    }

    #[test]
    fn streaming_only_moves_to_closed() {
        assert!(SessionState::Streaming.can_transition_to(SessionState::Closed));
        assert!(!SessionState::Streaming.can_transition_to(SessionState::Connected));
        assert!(!SessionState::Streaming.can_transition_to(SessionState::Streaming));
    }

    #[test]
    fn closed_is_terminal() {
        for next in [
            SessionState::Connected,
            SessionState::Streaming,
            SessionState::Closed,
        ] {
            assert!(!SessionState::Closed.can_transition_to(next));
        }
    }

    // ---- label / Default ---

    #[test]
    fn labels() {
        assert_eq!(SessionState::Connected.label(), "CONNECTED");
        assert_eq!(SessionState::Streaming.to_string(), "STREAMING");
        assert_eq!(SessionState::Closed.label(), "CLOSED");
    }

    #[test]
    fn default_is_connected() {
        assert_eq!(SessionState::default(), SessionState::Connected);
    }
}
