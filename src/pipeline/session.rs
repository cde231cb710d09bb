//! Per-connection pipeline: drives chunk → window → transcribe → (score) → emit.
//!
//! [`SessionPipeline`] owns one [`WindowAccumulator`] and a clone of the shared
//! [`InferenceDispatcher`].  It talks to the transport only through two
//! channels, so it can be driven by a WebSocket bridge or directly by tests.
//!
//! # Flow
//!
//! ```text
//! CONNECTED ──send greeting──▶ STREAMING
//!   loop recv InboundFrame
//!     Text   → warn, ignore
//!     Audio  → decode PCM16-LE ──misaligned──▶ {"error": "Server error: …"} → CLOSED
//!            → append → for every ready window, oldest first:
//!                  dispatcher.transcribe(window)            (blocking pool, serialized)
//!                    Failed(msg)   → TranscriptOnly: {"text": "[transcription error: msg]"}
//!                                    Debate:         same text, unscored error "scores"
//!                    ""            → nothing
//!                    text          → TranscriptOnly: {"text"}
//!                                    Debate:         {"text", "scores", "timestamp"}
//!   inbound closed, client gone or outbound send fails ──▶ CLOSED
//! ```

use thiserror::Error;
use tokio::sync::mpsc;

use crate::audio::{AudioChunk, AudioError, Window, WindowAccumulator};
use crate::scoring::{ScoreFailure, ScoreResult, ScoringClient};
use crate::stt::{InferenceDispatcher, TranscriptionResult};

use super::message::{InboundFrame, OutboundMessage};
use super::state::SessionState;

// ---------------------------------------------------------------------------
// SessionError
// ---------------------------------------------------------------------------

/// Conditions that end a session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The outbound side is gone; nothing more can be delivered.
    #[error("transport closed")]
    Transport,

    /// The client sent a frame that cannot be interpreted as audio.
    #[error(transparent)]
    Frame(#[from] AudioError),
}

// ---------------------------------------------------------------------------
// PipelineVariant
// ---------------------------------------------------------------------------

/// Which entry point the connection arrived on.
#[derive(Debug, Clone)]
pub enum PipelineVariant {
    /// Transcripts only; the scoring stage is skipped entirely.
    TranscriptOnly,
    /// Transcripts plus scores from the given client.
    Debate(ScoringClient),
    /// Deprecated path: notify, then close.
    Legacy,
}

impl PipelineVariant {
    /// The status message sent right after the connection is accepted.
    pub fn greeting(&self) -> OutboundMessage {
        match self {
            PipelineVariant::TranscriptOnly => {
                OutboundMessage::info("Connected to transcript-only endpoint.")
            }
            PipelineVariant::Debate(_) => OutboundMessage::info(
                "Connected to debate scoring endpoint. Transcription + AI analysis active.",
            ),
            PipelineVariant::Legacy => OutboundMessage::Deprecated {
                info: "This endpoint is deprecated. Use /ws/transcript for text-only \
                       or /ws/debate for AI scoring."
                    .into(),
                redirect: "Please update your frontend to use /ws/transcript or /ws/debate"
                    .into(),
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PipelineVariant::TranscriptOnly => "transcript",
            PipelineVariant::Debate(_) => "debate",
            PipelineVariant::Legacy => "legacy",
        }
    }
}

// ---------------------------------------------------------------------------
// SessionSummary
// ---------------------------------------------------------------------------

/// Counters reported when a session closes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Audio frames accepted.
    pub chunks: usize,
    /// Windows handed to the dispatcher.
    pub windows: usize,
    /// Messages delivered to the outbound channel, greeting included.
    pub messages: usize,
    /// Windows whose transcription failed.
    pub failed_windows: usize,
    /// Samples still buffered when the session closed.
    pub buffered_at_close: usize,
}

// ---------------------------------------------------------------------------
// SessionPipeline
// ---------------------------------------------------------------------------

/// One connection's state machine.
///
/// ```rust,no_run
/// use live_transcribe::pipeline::{PipelineVariant, SessionPipeline};
/// use live_transcribe::stt::{InferenceDispatcher, NoModelStt};
///
/// # async fn example() {
/// let dispatcher = InferenceDispatcher::new(Box::new(NoModelStt::new("ggml-base.bin")));
/// let (frames_tx, frames_rx) = tokio::sync::mpsc::channel(64);
/// let (messages_tx, mut messages_rx) = tokio::sync::mpsc::channel(64);
///
/// let session = SessionPipeline::new(dispatcher, PipelineVariant::TranscriptOnly, 48_000);
/// tokio::spawn(session.run(frames_rx, messages_tx));
/// # drop(frames_tx);
/// # while messages_rx.recv().await.is_some() {}
/// # }
/// ```
pub struct SessionPipeline {
    dispatcher: InferenceDispatcher,
    variant: PipelineVariant,
    accumulator: WindowAccumulator,
    state: SessionState,
    summary: SessionSummary,
}

impl SessionPipeline {
    /// Create a session in `Connected`.
    ///
    /// # Panics
    ///
    /// Panics if `window_size == 0`.
    pub fn new(
        dispatcher: InferenceDispatcher,
        variant: PipelineVariant,
        window_size: usize,
    ) -> Self {
        Self {
            dispatcher,
            variant,
            accumulator: WindowAccumulator::new(window_size),
            state: SessionState::Connected,
            summary: SessionSummary::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    // -----------------------------------------------------------------------
    // Main async loop
    // -----------------------------------------------------------------------

    /// Run until the client goes away, the outbound side fails, or a frame
    /// cannot be decoded.  Always ends in `Closed`.
    ///
    /// Dropping `outbound` on return is the transport's cue to close.
    pub async fn run(
        mut self,
        mut inbound: mpsc::Receiver<InboundFrame>,
        outbound: mpsc::Sender<OutboundMessage>,
    ) -> SessionSummary {
        log::info!("session[{}]: connected", self.variant.name());

        match self.stream(&mut inbound, &outbound).await {
            Ok(()) => log::debug!("session[{}]: client finished", self.variant.name()),
            Err(SessionError::Transport) => {
                log::debug!("session[{}]: transport closed", self.variant.name())
            }
            Err(SessionError::Frame(e)) => {
                log::warn!("session[{}]: {e}", self.variant.name());
                // Last message before closing; delivery is best effort.
                if outbound
                    .send(OutboundMessage::error(format!("Server error: {e}")))
                    .await
                    .is_ok()
                {
                    self.summary.messages += 1;
                }
            }
        }

        self.transition(SessionState::Closed);
        self.summary.buffered_at_close = self.accumulator.buffered();

        log::info!(
            "session[{}]: closed after {} chunks, {} windows ({} failed), {} messages",
            self.variant.name(),
            self.summary.chunks,
            self.summary.windows,
            self.summary.failed_windows,
            self.summary.messages
        );
        self.summary
    }

    async fn stream(
        &mut self,
        inbound: &mut mpsc::Receiver<InboundFrame>,
        outbound: &mpsc::Sender<OutboundMessage>,
    ) -> Result<(), SessionError> {
        let greeting = self.variant.greeting();
        self.send(outbound, greeting).await?;

        if matches!(self.variant, PipelineVariant::Legacy) {
            return Ok(());
        }
        self.transition(SessionState::Streaming);

        while let Some(frame) = inbound.recv().await {
            let bytes = match frame {
                InboundFrame::Audio(bytes) => bytes,
                InboundFrame::Text(_) => {
                    log::warn!("session[{}]: ignoring text frame", self.variant.name());
                    continue;
                }
            };

            let chunk = AudioChunk::from_le_bytes(&bytes)?;
            self.summary.chunks += 1;
            self.accumulator.append(&chunk);

            // Collect first so the accumulator borrow ends before any await.
            let windows: Vec<Window> = self.accumulator.extract_ready_windows().collect();
            for window in windows {
                // A departed client gives up its place in the inference queue.
                let message = tokio::select! {
                    message = self.process_window(window) => message,
                    _ = outbound.closed() => return Err(SessionError::Transport),
                };
                if let Some(message) = message {
                    self.send(outbound, message).await?;
                }
            }
        }

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Per-window work
    // -----------------------------------------------------------------------

    /// Transcribe one window and build its message.  `None` for silence.
    async fn process_window(&mut self, window: Window) -> Option<OutboundMessage> {
        self.summary.windows += 1;

        let result = self.dispatcher.transcribe(window).await;
        if let TranscriptionResult::Failed(msg) = &result {
            log::warn!("session[{}]: degraded window: {msg}", self.variant.name());
            self.summary.failed_windows += 1;
            let text = format!("[transcription error: {msg}]");
            return Some(match &self.variant {
                PipelineVariant::Debate(_) => OutboundMessage::scored(
                    text,
                    ScoreResult::Failed(ScoreFailure::transcription_failed()),
                ),
                PipelineVariant::TranscriptOnly | PipelineVariant::Legacy => {
                    OutboundMessage::text(text)
                }
            });
        }
        let Some(text) = result.utterance() else {
            log::debug!("session[{}]: silent window", self.variant.name());
            return None;
        };

        match &self.variant {
            PipelineVariant::Debate(client) => {
                let scores = client.score(text).await;
                Some(OutboundMessage::scored(text, scores))
            }
            PipelineVariant::TranscriptOnly | PipelineVariant::Legacy => {
                Some(OutboundMessage::text(text))
            }
        }
    }

    // -----------------------------------------------------------------------
    // Helpers
    // -----------------------------------------------------------------------

    async fn send(
        &mut self,
        outbound: &mpsc::Sender<OutboundMessage>,
        message: OutboundMessage,
    ) -> Result<(), SessionError> {
        outbound
            .send(message)
            .await
            .map_err(|_| SessionError::Transport)?;
        self.summary.messages += 1;
        Ok(())
    }

    fn transition(&mut self, next: SessionState) {
        if self.state.can_transition_to(next) {
            log::debug!(
                "session[{}]: {} → {}",
                self.variant.name(),
                self.state,
                next
            );
            self.state = next;
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
