//! Serialized, off-loop access to the shared STT engine.
//!
//! One [`InferenceDispatcher`] owns the process-wide engine.  Sessions hold
//! clones of the dispatcher, never the engine itself.  Every call:
//!
//! 1. waits its turn on an async, FIFO engine lock, so at most one inference
//!    runs at a time across all sessions and queued windows cost no thread;
//! 2. moves the [`Window`] and the lock guard onto tokio's blocking pool
//!    (`spawn_blocking`), so async workers never stall on inference;
//! 3. folds engine errors and task panics into [`TranscriptionResult::Failed`].
//!
//! Only the running inference occupies a blocking thread; the rest of the pool
//! stays free for DNS resolution and file I/O.

use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::audio::Window;
use crate::stt::engine::SttEngine;

// ---------------------------------------------------------------------------
// TranscriptionResult
// ---------------------------------------------------------------------------

/// Outcome of transcribing one window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptionResult {
    /// Engine succeeded.  The text is trimmed and may be empty (silence).
    Transcript(String),
    /// Engine or task failure, with a human-readable message.
    Failed(String),
}

impl TranscriptionResult {
    /// The spoken text, or `None` for silence and failures.
    pub fn utterance(&self) -> Option<&str> {
        match self {
            TranscriptionResult::Transcript(text) if !text.is_empty() => Some(text),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// InferenceDispatcher
// ---------------------------------------------------------------------------

/// Cheap-to-clone handle to the single shared engine instance.
#[derive(Clone)]
pub struct InferenceDispatcher {
    engine: Arc<Mutex<Box<dyn SttEngine>>>,
}

impl std::fmt::Debug for InferenceDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InferenceDispatcher").finish_non_exhaustive()
    }
}

impl InferenceDispatcher {
    /// Take ownership of `engine`.  Create one dispatcher per loaded model
    /// and clone it into each session.
    pub fn new(engine: Box<dyn SttEngine>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
        }
    }

    /// Transcribe `window` on the blocking pool.
    ///
    /// Never fails: errors come back as [`TranscriptionResult::Failed`].
    /// Dropping the future while it is still queued gives up its turn; once
    /// the inference has started it completes and its result is discarded.
    pub async fn transcribe(&self, window: Window) -> TranscriptionResult {
        let samples = window.len();
        let queued = Instant::now();
        let mut engine = Arc::clone(&self.engine).lock_owned().await;
        let waited = queued.elapsed();

        let joined = tokio::task::spawn_blocking(move || {
            let started = Instant::now();
            let result = engine.transcribe(window.samples());
            log::debug!(
                "stt: {samples} samples, waited {} ms, inference {} ms",
                waited.as_millis(),
                started.elapsed().as_millis()
            );
            result
        })
        .await;

        match joined {
            Ok(Ok(text)) => TranscriptionResult::Transcript(text.trim().to_string()),
            Ok(Err(e)) => {
                log::warn!("stt: transcription failed: {e}");
                TranscriptionResult::Failed(e.to_string())
            }
            Err(e) => {
                log::error!("stt: inference task failed: {e}");
                TranscriptionResult::Failed(format!("inference task failed: {e}"))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
