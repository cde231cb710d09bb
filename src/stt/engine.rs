//! The inference engine collaborator.
//!
//! [`SttEngine::transcribe`] takes `&mut self`: an engine is assumed not to be
//! reentrant, and the only way to call it is through exclusive access, which
//! the [`InferenceDispatcher`](crate::stt::InferenceDispatcher) provides with
//! one process-wide mutex.
//!
//! * [`WhisperEngine`]: whisper-rs model loaded once, one decoder state
//!   reused for every window.
//! * [`NoModelStt`]: stands in when the model could not be loaded.
//! * `MockSttEngine`: test double (`#[cfg(test)]` only).

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, WhisperContext, WhisperContextParameters, WhisperState};

use crate::stt::transcribe::TranscribeParams;

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Error)]
pub enum SttError {
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// whisper-rs rejected the model file or could not allocate decoder state.
    #[error("Model load failed: {0}")]
    ModelLoad(String),

    #[error("Inference failed: {0}")]
    Inference(String),

    /// The window is outside what the engine accepts.
    #[error(
        "Window of {samples} samples is outside the accepted range {}..={}",
        MIN_AUDIO_SAMPLES,
        MAX_AUDIO_SAMPLES
    )]
    WindowLength { samples: usize },
}

// ---------------------------------------------------------------------------
// SttEngine
// ---------------------------------------------------------------------------

/// Synchronous, CPU-bound speech-to-text.
///
/// `audio` is 16 kHz mono `f32` in `[-1, 1]`.  Calls block for the whole
/// inference pass; run them on a blocking thread.
pub trait SttEngine: Send {
    fn transcribe(&mut self, audio: &[f32]) -> Result<String, SttError>;
}

/// 0.5 s at 16 kHz.
pub(crate) const MIN_AUDIO_SAMPLES: usize = 8_000;
/// 60 s at 16 kHz.
pub(crate) const MAX_AUDIO_SAMPLES: usize = 960_000;

pub(crate) fn check_audio_len(audio: &[f32]) -> Result<(), SttError> {
    if (MIN_AUDIO_SAMPLES..=MAX_AUDIO_SAMPLES).contains(&audio.len()) {
        Ok(())
    } else {
        Err(SttError::WindowLength {
            samples: audio.len(),
        })
    }
}

// ---------------------------------------------------------------------------
// WhisperEngine
// ---------------------------------------------------------------------------

/// whisper.cpp via whisper-rs.
///
/// The context (model weights) and one decoder state are created at load
/// time; each call reruns the state on the new window.
pub struct WhisperEngine {
    state: WhisperState,
    _ctx: WhisperContext,
    params: TranscribeParams,
}

// SAFETY: whisper-rs marks both handles Send; the engine is only ever used
// from one thread at a time through `&mut self`.
unsafe impl Send for WhisperEngine {}

impl std::fmt::Debug for WhisperEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperEngine")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl WhisperEngine {
    /// Load the GGML model at `model_path`.
    ///
    /// Fails with [`SttError::ModelNotFound`] when the file is missing and
    /// [`SttError::ModelLoad`] when whisper-rs cannot use it.
    pub fn load(model_path: impl AsRef<Path>, params: TranscribeParams) -> Result<Self, SttError> {
        let path = model_path.as_ref();
        if !path.is_file() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }
        let path_str = path
            .to_str()
            .ok_or_else(|| SttError::ModelLoad(format!("non-UTF-8 path: {}", path.display())))?;

        let ctx = WhisperContext::new_with_params(path_str, WhisperContextParameters::default())
            .map_err(|e| SttError::ModelLoad(e.to_string()))?;
        let state = ctx
            .create_state()
            .map_err(|e| SttError::ModelLoad(e.to_string()))?;

        Ok(Self {
            state,
            _ctx: ctx,
            params,
        })
    }
}

impl SttEngine for WhisperEngine {
    fn transcribe(&mut self, audio: &[f32]) -> Result<String, SttError> {
        check_audio_len(audio)?;

        let mut fp = FullParams::new(self.params.strategy.to_whisper());
        fp.set_language(self.params.language_hint());
        fp.set_n_threads(self.params.n_threads);
        // The state is shared by every session; no prompt carry-over between windows.
        fp.set_no_context(true);
        fp.set_print_progress(false);
        fp.set_print_realtime(false);
        fp.set_print_special(false);
        fp.set_print_timestamps(false);

        let inference = |e: whisper_rs::WhisperError| SttError::Inference(e.to_string());
        self.state.full(fp, audio).map_err(inference)?;

        let count = self.state.full_n_segments().map_err(inference)?;
        let mut text = String::new();
        for i in 0..count {
            text.push_str(&self.state.full_get_segment_text(i).map_err(inference)?);
        }
        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// NoModelStt
// ---------------------------------------------------------------------------

/// Engine used when the model file could not be loaded at startup.
///
/// Every call fails with [`SttError::ModelNotFound`], which sessions surface
/// as a degraded text frame instead of refusing connections.
#[derive(Debug, Clone)]
pub struct NoModelStt {
    path: String,
}

impl NoModelStt {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl SttEngine for NoModelStt {
    fn transcribe(&mut self, _audio: &[f32]) -> Result<String, SttError> {
        Err(SttError::ModelNotFound(self.path.clone()))
    }
}

// ---------------------------------------------------------------------------
// MockSttEngine  (test-only)
// ---------------------------------------------------------------------------


#[cfg(test)]
pub use mock::MockSttEngine;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
