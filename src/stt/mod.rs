//! STT (Speech-to-Text) module.
//!
//! # Architecture
//!
//! ```text
//!  session A ─┐                        async FIFO lock            blocking pool
//!  session B ─┼─▶ InferenceDispatcher ─▶ Mutex<Box<dyn SttEngine>> ─▶ spawn_blocking
//!  session C ─┘        (Clone)          (queued windows wait here)    └─▶ WhisperEngine
//! ```
//!
//! # Quick start
//!
//! ```rust,no_run
//! use live_transcribe::audio::Window;
//! use live_transcribe::stt::{InferenceDispatcher, TranscribeParams, WhisperEngine};
//!
//! # async fn run() {
//! let engine = WhisperEngine::load("models/ggml-base.bin", TranscribeParams::default())
//!     .expect("model not found");
//! let dispatcher = InferenceDispatcher::new(Box::new(engine));
//!
//! let window = Window::from_i16(&vec![0i16; 48_000]); // 3 s of silence
//! let result = dispatcher.transcribe(window).await;
//! println!("{result:?}");
//! # }
//! ```

pub mod dispatcher;
pub mod engine;
pub mod model;
pub mod transcribe;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use dispatcher::{InferenceDispatcher, TranscriptionResult};
pub use engine::{NoModelStt, SttEngine, SttError, WhisperEngine};
pub use model::{find_model_by_id, resolve_model_path, ModelInfo, WHISPER_MODELS};
pub use transcribe::{SamplingStrategy, TranscribeParams};

#[cfg(test)]
pub use engine::MockSttEngine;
