//! Live transcription service.
//!
//! Clients stream PCM16 audio over a WebSocket; the server cuts it into
//! fixed windows, transcribes each window with a shared Whisper model and,
//! on the debate endpoint, scores the transcript with an LLM judge.

pub mod audio;
pub mod config;
pub mod pipeline;
pub mod scoring;
pub mod server;
pub mod stt;
