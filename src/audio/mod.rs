//! Inbound audio: PCM16 decode → sample buffer → normalized windows.
//!
//! # Pipeline
//!
//! ```text
//! binary frame (LE i16) → AudioChunk → WindowAccumulator → Window (f32, [-1, 1])
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use live_transcribe::audio::{AudioChunk, WindowAccumulator};
//!
//! let mut acc = WindowAccumulator::new(16_000 * 3);
//! let bytes = vec![0u8; 2 * 16_000];
//! for _ in 0..3 {
//!     acc.append(&AudioChunk::from_le_bytes(&bytes).unwrap());
//! }
//! assert_eq!(acc.extract_ready_windows().count(), 1);
//! ```

pub mod accumulator;
pub mod chunk;

pub use accumulator::{ReadyWindows, WindowAccumulator};
pub use chunk::{AudioChunk, AudioError, Window};
