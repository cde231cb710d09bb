//! Per-connection session pipeline.
//!
//! This module wires accumulation → transcription → optional scoring → emit
//! for one connection, and defines the connection lifecycle.
//!
//! # Architecture
//!
//! ```text
//! InboundFrame (mpsc) ──▶ SessionPipeline::run()  ← one tokio task per connection
//!                              │
//!                              ├─ WindowAccumulator            (owned, per session)
//!                              ├─ InferenceDispatcher::transcribe   (shared engine, serialized)
//!                              └─ ScoringClient::score         (debate variant only)
//!                              │
//!                              ▼
//!                        OutboundMessage (mpsc) ──▶ transport writer
//! ```

pub mod message;
pub mod session;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use message::{unix_timestamp, InboundFrame, OutboundMessage};
pub use session::{PipelineVariant, SessionError, SessionPipeline, SessionSummary};
pub use state::SessionState;
