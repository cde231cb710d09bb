//! Connection server: accepts WebSocket connections and runs one
//! [`SessionPipeline`](crate::pipeline::SessionPipeline) per connection.
//!
//! | Path              | Variant                                  |
//! |-------------------|------------------------------------------|
//! | `/ws/transcript`  | transcripts only                         |
//! | `/ws/debate`      | transcripts plus scores                  |
//! | `/ws`             | deprecated: notice, then close           |
//! | `/health`         | liveness                                 |
//! | `/`               | service info                             |
//!
//! Every connection gets its own tokio task (spawned by axum on upgrade);
//! the only thing sessions share is the
//! [`InferenceDispatcher`](crate::stt::InferenceDispatcher).

pub mod routes;
pub mod socket;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use routes::{
    build_router, AppState, DEBATE_PATH, HEALTH_PATH, LEGACY_PATH, TRANSCRIPT_PATH,
};
pub use socket::bridge_session;

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
