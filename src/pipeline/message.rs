//! Frames crossing the session boundary.
//!
//! Inbound frames arrive from the transport already split into binary and
//! text.  Outbound messages serialize untagged, so each variant's field set
//! is its wire shape:
//!
//! ```text
//! {"info": "..."}
//! {"info": "...", "redirect": "..."}
//! {"text": "..."}
//! {"text": "...", "scores": {...}, "timestamp": 1712345678.25}
//! {"error": "..."}
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;

use crate::scoring::ScoreResult;

/// One frame received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    /// Packed signed 16-bit little-endian mono samples.
    Audio(Vec<u8>),
    /// Not part of the protocol; logged and ignored.
    Text(String),
}

/// One message sent to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum OutboundMessage {
    /// Status notice carrying a replacement path.
    Deprecated { info: String, redirect: String },
    /// Status/lifecycle notice.
    Info { info: String },
    /// Transcript with scores (debate variant).
    Scored {
        text: String,
        scores: ScoreResult,
        timestamp: f64,
    },
    /// Transcript only, or a bracketed transcription error.
    Text { text: String },
    /// Non-fatal error notice for the current operation.
    Error { error: String },
}

impl OutboundMessage {
    pub fn info(info: impl Into<String>) -> Self {
        OutboundMessage::Info { info: info.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        OutboundMessage::Text { text: text.into() }
    }

    pub fn error(error: impl Into<String>) -> Self {
        OutboundMessage::Error {
            error: error.into(),
        }
    }

    /// Transcript plus scores, stamped with the current wall-clock time.
    pub fn scored(text: impl Into<String>, scores: ScoreResult) -> Self {
        OutboundMessage::Scored {
            text: text.into(),
            scores,
            timestamp: unix_timestamp(),
        }
    }

    /// JSON text for the wire.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

/// Seconds since the Unix epoch, with sub-second precision.
pub fn unix_timestamp() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
