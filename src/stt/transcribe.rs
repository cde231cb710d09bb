//! Decoder settings applied to every window.

use crate::config::SttConfig;

/// Language value that lets Whisper detect the language itself.
pub const AUTO_LANGUAGE: &str = "auto";

// ---------------------------------------------------------------------------
// SamplingStrategy
// ---------------------------------------------------------------------------

/// Owned, `Clone` counterpart of `whisper_rs::SamplingStrategy`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SamplingStrategy {
    Greedy { best_of: i32 },
    BeamSearch { beam_size: i32, patience: f32 },
}

impl Default for SamplingStrategy {
    /// Single-candidate greedy decoding; every session queues behind the
    /// same engine, so per-window latency comes first.
    fn default() -> Self {
        SamplingStrategy::Greedy { best_of: 1 }
    }
}

impl SamplingStrategy {
    pub(crate) fn to_whisper(self) -> whisper_rs::SamplingStrategy {
        match self {
            SamplingStrategy::Greedy { best_of } => {
                whisper_rs::SamplingStrategy::Greedy { best_of }
            }
            SamplingStrategy::BeamSearch {
                beam_size,
                patience,
            } => whisper_rs::SamplingStrategy::BeamSearch {
                beam_size,
                patience,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// TranscribeParams
// ---------------------------------------------------------------------------

/// Settings applied to every window.
///
/// ```
/// use live_transcribe::config::SttConfig;
/// use live_transcribe::stt::TranscribeParams;
///
/// let params = TranscribeParams::from(&SttConfig { language: "en".into(), ..SttConfig::default() });
/// assert_eq!(params.language_hint(), Some("en"));
/// assert_eq!(TranscribeParams::default().language_hint(), None);
/// ```
#[derive(Debug, Clone)]
pub struct TranscribeParams {
    /// ISO-639-1 code, or [`AUTO_LANGUAGE`].
    pub language: String,
    pub strategy: SamplingStrategy,
    /// CPU threads whisper.cpp may use for one window.
    pub n_threads: i32,
}

impl Default for TranscribeParams {
    fn default() -> Self {
        Self {
            language: AUTO_LANGUAGE.into(),
            strategy: SamplingStrategy::default(),
            n_threads: inference_threads(),
        }
    }
}

impl From<&SttConfig> for TranscribeParams {
    fn from(config: &SttConfig) -> Self {
        let strategy = match config.beam_size {
            0 | 1 => SamplingStrategy::default(),
            beam_size => SamplingStrategy::BeamSearch {
                beam_size: beam_size as i32,
                patience: -1.0,
            },
        };
        Self {
            language: config.language.clone(),
            strategy,
            ..Self::default()
        }
    }
}

impl TranscribeParams {
    /// The language to force, or `None` for detection.
    pub fn language_hint(&self) -> Option<&str> {
        let lang = self.language.trim();
        if lang.is_empty() || lang.eq_ignore_ascii_case(AUTO_LANGUAGE) {
            None
        } else {
            Some(lang)
        }
    }
}

/// Inference runs one window at a time, so it may use most cores; capped at 8.
fn inference_threads() -> i32 {
    std::thread::available_parallelism()
        .map(|n| n.get().min(8) as i32)
        .unwrap_or(4)
}
