//! Raw PCM chunks as they arrive from the transport, and the normalized
//! windows handed to the STT engine.

use thiserror::Error;

/// Divisor used to map `i16` samples onto `[-1.0, 1.0]`.
pub const I16_SCALE: f32 = 32_767.0;

// ---------------------------------------------------------------------------
// AudioError
// ---------------------------------------------------------------------------

/// Errors raised while interpreting inbound audio frames.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// The frame length is not a multiple of two bytes, so it cannot be a
    /// packed sequence of 16-bit samples.
    #[error("binary frame of {0} bytes is not a whole number of 16-bit samples")]
    MisalignedFrame(usize),
}

// ---------------------------------------------------------------------------
// AudioChunk
// ---------------------------------------------------------------------------

/// One receive event's worth of mono signed 16-bit samples, in arrival order.
///
/// No duration is implied: a chunk may hold a single sample or several
/// windows' worth.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioChunk {
    samples: Vec<i16>,
}

impl AudioChunk {
    pub fn new(samples: Vec<i16>) -> Self {
        Self { samples }
    }

    /// Decode a packed little-endian PCM16 payload.
    ///
    /// ```
    /// use live_transcribe::audio::AudioChunk;
    ///
    /// let chunk = AudioChunk::from_le_bytes(&[0x01, 0x00, 0xff, 0x7f]).unwrap();
    /// assert_eq!(chunk.samples(), &[1, i16::MAX]);
    /// ```
    pub fn from_le_bytes(bytes: &[u8]) -> Result<Self, AudioError> {
        if bytes.len() % 2 != 0 {
            return Err(AudioError::MisalignedFrame(bytes.len()));
        }
        let samples = bytes
            .chunks_exact(2)
            .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        Ok(Self { samples })
    }

    pub fn samples(&self) -> &[i16] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Window
// ---------------------------------------------------------------------------

/// A fixed-length slice of audio normalized to `f32` in `[-1.0, 1.0]`.
///
/// Built once by [`WindowAccumulator`](super::WindowAccumulator) and moved
/// into the inference stage; never cloned on the hot path.
#[derive(Debug, Clone, PartialEq)]
pub struct Window {
    samples: Vec<f32>,
}

impl Window {
    /// Normalize `raw` by dividing each sample by 32 767.
    ///
    /// `i16::MIN` would land just below `-1.0`, so results are clamped.
    pub fn from_i16(raw: &[i16]) -> Self {
        let samples = raw
            .iter()
            .map(|&s| (s as f32 / I16_SCALE).max(-1.0))
            .collect();
        Self { samples }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_little_endian_pairs() {
        let bytes = [0x00, 0x80, 0x00, 0x00, 0x34, 0x12];
        let chunk = AudioChunk::from_le_bytes(&bytes).unwrap();
        assert_eq!(chunk.samples(), &[i16::MIN, 0, 0x1234]);
    }

    #[test]
    fn empty_payload_is_an_empty_chunk() {
        let chunk = AudioChunk::from_le_bytes(&[]).unwrap();
        assert!(chunk.is_empty());
    }

    #[test]
    fn odd_length_payload_is_rejected() {
        let err = AudioChunk::from_le_bytes(&[1, 2, 3]).unwrap_err();
        assert_eq!(err, AudioError::MisalignedFrame(3));
        assert!(err.to_string().contains("3 bytes"));
    }

    #[test]
    fn zeros_normalize_to_zeros() {
        let window = Window::from_i16(&[0; 64]);
        assert!(window.samples().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn full_scale_positive_normalizes_to_one() {
        let window = Window::from_i16(&[i16::MAX; 4]);
        assert!(window.samples().iter().all(|&s| (s - 1.0).abs() < 1e-6));
    }

    #[test]
    fn full_scale_negative_is_clamped() {
        let window = Window::from_i16(&[i16::MIN, -i16::MAX]);
        assert_eq!(window.samples()[0], -1.0);
        assert!((window.samples()[1] + 1.0).abs() < 1e-6);
    }
}
