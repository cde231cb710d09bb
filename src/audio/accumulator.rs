//! Per-session sample buffer that cuts the inbound stream into fixed windows.
//!
//! Samples stay as raw `i16` until a full window is available, so leftovers
//! concatenate exactly with the next chunk.  Normalization happens only when
//! a [`Window`] is constructed.
//!
//! # Example
//!
//! ```rust
//! use live_transcribe::audio::{AudioChunk, WindowAccumulator};
//!
//! let mut acc = WindowAccumulator::new(4);
//! acc.append(&AudioChunk::new(vec![1, 2, 3, 4, 5, 6, 7, 8, 9]));
//!
//! let windows: Vec<_> = acc.extract_ready_windows().collect();
//! assert_eq!(windows.len(), 2);
//! assert_eq!(acc.buffered(), 1);
//! ```

use super::chunk::{AudioChunk, Window};

// ---------------------------------------------------------------------------
// WindowAccumulator
// ---------------------------------------------------------------------------

/// Growable buffer of samples not yet emitted in a window.
///
/// Mutated only by appends and by removing a window-sized prefix; never
/// shared between sessions.
#[derive(Debug)]
pub struct WindowAccumulator {
    buf: Vec<i16>,
    window_size: usize,
}

impl WindowAccumulator {
    /// Create an empty accumulator emitting windows of `window_size` samples.
    ///
    /// # Panics
    ///
    /// Panics if `window_size == 0`.
    pub fn new(window_size: usize) -> Self {
        assert!(window_size > 0, "window size must be > 0");
        Self {
            buf: Vec::with_capacity(window_size),
            window_size,
        }
    }

    /// Append a chunk's samples after everything already buffered.
    pub fn append(&mut self, chunk: &AudioChunk) {
        self.buf.extend_from_slice(chunk.samples());
    }

    /// Lazily yield every complete window currently buffered, oldest first.
    ///
    /// Each call to `next()` removes one window-sized prefix; the remainder
    /// (always `< window_size` once the iterator is exhausted) stays for the
    /// next chunk.
    pub fn extract_ready_windows(&mut self) -> ReadyWindows<'_> {
        ReadyWindows { acc: self }
    }

    /// Number of samples waiting for a window.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Samples per emitted window.
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Returns `true` when at least one window can be extracted.
    pub fn has_ready_window(&self) -> bool {
        self.buf.len() >= self.window_size
    }

    fn take_window(&mut self) -> Option<Window> {
        if !self.has_ready_window() {
            return None;
        }
        let window = Window::from_i16(&self.buf[..self.window_size]);
        self.buf.drain(..self.window_size);
        Some(window)
    }
}

// ---------------------------------------------------------------------------
// ReadyWindows
// ---------------------------------------------------------------------------

/// Iterator returned by [`WindowAccumulator::extract_ready_windows`].
#[derive(Debug)]
pub struct ReadyWindows<'a> {
    acc: &'a mut WindowAccumulator,
}

impl Iterator for ReadyWindows<'_> {
    type Item = Window;

    fn next(&mut self) -> Option<Window> {
        self.acc.take_window()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.acc.buffered() / self.acc.window_size;
        (n, Some(n))
    }
}

impl ExactSizeIterator for ReadyWindows<'_> {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
