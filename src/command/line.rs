//! Line framing of the serial byte stream.

use heapless::{String, Vec};

/// Longest command line kept; further bytes are dropped.
pub const MAX_LINE_LEN: usize = 63;

/// One framed command line.
pub type Line = String<MAX_LINE_LEN>;

/// Accumulates bytes until `\r` or `\n`.
#[derive(Debug, Default)]
pub struct LineBuffer {
    bytes: Vec<u8, MAX_LINE_LEN>,
    overflowed: bool,
}

impl LineBuffer {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        Self {
            bytes: Vec::new(),
            overflowed: false,
        }
    }

    /// Feed one byte; returns the line it terminates, if any.
    ///
    /// Empty lines are skipped and lines that are not valid UTF-8 are
    /// dropped.
    pub fn push(&mut self, byte: u8) -> Option<Line> {
        match byte {
            b'\r' | b'\n' => self.take(),
            _ => {
                if self.bytes.push(byte).is_err() && !self.overflowed {
                    warn!("command line longer than {} bytes truncated", MAX_LINE_LEN);
                    self.overflowed = true;
                }
                None
            }
        }
    }

    /// Feed a chunk, calling `on_line` for every completed line.
    pub fn extend(&mut self, bytes: &[u8], mut on_line: impl FnMut(&str)) {
        for &byte in bytes {
            if let Some(line) = self.push(byte) {
                on_line(&line);
            }
        }
    }

    /// Bytes buffered so far.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True when no partial line is buffered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Drop the partial line.
    pub fn clear(&mut self) {
        self.bytes.clear();
        self.overflowed = false;
    }

    fn take(&mut self) -> Option<Line> {
        if self.bytes.is_empty() {
            return None;
        }
        let bytes = core::mem::take(&mut self.bytes);
        self.overflowed = false;
        match String::from_utf8(bytes) {
            Ok(line) => Some(line),
            Err(_) => {
                warn!("dropped non UTF-8 command line");
                None
            }
        }
    }
}
