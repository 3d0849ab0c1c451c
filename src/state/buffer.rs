//! Rolling window of current-sensor samples.

use heapless::HistoryBuffer;

/// Number of samples in the current window.
pub const CURRENT_BUFFER_LEN: usize = 8;

/// Fixed-capacity circular buffer of signed current samples.
///
/// Starts filled with zeros. Each push overwrites the oldest slot.
#[derive(Debug, Clone)]
pub struct CurrentBuffer {
    samples: HistoryBuffer<i16, CURRENT_BUFFER_LEN>,
}

impl Default for CurrentBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl CurrentBuffer {
    /// Create a zero-filled buffer.
    pub fn new() -> Self {
        Self {
            samples: HistoryBuffer::new_with(0),
        }
    }

    /// Record a sample.
    #[inline]
    pub fn push(&mut self, sample: i16) {
        self.samples.write(sample);
    }

    /// True when every slot is strictly below `threshold`.
    pub fn all_below(&self, threshold: i16) -> bool {
        self.samples.as_slice().iter().all(|&sample| sample < threshold)
    }

    /// Most recent sample (0 before the first push).
    #[inline]
    pub fn latest(&self) -> i16 {
        self.samples.recent().copied().unwrap_or(0)
    }

    /// Slots in storage order.
    #[inline]
    pub fn slots(&self) -> &[i16] {
        self.samples.as_slice()
    }

    /// Samples from oldest to newest.
    pub fn oldest_first(&self) -> impl Iterator<Item = i16> + '_ {
        self.samples.oldest_ordered().copied()
    }

    /// Refill with zeros.
    pub fn clear(&mut self) {
        self.samples.clear_with(0);
    }
}
