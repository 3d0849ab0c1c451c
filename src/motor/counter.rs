//! Lock-free pulse counter shared between tick and main contexts.

use portable_atomic::{AtomicBool, AtomicU16, Ordering};

use super::state::TargetPulses;

/// Effect of one tick on the counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Counting is disabled (continuous move or stopped).
    Ignored,
    /// Pulse counted; the target is still ahead.
    Counted(u16),
    /// The count is at the bounded target.
    TargetReached(u16),
}

/// Pulse counter written from the tick interrupt and read from the main loop.
///
/// The increment and the comparison against the target happen in a single
/// compare-exchange, so the count never passes the target and a reader never
/// sees a torn value.
#[derive(Debug)]
pub struct PulseCounter {
    current: AtomicU16,
    limit: AtomicU16,
    counting: AtomicBool,
}

impl Default for PulseCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl PulseCounter {
    /// Create a disarmed counter at zero.
    pub const fn new() -> Self {
        Self {
            current: AtomicU16::new(0),
            limit: AtomicU16::new(0),
            counting: AtomicBool::new(false),
        }
    }

    /// Reset to zero and start counting towards `target`.
    ///
    /// A continuous target leaves counting disabled.
    pub fn arm(&self, target: TargetPulses) {
        self.counting.store(false, Ordering::Release);
        self.current.store(0, Ordering::Release);
        match target {
            TargetPulses::Bounded(limit) => {
                self.limit.store(limit, Ordering::Release);
                self.counting.store(true, Ordering::Release);
            }
            TargetPulses::Continuous => {
                self.limit.store(u16::MAX, Ordering::Release);
            }
        }
    }

    /// Stop counting; the count is kept.
    #[inline]
    pub fn disarm(&self) {
        self.counting.store(false, Ordering::Release);
    }

    /// Whether ticks are currently counted.
    #[inline]
    pub fn is_counting(&self) -> bool {
        self.counting.load(Ordering::Acquire)
    }

    /// Pulses counted since the last `arm` or `reset`.
    #[inline]
    pub fn current(&self) -> u16 {
        self.current.load(Ordering::Acquire)
    }

    /// Zero the count without changing the target.
    #[inline]
    pub fn reset(&self) {
        self.current.store(0, Ordering::Release);
    }

    /// True when counting and the count is at the target.
    #[inline]
    pub fn target_reached(&self) -> bool {
        self.is_counting() && self.current() >= self.limit.load(Ordering::Acquire)
    }

    /// Count one pulse.
    pub fn tick(&self) -> TickOutcome {
        if !self.is_counting() {
            return TickOutcome::Ignored;
        }

        let limit = self.limit.load(Ordering::Acquire);
        match self
            .current
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| {
                (n < limit).then(|| n + 1)
            }) {
            Ok(previous) if previous + 1 >= limit => TickOutcome::TargetReached(previous + 1),
            Ok(previous) => TickOutcome::Counted(previous + 1),
            Err(saturated) => TickOutcome::TargetReached(saturated),
        }
    }
}
