//! Monotonic millisecond clock.

/// Free-running millisecond counter, e.g. a SysTick-driven HAL tick.
///
/// The counter wraps at `u32::MAX`; use [`elapsed_ms`] for comparisons.
pub trait Clock {
    /// Current time in milliseconds.
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    #[inline]
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Milliseconds from `since` to `now`, correct across one counter wrap.
#[inline]
pub const fn elapsed_ms(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}
