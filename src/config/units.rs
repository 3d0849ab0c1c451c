//! Unit types for timing quantities.
//!
//! Keeps pulse frequencies, reference-clock ticks and millisecond dwell
//! times apart at compile time.

use serde::Deserialize;

/// Reference tick rate of the pulse timer (1 MHz).
pub const REFERENCE_TICK_HZ: u32 = 1_000_000;

/// Highest pulse frequency the driver will program.
pub const MAX_FREQUENCY_HZ: u16 = 1000;

/// Lowest non-zero pulse frequency.
pub const MIN_FREQUENCY_HZ: u16 = 1;

/// Pulse frequency in hertz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Hertz(pub u16);

impl Hertz {
    /// Create a new Hertz value.
    #[inline]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u16 {
        self.0
    }

    /// Clamp into the programmable range `[1, 1000]`.
    #[inline]
    pub fn clamped(self) -> Self {
        Self(self.0.clamp(MIN_FREQUENCY_HZ, MAX_FREQUENCY_HZ))
    }

    /// Timer period for this frequency at the 1 MHz reference rate.
    ///
    /// `round(1_000_000 / f) - 1`, after clamping `f` into `[1, 1000]`.
    pub fn period(self) -> Ticks {
        let freq = u32::from(self.clamped().0);
        let rounded = (REFERENCE_TICK_HZ + freq / 2) / freq;
        Ticks(rounded - 1)
    }
}

/// Duration in reference-clock ticks (1 us each).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Ticks(pub u32);

impl Ticks {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }

    /// Compare value giving a 50% duty cycle for this period.
    #[inline]
    pub const fn half(self) -> Self {
        Self(self.0 / 2)
    }
}

/// Duration in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(transparent)]
pub struct Milliseconds(pub u32);

impl Milliseconds {
    /// Get the raw value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}
