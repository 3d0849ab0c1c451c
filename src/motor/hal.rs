//! Peripheral seams of the stepper driver.
//!
//! Board support crates implement these over their timer peripheral. The
//! driver never touches registers directly.

use crate::config::units::Ticks;

use super::state::Channel;

/// The two directional pulse outputs sharing one timer.
pub trait PulseOutput {
    /// Error raised by the timer peripheral.
    type Error: core::fmt::Debug;

    /// Start pulses on `channel`.
    fn enable(&mut self, channel: Channel) -> Result<(), Self::Error>;

    /// Stop pulses on `channel` and force it to its idle level.
    fn disable(&mut self, channel: Channel) -> Result<(), Self::Error>;

    /// Program the auto-reload period in reference ticks.
    fn set_period(&mut self, period: Ticks) -> Result<(), Self::Error>;

    /// Program the compare value of both channels.
    fn set_duty(&mut self, duty: Ticks) -> Result<(), Self::Error>;
}

/// Periodic update interrupt that fires once per pulse.
pub trait TickSource {
    /// Error raised by the timer peripheral.
    type Error: core::fmt::Debug;

    /// Enable the update interrupt.
    fn enable(&mut self) -> Result<(), Self::Error>;

    /// Disable the update interrupt.
    fn disable(&mut self) -> Result<(), Self::Error>;

    /// Reset the timer counter to zero.
    fn reset_counter(&mut self) -> Result<(), Self::Error>;

    /// Clear pending update and compare flags.
    fn clear_pending(&mut self);
}

impl<T: PulseOutput + ?Sized> PulseOutput for &mut T {
    type Error = T::Error;

    fn enable(&mut self, channel: Channel) -> Result<(), Self::Error> {
        (**self).enable(channel)
    }

    fn disable(&mut self, channel: Channel) -> Result<(), Self::Error> {
        (**self).disable(channel)
    }

    fn set_period(&mut self, period: Ticks) -> Result<(), Self::Error> {
        (**self).set_period(period)
    }

    fn set_duty(&mut self, duty: Ticks) -> Result<(), Self::Error> {
        (**self).set_duty(duty)
    }
}

impl<T: TickSource + ?Sized> TickSource for &mut T {
    type Error = T::Error;

    fn enable(&mut self) -> Result<(), Self::Error> {
        (**self).enable()
    }

    fn disable(&mut self) -> Result<(), Self::Error> {
        (**self).disable()
    }

    fn reset_counter(&mut self) -> Result<(), Self::Error> {
        (**self).reset_counter()
    }

    fn clear_pending(&mut self) {
        (**self).clear_pending()
    }
}
