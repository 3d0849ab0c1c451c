//! Mode switch outputs.

use embedded_hal::digital::{self, Error as _, OutputPin};

use crate::state::SwitchState;

/// One of the three mode switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Switch {
    /// Current-sense switch.
    Current,
    /// Hold-off switch.
    Holdoff,
    /// Division switch.
    Division,
}

/// GPIO-level writes of the mode switches.
pub trait SwitchOutputs {
    /// Error raised by the output pins.
    type Error: core::fmt::Debug;

    /// Drive one switch high (`true`) or low.
    fn set(&mut self, switch: Switch, on: bool) -> Result<(), Self::Error>;

    /// Drive all three switches. Every pin is written even if one fails;
    /// the first error is returned.
    fn apply(&mut self, switches: SwitchState) -> Result<(), Self::Error> {
        let current = self.set(Switch::Current, switches.current);
        let holdoff = self.set(Switch::Holdoff, switches.holdoff);
        let division = self.set(Switch::Division, switches.division);
        current.and(holdoff).and(division)
    }
}

impl<S: SwitchOutputs + ?Sized> SwitchOutputs for &mut S {
    type Error = S::Error;

    fn set(&mut self, switch: Switch, on: bool) -> Result<(), Self::Error> {
        (**self).set(switch, on)
    }
}

/// Three push-pull pins driving the mode switches.
pub struct SwitchBank<CUR, HOLD, DIV> {
    current: CUR,
    holdoff: HOLD,
    division: DIV,
}

impl<CUR, HOLD, DIV> SwitchBank<CUR, HOLD, DIV>
where
    CUR: OutputPin,
    HOLD: OutputPin,
    DIV: OutputPin,
{
    /// Wrap the switch pins. Levels are left untouched until the first write.
    pub fn new(current: CUR, holdoff: HOLD, division: DIV) -> Self {
        Self {
            current,
            holdoff,
            division,
        }
    }

    /// Take the pins back.
    pub fn release(self) -> (CUR, HOLD, DIV) {
        (self.current, self.holdoff, self.division)
    }
}

impl<CUR, HOLD, DIV> SwitchOutputs for SwitchBank<CUR, HOLD, DIV>
where
    CUR: OutputPin,
    HOLD: OutputPin,
    DIV: OutputPin,
{
    type Error = digital::ErrorKind;

    fn set(&mut self, switch: Switch, on: bool) -> Result<(), Self::Error> {
        match switch {
            Switch::Current => drive(&mut self.current, on),
            Switch::Holdoff => drive(&mut self.holdoff, on),
            Switch::Division => drive(&mut self.division, on),
        }
    }
}

fn drive<P: OutputPin>(pin: &mut P, on: bool) -> Result<(), digital::ErrorKind> {
    let result = if on { pin.set_high() } else { pin.set_low() };
    result.map_err(|e| e.kind())
}
