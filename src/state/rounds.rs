//! Rotation counter updated from the rotation-edge interrupt.

use core::cell::Cell;
use core::fmt;

use critical_section::Mutex;

/// Saturating count of mechanical rotations in `[0, 65535]`.
///
/// Every read-modify-write runs inside a critical section, so the count can
/// be shared between the rotation-edge interrupt and the command layer. The
/// previous interrupt mask is restored on exit.
pub struct RoundCounter {
    count: Mutex<Cell<u16>>,
}

impl Default for RoundCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RoundCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RoundCounter").field(&self.get()).finish()
    }
}

impl RoundCounter {
    /// Create a counter at zero.
    pub const fn new() -> Self {
        Self {
            count: Mutex::new(Cell::new(0)),
        }
    }

    /// Current count.
    pub fn get(&self) -> u16 {
        critical_section::with(|cs| self.count.borrow(cs).get())
    }

    /// Count one rotation forward, saturating at `u16::MAX`.
    pub fn increment(&self) -> u16 {
        self.update(|n| n.saturating_add(1))
    }

    /// Count one rotation backward, saturating at zero.
    pub fn decrement(&self) -> u16 {
        self.update(|n| n.saturating_sub(1))
    }

    /// Reset to zero.
    pub fn reset(&self) {
        critical_section::with(|cs| self.count.borrow(cs).set(0));
    }

    fn update(&self, f: impl FnOnce(u16) -> u16) -> u16 {
        critical_section::with(|cs| {
            let cell = self.count.borrow(cs);
            let next = f(cell.get());
            cell.set(next);
            next
        })
    }
}
