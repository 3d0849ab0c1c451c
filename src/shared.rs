//! Interrupt-safe sharing of a value between the main loop and ISRs.

use core::cell::RefCell;

use critical_section::Mutex;

/// A value guarded by a critical section.
///
/// Place the [`Positioner`](crate::Positioner) in a `static Shared<_>` and
/// reach it from the main loop, the tick interrupt and the rotation-edge
/// interrupt through [`Shared::lock`]. Interrupts are masked for the
/// duration of the closure and the previous mask is restored afterwards.
///
/// ```rust,ignore
/// static POSITIONER: Shared<Option<Board>> = Shared::new(None);
///
/// #[interrupt]
/// fn TIM1_UP() {
///     POSITIONER.lock(|p| {
///         if let Some(p) = p {
///             let _ = p.on_tick();
///         }
///     });
/// }
/// ```
pub struct Shared<T> {
    inner: Mutex<RefCell<T>>,
}

impl<T> Shared<T> {
    /// Wrap a value.
    pub const fn new(value: T) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(value)),
        }
    }

    /// Run `f` with exclusive access to the value.
    pub fn lock<R>(&self, f: impl FnOnce(&mut T) -> R) -> R {
        critical_section::with(|cs| f(&mut *self.inner.borrow_ref_mut(cs)))
    }

    /// Replace the value, returning the previous one.
    pub fn replace(&self, value: T) -> T {
        critical_section::with(|cs| self.inner.replace(cs, value))
    }
}

impl<T: Clone> Shared<T> {
    /// Copy the value out.
    pub fn get_cloned(&self) -> T {
        critical_section::with(|cs| self.inner.borrow_ref(cs).clone())
    }
}
