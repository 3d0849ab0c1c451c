//! Move completion notification.

use super::state::MoveReport;

/// Handler invoked once per Moving to Stopped transition.
///
/// Runs in whatever context triggered the stop, which may be the tick
/// interrupt. Keep it short.
pub trait CompletionCallback {
    /// Called after the outputs are idle and the state mirror is cleared.
    fn on_complete(&mut self, report: &MoveReport);
}

/// No-op callback, the driver's default.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCallback;

impl CompletionCallback for NoCallback {
    #[inline]
    fn on_complete(&mut self, _report: &MoveReport) {}
}

impl<F> CompletionCallback for F
where
    F: FnMut(&MoveReport),
{
    #[inline]
    fn on_complete(&mut self, report: &MoveReport) {
        self(report)
    }
}
