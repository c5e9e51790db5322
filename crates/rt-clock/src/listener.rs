//! Tick listener contract.

use rt_core::TimeLapse;

use crate::ListenerResult;

/// Callbacks invoked by [`TickDispatcher`][crate::TickDispatcher] once per
/// tick, in registration order.
///
/// `C` is the simulation context (ground truth) the listeners act on.  It is
/// only ever borrowed from the dispatcher's thread.
///
/// Both methods default to no-ops.  Returning an error aborts the run; the
/// dispatcher wraps it in [`ClockError::Listener`][crate::ClockError].
pub trait TickListener<C> {
    /// Called for every listener before any `after_tick` of the same tick.
    fn before_tick(&mut self, _lapse: &TimeLapse, _ctx: &mut C) -> ListenerResult {
        Ok(())
    }

    fn after_tick(&mut self, _lapse: &TimeLapse, _ctx: &mut C) -> ListenerResult {
        Ok(())
    }
}
