//! Solver contracts.

use rt_pdp::{Schedule, Snapshot};

use crate::{CancelToken, Scheduler, SolverResult};

/// A solver that reacts to snapshots asynchronously and publishes through a
/// [`Scheduler`].
///
/// # Contract
///
/// - `init` is called exactly once, on the worker thread, before any
///   snapshot.  Keep the scheduler; it is the only way to publish.
/// - `receive_snapshot` is called on the same worker, never concurrently
///   with itself.  It may block for as long as it needs.  When `cancel`
///   fires, a newer snapshot is waiting: return `Err(Cancelled)` soon.
/// - Call [`Scheduler::done_for_now`] once finished reacting.  Until then the
///   simulation runs at wall-clock pace.
///
/// Returning any error other than `Cancelled` (or panicking) is fatal for
/// the solver instance.
pub trait RealtimeSolver: Send + 'static {
    fn init(&mut self, scheduler: Scheduler) -> SolverResult<()>;

    fn receive_snapshot(&mut self, snapshot: Snapshot, cancel: &CancelToken) -> SolverResult<()>;
}

/// A blocking solver: snapshot in, schedule out.
///
/// Wrap it in [`SolverAdapter`][crate::SolverAdapter] to run it in real time.
/// Long computations should poll `cancel` and bail out with `Err(Cancelled)`.
pub trait Solver: Send + 'static {
    fn solve(&mut self, snapshot: &Snapshot, cancel: &CancelToken) -> SolverResult<Schedule>;
}

/// Seeded factory for solver instances.
pub trait SolverSupplier {
    fn get(&self, seed: u64) -> Box<dyn RealtimeSolver>;
}

impl<F> SolverSupplier for F
where
    F: Fn(u64) -> Box<dyn RealtimeSolver>,
{
    fn get(&self, seed: u64) -> Box<dyn RealtimeSolver> {
        self(seed)
    }
}
