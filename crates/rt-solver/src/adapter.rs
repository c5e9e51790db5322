//! Running a blocking [`Solver`] under the real-time contract.

use rt_pdp::Snapshot;

use crate::{CancelToken, RealtimeSolver, Scheduler, Solver, SolverError, SolverResult};

/// Wraps a [`Solver`]: every snapshot is solved synchronously on the worker,
/// the result is published, then `done_for_now` is signalled.
///
/// A computation cancelled while solving publishes nothing.
pub struct SolverAdapter<S> {
    solver:    S,
    scheduler: Option<Scheduler>,
}

impl<S: Solver> SolverAdapter<S> {
    pub fn new(solver: S) -> Self {
        Self { solver, scheduler: None }
    }
}

impl<S: Solver> RealtimeSolver for SolverAdapter<S> {
    fn init(&mut self, scheduler: Scheduler) -> SolverResult<()> {
        if self.scheduler.is_some() {
            return Err(SolverError::AlreadyInitialized);
        }
        self.scheduler = Some(scheduler);
        Ok(())
    }

    fn receive_snapshot(&mut self, snapshot: Snapshot, cancel: &CancelToken) -> SolverResult<()> {
        let scheduler = self.scheduler.as_ref().ok_or(SolverError::NotInitialized)?;
        let schedule = self.solver.solve(&snapshot, cancel)?;
        cancel.check()?;
        scheduler.update_schedule(schedule)?;
        scheduler.done_for_now();
        Ok(())
    }
}
