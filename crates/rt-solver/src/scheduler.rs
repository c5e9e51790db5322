//! The bridge between a solver's worker and the simulation thread.
//!
//! One [`Bridge`] per host.  The worker side holds a [`Scheduler`], the
//! simulation side holds [`ScheduleReader`]s.  The published schedule is an
//! `Arc` swapped under a `RwLock`, so readers always see a whole schedule.
//!
//! Lock order is `gens` before `slot`.  Readers only ever take `slot`.

use std::sync::Arc;

use parking_lot::{Condvar, Mutex, RwLock};
use rt_clock::RealtimeClock;
use rt_pdp::Schedule;
use tracing::debug;

use crate::{CancelToken, SolverError, SolverResult};

/// Generation bookkeeping shared by the host, the worker, and the scheduler.
#[derive(Debug, Default)]
pub(crate) struct Generations {
    /// Newest dispatched generation.  `0` before the first dispatch.
    pub(crate) current:  u64,
    /// Generation the worker most recently started computing.
    pub(crate) running:  u64,
    /// Last generation that signalled `done_for_now`.
    pub(crate) done:     u64,
    /// Vehicle count of the snapshot behind `running`.
    pub(crate) vehicles: usize,
    /// Token of the newest dispatched generation.
    pub(crate) cancel:   Option<CancelToken>,
    pub(crate) computing: bool,
    /// First fatal error raised by the solver.
    pub(crate) fault:    Option<SolverError>,
}

impl Generations {
    /// `true` while the worker's computation is still the newest one.
    #[inline]
    fn running_is_current(&self) -> bool {
        self.running == self.current
    }
}

#[derive(Debug)]
struct Published {
    version:  u64,
    schedule: Arc<Schedule>,
}

#[derive(Debug)]
pub(crate) struct Bridge {
    pub(crate) gens:    Mutex<Generations>,
    /// Signalled when `done` catches up with `current` or a fault is stored.
    pub(crate) settled: Condvar,
    slot:               RwLock<Option<Published>>,
    pub(crate) clock:   RealtimeClock,
}

impl Bridge {
    pub(crate) fn new(clock: RealtimeClock) -> Self {
        Self {
            gens: Mutex::new(Generations::default()),
            settled: Condvar::new(),
            slot: RwLock::new(None),
            clock,
        }
    }

    fn publish(&self, schedule: Schedule) -> u64 {
        let mut slot = self.slot.write();
        let version = slot.as_ref().map_or(1, |p| p.version + 1);
        *slot = Some(Published { version, schedule: Arc::new(schedule) });
        version
    }

    fn current(&self) -> SolverResult<Arc<Schedule>> {
        self.slot
            .read()
            .as_ref()
            .map(|p| Arc::clone(&p.schedule))
            .ok_or(SolverError::NoSchedule)
    }
}

// ── Worker side ───────────────────────────────────────────────────────────────

/// Handed to [`RealtimeSolver::init`][crate::RealtimeSolver::init]; the only
/// channel through which a solver publishes.
#[derive(Clone, Debug)]
pub struct Scheduler {
    bridge: Arc<Bridge>,
}

impl Scheduler {
    pub(crate) fn new(bridge: Arc<Bridge>) -> Self {
        Self { bridge }
    }

    /// Publish `schedule`, replacing the previous one.
    ///
    /// Calls from a computation that has been superseded are ignored.  The
    /// schedule must have one entry per vehicle of the snapshot being solved.
    pub fn update_schedule(&self, schedule: Schedule) -> SolverResult<()> {
        let gens = self.bridge.gens.lock();
        if gens.running == 0 {
            return Err(SolverError::NoSnapshot);
        }
        if !gens.running_is_current() {
            debug!(generation = gens.running, current = gens.current, "dropping stale schedule");
            return Ok(());
        }
        if schedule.len() != gens.vehicles {
            return Err(SolverError::EntryCountMismatch {
                expected: gens.vehicles,
                got:      schedule.len(),
            });
        }
        let version = self.bridge.publish(schedule);
        debug!(generation = gens.running, version, "schedule published");
        Ok(())
    }

    /// The most recently published schedule.
    pub fn current_schedule(&self) -> SolverResult<Arc<Schedule>> {
        self.bridge.current()
    }

    /// Signal that the solver is finished with the current snapshot.
    ///
    /// Releases real-time pacing.  Repeated calls for the same snapshot and
    /// calls from a superseded computation are no-ops.
    pub fn done_for_now(&self) {
        let mut gens = self.bridge.gens.lock();
        if !gens.running_is_current() {
            debug!(generation = gens.running, current = gens.current, "ignoring stale done_for_now");
            return;
        }
        if gens.done == gens.current {
            return;
        }
        gens.done = gens.current;
        self.bridge.clock.request_simulated();
        self.bridge.settled.notify_all();
        debug!(generation = gens.done, "solver done for now");
    }
}

// ── Simulation side ───────────────────────────────────────────────────────────

/// Read access to the published schedule.
#[derive(Clone, Debug)]
pub struct ScheduleReader {
    bridge: Arc<Bridge>,
}

impl ScheduleReader {
    pub(crate) fn new(bridge: Arc<Bridge>) -> Self {
        Self { bridge }
    }

    /// Fails with "No schedule has been set" until the first publish.
    pub fn current_schedule(&self) -> SolverResult<Arc<Schedule>> {
        self.bridge.current()
    }

    /// Version of the published schedule; `0` while none has been set.
    /// Increases by one with every publish.
    pub fn version(&self) -> u64 {
        self.bridge.slot.read().as_ref().map_or(0, |p| p.version)
    }

    /// Version and schedule, read together.
    pub fn latest(&self) -> Option<(u64, Arc<Schedule>)> {
        self.bridge
            .slot
            .read()
            .as_ref()
            .map(|p| (p.version, Arc::clone(&p.schedule)))
    }
}
