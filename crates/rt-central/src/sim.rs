//! A fully wired run.

use std::rc::Rc;

use rt_clock::{RealtimeClock, RunSummary, TickDispatcher, TickListener};
use rt_pdp::{ParcelState, World};
use rt_solver::{ScheduleReader, SolverHost};
use tracing::info;

use crate::{CentralResult, ConsistencyChecker, StopCondition};

/// The tick context shared by every listener.
#[derive(Clone, Debug)]
pub struct CentralState {
    pub world:                 World,
    /// Scenario parcels not yet announced.
    pub pending_announcements: usize,
}

/// Outcome of [`CentralSim::run`].
#[derive(Clone, Debug)]
pub struct RunReport {
    pub summary:          RunSummary,
    pub parcels:          usize,
    pub delivered:        usize,
    /// Snapshots dispatched to the solver.
    pub dispatches:       u64,
    /// Schedule versions rejected by the consistency checker.
    pub repairs:          u64,
    pub mode_transitions: u64,
}

/// Built by [`CentralBuilder`][crate::CentralBuilder].
pub struct CentralSim {
    pub(crate) dispatcher: TickDispatcher<CentralState>,
    pub(crate) state:      CentralState,
    pub(crate) stop:       StopCondition,
    pub(crate) host:       Rc<SolverHost>,
    pub(crate) checker:    ConsistencyChecker,
}

impl CentralSim {
    /// Tick until the stop condition holds.
    ///
    /// A solver fault aborts the run with the fault as the error source.
    pub fn run(&mut self) -> CentralResult<RunReport> {
        let stop = &self.stop;
        let summary = self.dispatcher.run(&mut self.state, |s, lapse| stop.is_met(s, lapse))?;

        let world = &self.state.world;
        let report = RunReport {
            parcels:          world.parcel_count(),
            delivered:        world
                .parcels()
                .iter()
                .filter(|p| p.state() == ParcelState::Delivered)
                .count(),
            dispatches:       self.host.generation(),
            repairs:          self.checker.repairs(),
            mode_transitions: self.dispatcher.clock().transitions(),
            summary,
        };
        info!(
            end_time = report.summary.end_time,
            ticks = report.summary.ticks,
            delivered = report.delivered,
            parcels = report.parcels,
            dispatches = report.dispatches,
            repairs = report.repairs,
            "run finished"
        );
        Ok(report)
    }

    /// Register an extra listener.  It runs after the built-in listeners.
    pub fn add_listener<L: TickListener<CentralState> + 'static>(&mut self, listener: L) {
        self.dispatcher.register(listener);
    }

    pub fn world(&self) -> &World {
        &self.state.world
    }

    pub fn state(&self) -> &CentralState {
        &self.state
    }

    pub fn clock(&self) -> RealtimeClock {
        self.dispatcher.clock()
    }

    pub fn schedule_reader(&self) -> ScheduleReader {
        self.host.reader()
    }
}
