//! The listener connecting the simulation to the solver host.

use std::rc::Rc;
use std::time::Duration;

use rt_clock::{ListenerResult, TickListener};
use rt_core::TimeLapse;
use rt_pdp::Snapshot;
use rt_solver::SolverHost;
use tracing::debug;

use crate::{CentralState, ConsistencyChecker};

/// Dispatches a snapshot whenever new parcels were announced or a vehicle
/// found its schedule entry inconsistent, and turns a solver fault into a
/// listener error so the run stops.
///
/// Registered after the scenario driver and before the vehicles.  New
/// parcels are dispatched in `before_tick`, so the vehicles can act on the
/// answer in the same tick; repairs requested by the vehicles during a tick
/// are dispatched in its `after_tick`.  After each dispatch the listener
/// waits up to `settle` of wall time for the solver to report done.
pub struct RtCentral {
    host:          Rc<SolverHost>,
    checker:       ConsistencyChecker,
    settle:        Duration,
    known_parcels: usize,
}

impl RtCentral {
    pub fn new(host: Rc<SolverHost>, checker: ConsistencyChecker, settle: Duration) -> Self {
        Self { host, checker, settle, known_parcels: 0 }
    }

    fn dispatch(
        &mut self,
        state:       &CentralState,
        time:        u64,
        new_parcels: bool,
        repair:      bool,
    ) -> ListenerResult {
        self.known_parcels = state.world.parcel_count();
        let snapshot = Snapshot::capture(&state.world, time);
        let generation = self.host.dispatch(snapshot)?;
        let settled = self.host.wait_until_done(self.settle);
        debug!(generation, new_parcels, repair, time, settled, "world changed, solver notified");
        Ok(())
    }
}

impl TickListener<CentralState> for RtCentral {
    fn before_tick(&mut self, lapse: &TimeLapse, state: &mut CentralState) -> ListenerResult {
        self.host.check_health()?;
        let new_parcels = state.world.parcel_count() > self.known_parcels;
        let repair = self.checker.take_resnapshot_request();
        if new_parcels || repair {
            self.dispatch(state, lapse.start, new_parcels, repair)?;
        }
        Ok(())
    }

    fn after_tick(&mut self, lapse: &TimeLapse, state: &mut CentralState) -> ListenerResult {
        if self.checker.take_resnapshot_request() {
            self.dispatch(state, lapse.end, false, true)?;
        }
        Ok(())
    }
}
