//! When a run ends.

use rt_core::TimeLapse;

use crate::CentralState;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StopCondition {
    /// The tick starting at this simulated time is the last one run.
    TimeOut(u64),
    /// Every parcel announced and delivered, every vehicle empty at the depot.
    ScenarioComplete,
    /// Stop as soon as any of the inner conditions holds.
    AnyOf(Vec<StopCondition>),
}

impl StopCondition {
    pub fn is_met(&self, state: &CentralState, lapse: &TimeLapse) -> bool {
        match self {
            StopCondition::TimeOut(t) => lapse.start > *t,
            StopCondition::ScenarioComplete => {
                state.pending_announcements == 0
                    && state.world.all_delivered()
                    && state.world.all_vehicles_at_depot()
            }
            StopCondition::AnyOf(inner) => inner.iter().any(|c| c.is_met(state, lapse)),
        }
    }
}
