//! Scenario description and the listener that plays it out.

use std::collections::BTreeMap;

use rt_clock::{ListenerResult, TickListener};
use rt_core::{Point, TimeLapse};
use rt_pdp::{ParcelSpec, VehicleSpec};
use tracing::debug;

use crate::CentralState;

/// Depot, fleet, and the parcels to announce over time.
#[derive(Clone, Debug, Default)]
pub struct Scenario {
    pub depot:    Point,
    pub vehicles: Vec<VehicleSpec>,
    pub parcels:  Vec<ParcelSpec>,
}

impl Scenario {
    pub fn new(depot: Point) -> Self {
        Self { depot, vehicles: Vec::new(), parcels: Vec::new() }
    }

    pub fn vehicle(mut self, spec: VehicleSpec) -> Self {
        self.vehicles.push(spec);
        self
    }

    pub fn parcel(mut self, spec: ParcelSpec) -> Self {
        self.parcels.push(spec);
        self
    }
}

/// Announces each parcel during the tick that contains its announce time
/// and opens pickup windows as time passes.
///
/// Keeps `CentralState::pending_announcements` up to date.
pub struct ScenarioDriver {
    /// `announce_time → specs`, in scenario order within one time.
    queue: BTreeMap<u64, Vec<ParcelSpec>>,
}

impl ScenarioDriver {
    pub fn new(parcels: impl IntoIterator<Item = ParcelSpec>) -> Self {
        let mut queue: BTreeMap<u64, Vec<ParcelSpec>> = BTreeMap::new();
        for spec in parcels {
            queue.entry(spec.announce_time).or_default().push(spec);
        }
        Self { queue }
    }

    /// Parcels not yet announced.
    pub fn pending(&self) -> usize {
        self.queue.values().map(Vec::len).sum()
    }
}

impl TickListener<CentralState> for ScenarioDriver {
    fn before_tick(&mut self, lapse: &TimeLapse, state: &mut CentralState) -> ListenerResult {
        let later = self.queue.split_off(&lapse.end);
        let due = std::mem::replace(&mut self.queue, later);
        for (time, specs) in due {
            for spec in specs {
                let id = state.world.announce(spec, time);
                debug!(parcel = %id, time, "parcel announced");
            }
        }
        state.world.refresh_availability(lapse.start);
        state.pending_announcements = self.pending();
        Ok(())
    }
}
