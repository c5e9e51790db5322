//! Checking schedule entries against ground truth before they are acted on.
//!
//! A schedule is computed from a snapshot that may be several ticks old by
//! the time a vehicle reads it.  In the meantime another vehicle may have
//! claimed a parcel, or this vehicle may have loaded one the solver did not
//! know about.  An entry that no longer fits is rejected for that vehicle
//! only, and the checker asks [`RtCentral`][crate::RtCentral] for a fresh
//! snapshot.  At most one request is raised per schedule version, so a
//! solver that keeps producing stale schedules costs one dispatch each.

use std::sync::Arc;

use parking_lot::Mutex;
use rt_core::{ParcelId, VehicleId};
use rt_pdp::{ParcelState, World};
use thiserror::Error;
use tracing::info;

/// Why a schedule entry was rejected.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum Inconsistency {
    #[error("schedule has no entry for the vehicle")]
    MissingEntry,

    #[error("{0} is not part of the world")]
    UnknownParcel(ParcelId),

    #[error("{parcel} is {state}")]
    NotAssignable { parcel: ParcelId, state: ParcelState },

    #[error("{0} is aboard but missing from the entry")]
    CargoOmitted(ParcelId),
}

#[derive(Debug, Default)]
struct RepairState {
    requested:    bool,
    last_flagged: u64,
    repairs:      u64,
}

/// Shared between all vehicles and the central listener; clones share state.
#[derive(Clone, Debug, Default)]
pub struct ConsistencyChecker {
    state: Arc<Mutex<RepairState>>,
}

impl ConsistencyChecker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Verify `entry` (schedule `version`) for `vehicle`.
    ///
    /// Every listed parcel must be unclaimed or aboard `vehicle`, and every
    /// parcel aboard must be listed.  On failure a re-snapshot is requested.
    pub fn check(
        &self,
        world:   &World,
        vehicle: VehicleId,
        entry:   Option<&[ParcelId]>,
        version: u64,
    ) -> Result<(), Inconsistency> {
        let result = validate(world, vehicle, entry);
        if let Err(reason) = &result {
            self.request_repair(vehicle, version, reason);
        }
        result
    }

    /// Consume a pending re-snapshot request.
    pub fn take_resnapshot_request(&self) -> bool {
        std::mem::take(&mut self.state.lock().requested)
    }

    /// Number of schedule versions found inconsistent so far.
    pub fn repairs(&self) -> u64 {
        self.state.lock().repairs
    }

    fn request_repair(&self, vehicle: VehicleId, version: u64, reason: &Inconsistency) {
        let mut st = self.state.lock();
        if version <= st.last_flagged {
            return;
        }
        st.last_flagged = version;
        st.requested = true;
        st.repairs += 1;
        info!(vehicle = %vehicle, version, %reason, "inconsistent schedule, requesting new snapshot");
    }
}

/// Keep only the stops of `route` that `vehicle` may still serve.
pub fn prune_route(world: &World, vehicle: VehicleId, route: &[ParcelId]) -> Vec<ParcelId> {
    route
        .iter()
        .copied()
        .filter(|&p| world.parcel(p).is_ok_and(|rec| assignable(rec.state(), vehicle)))
        .collect()
}

#[inline]
fn assignable(state: ParcelState, vehicle: VehicleId) -> bool {
    match state {
        ParcelState::Announced | ParcelState::Available => true,
        ParcelState::InCargo(holder) => holder == vehicle,
        ParcelState::Delivered => false,
    }
}

fn validate(world: &World, vehicle: VehicleId, entry: Option<&[ParcelId]>) -> Result<(), Inconsistency> {
    let entry = entry.ok_or(Inconsistency::MissingEntry)?;

    for &parcel in entry {
        let state = world
            .parcel(parcel)
            .map_err(|_| Inconsistency::UnknownParcel(parcel))?
            .state();
        if !assignable(state, vehicle) {
            return Err(Inconsistency::NotAssignable { parcel, state });
        }
    }

    if let Ok(record) = world.vehicle(vehicle) {
        if let Some(&missing) = record.contents().iter().find(|p| !entry.contains(p)) {
            return Err(Inconsistency::CargoOmitted(missing));
        }
    }
    Ok(())
}
