//! Immutable world-state copies handed to solvers.
//!
//! A [`Snapshot`] is built on the simulation thread by
//! [`Snapshot::capture`] and then moved to the solver worker.  It owns all of
//! its data and exposes read-only accessors only.

use rt_core::{ParcelId, Point, VehicleId};

use crate::{ParcelSpec, World};

/// An unassigned parcel as the solver sees it.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParcelView {
    pub id:   ParcelId,
    pub spec: ParcelSpec,
}

/// One vehicle's state at capture time.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleSnapshot {
    pub id:          VehicleId,
    pub position:    Point,
    /// Parcels aboard, with their specs so the solver can plan deliveries.
    pub contents:    Vec<ParcelView>,
    pub destination: Option<ParcelId>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Snapshot {
    time:              u64,
    available_parcels: Vec<ParcelView>,
    vehicles:          Vec<VehicleSnapshot>,
}

impl Snapshot {
    /// Copy the solver-relevant part of `world` at simulated time `time`.
    ///
    /// Available parcels are the announced ones no vehicle has claimed yet.
    /// Vehicles appear in id order, so `vehicles()[i].id == VehicleId(i)`.
    pub fn capture(world: &World, time: u64) -> Self {
        let available_parcels = world
            .parcels()
            .iter()
            .filter(|p| p.state().is_unassigned())
            .map(|p| ParcelView { id: p.id(), spec: p.spec().clone() })
            .collect();

        let vehicles = world
            .vehicles()
            .iter()
            .map(|v| VehicleSnapshot {
                id:          v.id(),
                position:    v.position(),
                contents:    v
                    .contents()
                    .iter()
                    .filter_map(|&p| world.parcel(p).ok())
                    .map(|p| ParcelView { id: p.id(), spec: p.spec().clone() })
                    .collect(),
                destination: v.destination(),
            })
            .collect();

        Self { time, available_parcels, vehicles }
    }

    /// Simulated time at capture.
    #[inline]
    pub fn time(&self) -> u64 {
        self.time
    }

    pub fn available_parcels(&self) -> &[ParcelView] {
        &self.available_parcels
    }

    pub fn vehicles(&self) -> &[VehicleSnapshot] {
        &self.vehicles
    }

    #[inline]
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }
}
