//! Ground truth for parcels and vehicles.
//!
//! `World` is the single mutable source of truth.  It lives on the simulation
//! thread (inside the tick context) and every parcel state change goes
//! through one of the `start_*` / `finish_*` methods below, each of which
//! validates the transition and appends a [`PdpEvent`].

use rt_core::{ParcelId, Point, VehicleId};
use tracing::debug;

use crate::{
    PdpError, PdpEvent, PdpEventKind, PdpResult, ParcelRecord, ParcelSpec, ParcelState,
    VehicleRecord, VehicleSpec,
};

#[derive(Clone, Debug)]
pub struct World {
    depot:    Point,
    /// Indexed by `ParcelId`.
    parcels:  Vec<ParcelRecord>,
    /// Indexed by `VehicleId`.
    vehicles: Vec<VehicleRecord>,
    events:   Vec<PdpEvent>,
}

impl World {
    pub fn new(depot: Point) -> Self {
        Self { depot, parcels: Vec::new(), vehicles: Vec::new(), events: Vec::new() }
    }

    // ── Registration ─────────────────────────────────────────────────────────

    /// Add a vehicle at its start position.  Ids are dense, in insertion order.
    pub fn add_vehicle(&mut self, spec: VehicleSpec) -> VehicleId {
        let id = VehicleId(self.vehicles.len() as u32);
        self.vehicles.push(VehicleRecord {
            id,
            position: spec.start_position,
            spec,
            contents: Vec::new(),
            route: Vec::new(),
            destination: None,
        });
        id
    }

    /// Make a parcel known to the system at simulated time `time`.
    ///
    /// The parcel starts `Announced`, or directly `Available` when its pickup
    /// window has already opened.
    pub fn announce(&mut self, spec: ParcelSpec, time: u64) -> ParcelId {
        let id = ParcelId(self.parcels.len() as u32);
        let state = if spec.pickup_time_window.has_begun(time) {
            ParcelState::Available
        } else {
            ParcelState::Announced
        };
        self.parcels.push(ParcelRecord { id, spec, state });
        self.log(PdpEventKind::NewParcel, time, id, None);
        id
    }

    /// Promote every `Announced` parcel whose pickup window has opened by
    /// `time`.  Returns the number of parcels promoted.
    pub fn refresh_availability(&mut self, time: u64) -> usize {
        let mut promoted = 0;
        for p in &mut self.parcels {
            if p.state == ParcelState::Announced && p.spec.pickup_time_window.has_begun(time) {
                p.state = ParcelState::Available;
                promoted += 1;
            }
        }
        promoted
    }

    // ── Accessors ────────────────────────────────────────────────────────────

    #[inline]
    pub fn depot(&self) -> Point {
        self.depot
    }

    pub fn parcel(&self, id: ParcelId) -> PdpResult<&ParcelRecord> {
        self.parcels.get(id.index()).ok_or(PdpError::UnknownParcel(id))
    }

    pub fn vehicle(&self, id: VehicleId) -> PdpResult<&VehicleRecord> {
        self.vehicles.get(id.index()).ok_or(PdpError::UnknownVehicle(id))
    }

    fn vehicle_mut(&mut self, id: VehicleId) -> PdpResult<&mut VehicleRecord> {
        self.vehicles.get_mut(id.index()).ok_or(PdpError::UnknownVehicle(id))
    }

    fn parcel_mut(&mut self, id: ParcelId) -> PdpResult<&mut ParcelRecord> {
        self.parcels.get_mut(id.index()).ok_or(PdpError::UnknownParcel(id))
    }

    pub fn parcels(&self) -> &[ParcelRecord] {
        &self.parcels
    }

    pub fn vehicles(&self) -> &[VehicleRecord] {
        &self.vehicles
    }

    #[inline]
    pub fn parcel_count(&self) -> usize {
        self.parcels.len()
    }

    #[inline]
    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Every pickup/delivery event so far, in the order it happened.
    pub fn events(&self) -> &[PdpEvent] {
        &self.events
    }

    /// `true` once every announced parcel is `Delivered`.
    pub fn all_delivered(&self) -> bool {
        self.parcels.iter().all(|p| p.state == ParcelState::Delivered)
    }

    /// `true` when every vehicle is empty and parked at the depot.
    pub fn all_vehicles_at_depot(&self) -> bool {
        self.vehicles
            .iter()
            .all(|v| v.contents.is_empty() && v.position.same_location(self.depot))
    }

    // ── Vehicle-side mutation ────────────────────────────────────────────────

    /// Replace the committed route of `vehicle`.
    pub fn set_route(&mut self, vehicle: VehicleId, route: Vec<ParcelId>) -> PdpResult<()> {
        self.vehicle_mut(vehicle)?.route = route;
        Ok(())
    }

    pub fn set_destination(&mut self, vehicle: VehicleId, dest: Option<ParcelId>) -> PdpResult<()> {
        self.vehicle_mut(vehicle)?.destination = dest;
        Ok(())
    }

    pub fn move_vehicle(&mut self, vehicle: VehicleId, to: Point) -> PdpResult<()> {
        self.vehicle_mut(vehicle)?.position = to;
        Ok(())
    }

    /// Begin loading `parcel` into `vehicle`.
    ///
    /// The parcel must be `Available` and the vehicle must stand at its
    /// pickup location.  The parcel is claimed (`InCargo`) immediately, so no
    /// other vehicle can start on it while loading is in progress.
    pub fn start_pickup(&mut self, vehicle: VehicleId, parcel: ParcelId, time: u64) -> PdpResult<()> {
        let at = self.vehicle(vehicle)?.position;
        let rec = self.parcel(parcel)?;
        if rec.state != ParcelState::Available {
            return Err(PdpError::IllegalTransition {
                parcel,
                vehicle,
                action: "picked up",
                state: rec.state,
            });
        }
        if !at.same_location(rec.spec.pickup_location) {
            return Err(PdpError::NotAtLocation { vehicle, parcel, what: "pickup" });
        }
        self.parcel_mut(parcel)?.state = ParcelState::InCargo(vehicle);
        self.vehicle_mut(vehicle)?.contents.push(parcel);
        self.log(PdpEventKind::StartPickup, time, parcel, Some(vehicle));
        Ok(())
    }

    pub fn finish_pickup(&mut self, vehicle: VehicleId, parcel: ParcelId, time: u64) -> PdpResult<()> {
        self.expect_in_cargo(vehicle, parcel, "loaded")?;
        self.log(PdpEventKind::EndPickup, time, parcel, Some(vehicle));
        Ok(())
    }

    /// Begin unloading `parcel` at its delivery location.
    pub fn start_delivery(&mut self, vehicle: VehicleId, parcel: ParcelId, time: u64) -> PdpResult<()> {
        self.expect_in_cargo(vehicle, parcel, "delivered")?;
        let at = self.vehicle(vehicle)?.position;
        if !at.same_location(self.parcel(parcel)?.spec.delivery_location) {
            return Err(PdpError::NotAtLocation { vehicle, parcel, what: "delivery" });
        }
        self.log(PdpEventKind::StartDelivery, time, parcel, Some(vehicle));
        Ok(())
    }

    pub fn finish_delivery(&mut self, vehicle: VehicleId, parcel: ParcelId, time: u64) -> PdpResult<()> {
        self.expect_in_cargo(vehicle, parcel, "delivered")?;
        self.parcel_mut(parcel)?.state = ParcelState::Delivered;
        self.vehicle_mut(vehicle)?.contents.retain(|&p| p != parcel);
        self.log(PdpEventKind::EndDelivery, time, parcel, Some(vehicle));
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────────────

    fn expect_in_cargo(&self, vehicle: VehicleId, parcel: ParcelId, action: &'static str) -> PdpResult<()> {
        let state = self.parcel(parcel)?.state;
        if state != ParcelState::InCargo(vehicle) {
            return Err(PdpError::IllegalTransition { parcel, vehicle, action, state });
        }
        Ok(())
    }

    fn log(&mut self, kind: PdpEventKind, time: u64, parcel: ParcelId, vehicle: Option<VehicleId>) {
        debug!(%kind, time, parcel = %parcel, vehicle = ?vehicle, "pdp event");
        self.events.push(PdpEvent { kind, time, parcel, vehicle });
    }
}
