//! A vehicle that follows the routes published by the central solver.

use rt_clock::{ListenerResult, TickListener};
use rt_core::{ParcelId, Point, TimeLapse, VehicleId};
use rt_pdp::{ParcelState, PdpResult, World};
use rt_solver::ScheduleReader;
use tracing::trace;

use crate::consistency::prune_route;
use crate::{CentralState, ConsistencyChecker};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum StopKind {
    Pickup,
    Delivery,
}

/// A pickup or delivery in progress.
#[derive(Copy, Clone, Debug)]
struct Service {
    parcel:  ParcelId,
    kind:    StopKind,
    ends_at: u64,
}

/// Drives along its committed route in the plane at constant speed.
///
/// - A newer schedule version is adopted only between services, and only
///   after the [`ConsistencyChecker`] accepts this vehicle's entry.  A
///   rejected entry leaves the current route in place, minus stops that can
///   no longer be served.
/// - The first occurrence of a parcel not aboard is its pickup stop; a
///   parcel aboard is a delivery stop.  Stops for parcels claimed elsewhere
///   are skipped.
/// - A pickup waits for the parcel's pickup window to open.
/// - With an empty route the vehicle waits where it is, and returns to the
///   depot once the scenario has no announcements left.
///
/// The committed route is written to [`World`] for inspection.
pub struct RouteFollowingVehicle {
    id:              VehicleId,
    reader:          ScheduleReader,
    checker:         ConsistencyChecker,
    adopted_version: u64,
    service:         Option<Service>,
}

impl RouteFollowingVehicle {
    pub fn new(id: VehicleId, reader: ScheduleReader, checker: ConsistencyChecker) -> Self {
        Self { id, reader, checker, adopted_version: 0, service: None }
    }

    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    /// Version of the last schedule this vehicle considered.
    #[inline]
    pub fn adopted_version(&self) -> u64 {
        self.adopted_version
    }

    fn adopt_schedule(&mut self, world: &mut World) -> PdpResult<()> {
        if self.service.is_some() {
            return Ok(());
        }
        let Some((version, schedule)) = self.reader.latest() else {
            return Ok(());
        };
        if version <= self.adopted_version {
            return Ok(());
        }
        self.adopted_version = version;

        let entry = schedule.entry(self.id);
        let route = match self.checker.check(world, self.id, entry, version) {
            Ok(()) => entry.unwrap_or_default().to_vec(),
            Err(_) => prune_route(world, self.id, world.vehicle(self.id)?.route()),
        };
        trace!(vehicle = %self.id, version, stops = route.len(), "route committed");
        world.set_route(self.id, route)
    }

    /// Spend the lapse travelling and serving stops.
    fn drive(&mut self, lapse: &TimeLapse, world: &mut World, may_return: bool) -> PdpResult<()> {
        let mut t = lapse.start;
        loop {
            if let Some(svc) = self.service {
                if svc.ends_at > lapse.end {
                    return Ok(());
                }
                t = t.max(svc.ends_at);
                match svc.kind {
                    StopKind::Pickup => world.finish_pickup(self.id, svc.parcel, t)?,
                    StopKind::Delivery => world.finish_delivery(self.id, svc.parcel, t)?,
                }
                self.service = None;
                self.pop_stop(world, svc.parcel)?;
                self.adopt_schedule(world)?;
                continue;
            }
            if t >= lapse.end {
                return Ok(());
            }

            let vehicle = world.vehicle(self.id)?;
            let Some(&next) = vehicle.route().first() else {
                world.set_destination(self.id, None)?;
                if may_return {
                    let depot = world.depot();
                    self.travel_towards(world, depot, &mut t, lapse.end)?;
                }
                return Ok(());
            };
            let carrying = vehicle.carries(next);
            let parcel = world.parcel(next)?;
            let state = parcel.state();
            let spec = parcel.spec().clone();

            let (kind, target) = if carrying {
                (StopKind::Delivery, spec.delivery_location)
            } else if state.is_unassigned() {
                (StopKind::Pickup, spec.pickup_location)
            } else {
                // Claimed by someone else or already delivered.
                self.pop_stop(world, next)?;
                continue;
            };

            world.set_destination(self.id, Some(next))?;
            if !self.travel_towards(world, target, &mut t, lapse.end)? {
                return Ok(());
            }

            let ends_at = match kind {
                StopKind::Pickup => {
                    if state != ParcelState::Available {
                        // Window not open yet; wait on site.
                        return Ok(());
                    }
                    world.start_pickup(self.id, next, t)?;
                    t + spec.pickup_duration
                }
                StopKind::Delivery => {
                    world.start_delivery(self.id, next, t)?;
                    t + spec.delivery_duration
                }
            };
            self.service = Some(Service { parcel: next, kind, ends_at });
        }
    }

    /// Move towards `target` for at most `end - *t` ms.  Advances `*t` by the
    /// time spent and returns whether the vehicle is at `target`.
    fn travel_towards(&self, world: &mut World, target: Point, t: &mut u64, end: u64) -> PdpResult<bool> {
        let vehicle = world.vehicle(self.id)?;
        let from = vehicle.position();
        if from.same_location(target) {
            return Ok(true);
        }
        let speed = vehicle.spec().speed;
        if *t >= end || speed <= 0.0 {
            return Ok(false);
        }

        let reach = vehicle.spec().distance_in(end - *t);
        let (to, travelled) = from.step_towards(target, reach);
        world.move_vehicle(self.id, to)?;

        let spent = (travelled / speed * 3_600_000.0).ceil() as u64;
        *t = (*t + spent).min(end);
        Ok(to.same_location(target))
    }

    /// Remove the first occurrence of `parcel` from the committed route.
    fn pop_stop(&self, world: &mut World, parcel: ParcelId) -> PdpResult<()> {
        let mut route = world.vehicle(self.id)?.route().to_vec();
        if let Some(i) = route.iter().position(|&p| p == parcel) {
            route.remove(i);
        }
        world.set_route(self.id, route)
    }
}

impl TickListener<CentralState> for RouteFollowingVehicle {
    fn before_tick(&mut self, lapse: &TimeLapse, state: &mut CentralState) -> ListenerResult {
        let may_return = state.pending_announcements == 0;
        self.adopt_schedule(&mut state.world)?;
        self.drive(lapse, &mut state.world, may_return)?;
        Ok(())
    }
}
