//! Vehicle description and ground-truth record.

use rt_core::{ParcelId, Point, VehicleId};

/// Static vehicle parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleSpec {
    pub start_position: Point,
    /// Distance units per simulated hour.
    pub speed:          f64,
}

impl VehicleSpec {
    pub fn new(start_position: Point, speed: f64) -> Self {
        Self { start_position, speed }
    }

    /// Distance covered in `ms` simulated milliseconds.
    #[inline]
    pub fn distance_in(&self, ms: u64) -> f64 {
        self.speed * ms as f64 / 3_600_000.0
    }
}

impl Default for VehicleSpec {
    fn default() -> Self {
        Self { start_position: Point::default(), speed: 50.0 }
    }
}

/// A vehicle as stored in [`World`][crate::World].
///
/// `route` is the vehicle's *committed* route: the stops it is actually
/// following, which may lag behind or deliberately differ from the latest
/// published schedule.  A parcel listed while not in `contents` is a pickup
/// stop; a parcel listed while in `contents` is a delivery stop.
#[derive(Clone, Debug)]
pub struct VehicleRecord {
    pub(crate) id:       VehicleId,
    pub(crate) spec:     VehicleSpec,
    pub(crate) position: Point,
    pub(crate) contents: Vec<ParcelId>,
    pub(crate) route:    Vec<ParcelId>,
    pub(crate) destination: Option<ParcelId>,
}

impl VehicleRecord {
    #[inline]
    pub fn id(&self) -> VehicleId {
        self.id
    }

    #[inline]
    pub fn spec(&self) -> &VehicleSpec {
        &self.spec
    }

    #[inline]
    pub fn position(&self) -> Point {
        self.position
    }

    /// Parcels currently aboard, in loading order.
    #[inline]
    pub fn contents(&self) -> &[ParcelId] {
        &self.contents
    }

    #[inline]
    pub fn route(&self) -> &[ParcelId] {
        &self.route
    }

    /// The stop the vehicle is currently driving to or serving, if any.
    #[inline]
    pub fn destination(&self) -> Option<ParcelId> {
        self.destination
    }

    #[inline]
    pub fn carries(&self, parcel: ParcelId) -> bool {
        self.contents.contains(&parcel)
    }
}
