//! Per-vehicle stop lists produced by a solver.

use rt_core::{ParcelId, VehicleId};

/// One ordered stop list per vehicle, indexed like the snapshot's vehicles.
///
/// A parcel normally appears twice in its vehicle's entry: the first
/// occurrence is the pickup stop, the second the delivery stop.  A parcel
/// already aboard appears once (delivery only).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Schedule {
    routes: Vec<Vec<ParcelId>>,
}

impl Schedule {
    pub fn new(routes: Vec<Vec<ParcelId>>) -> Self {
        Self { routes }
    }

    /// A schedule with `vehicles` empty entries.
    pub fn empty(vehicles: usize) -> Self {
        Self { routes: vec![Vec::new(); vehicles] }
    }

    /// The entry for `vehicle`, or `None` when the index is out of range.
    pub fn entry(&self, vehicle: VehicleId) -> Option<&[ParcelId]> {
        self.routes.get(vehicle.index()).map(Vec::as_slice)
    }

    /// Number of entries (vehicles).
    #[inline]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn routes(&self) -> &[Vec<ParcelId>] {
        &self.routes
    }
}

impl From<Vec<Vec<ParcelId>>> for Schedule {
    fn from(routes: Vec<Vec<ParcelId>>) -> Self {
        Self::new(routes)
    }
}
