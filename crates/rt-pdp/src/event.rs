//! Append-only log of pickup and delivery activity.

use std::fmt;

use rt_core::{ParcelId, VehicleId};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PdpEventKind {
    NewParcel,
    StartPickup,
    EndPickup,
    StartDelivery,
    EndDelivery,
}

impl fmt::Display for PdpEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PdpEventKind::NewParcel     => "new_parcel",
            PdpEventKind::StartPickup   => "start_pickup",
            PdpEventKind::EndPickup     => "end_pickup",
            PdpEventKind::StartDelivery => "start_delivery",
            PdpEventKind::EndDelivery   => "end_delivery",
        })
    }
}

/// One entry of the log.  `vehicle` is `None` only for `NewParcel`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PdpEvent {
    pub kind:    PdpEventKind,
    pub time:    u64,
    pub parcel:  ParcelId,
    pub vehicle: Option<VehicleId>,
}
