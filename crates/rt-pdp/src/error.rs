use rt_core::{CoreError, ParcelId, VehicleId};
use thiserror::Error;

use crate::ParcelState;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PdpError {
    #[error("{0} not found")]
    UnknownParcel(ParcelId),

    #[error("{0} not found")]
    UnknownVehicle(VehicleId),

    #[error("{parcel} cannot be {action} by {vehicle}: parcel is {state}")]
    IllegalTransition {
        parcel:  ParcelId,
        vehicle: VehicleId,
        action:  &'static str,
        state:   ParcelState,
    },

    #[error("{vehicle} is not at the {what} location of {parcel}")]
    NotAtLocation {
        vehicle: VehicleId,
        parcel:  ParcelId,
        what:    &'static str,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type PdpResult<T> = Result<T, PdpError>;
