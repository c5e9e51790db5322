//! `rt-pdp`: pickup-and-delivery state as seen by the coordination core.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                     |
//! |---------------|--------------------------------------------------------------|
//! | [`parcel`]    | `ParcelSpec` + builder, `ParcelState`, `ParcelRecord`        |
//! | [`vehicle`]   | `VehicleSpec`, `VehicleRecord` (position, cargo, route)      |
//! | [`event`]     | `PdpEvent`, `PdpEventKind`: append-only pickup/delivery log |
//! | [`world`]     | `World`: the ground truth, owned by the simulation thread   |
//! | [`snapshot`]  | `Snapshot`, `VehicleSnapshot`: immutable copies for solvers |
//! | [`schedule`]  | `Schedule`: one ordered stop list per vehicle               |
//! | [`error`]     | `PdpError`, `PdpResult<T>`                                   |
//!
//! # Ownership
//!
//! `World` is only ever touched from the simulation thread.  Solvers never
//! see it: they receive a [`Snapshot`], a deep copy that is `Send` and has no
//! mutating API.  Parcel state changes happen exclusively through the
//! `World::start_*` / `World::finish_*` operations driven by vehicles.

pub mod error;
pub mod event;
pub mod parcel;
pub mod schedule;
pub mod snapshot;
pub mod vehicle;
pub mod world;


pub use error::{PdpError, PdpResult};
pub use event::{PdpEvent, PdpEventKind};
pub use parcel::{ParcelBuilder, ParcelRecord, ParcelSpec, ParcelState};
pub use schedule::Schedule;
pub use snapshot::{ParcelView, Snapshot, VehicleSnapshot};
pub use vehicle::{VehicleRecord, VehicleSpec};
pub use world::World;
