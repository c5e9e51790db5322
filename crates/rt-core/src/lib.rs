//! `rt-core`: foundational types for the `rt_central` real-time coordination
//! framework.
//!
//! This crate is a dependency of every other `rt-*` crate.  It has no `rt-*`
//! dependencies and few external ones (`rand`, `thiserror`, `parking_lot`,
//! `rustc-hash`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `ParcelId`, `VehicleId`                               |
//! | [`geo`]         | `Point` (planar), euclidean distance, stepping        |
//! | [`time`]        | `Tick`, `TimeLapse`, `TimeWindow`, `SimClock`         |
//! | [`rng`]         | `RandomModel`, single-use `RngProvider`, `SimRng`     |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use geo::Point;
pub use ids::{ParcelId, VehicleId};
pub use rng::{RandomModel, RngProvider, SharedRng, SimRng};
pub use time::{SimClock, Tick, TimeLapse, TimeWindow};
