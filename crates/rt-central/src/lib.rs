//! `rt-central`: one solver planning for every vehicle, in real time.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`consistency`] | `ConsistencyChecker`, `Inconsistency`                         |
//! | [`vehicle`]     | `RouteFollowingVehicle`: checked schedule consumer           |
//! | [`central`]     | `RtCentral`: snapshots the world and dispatches to the solver |
//! | [`scenario`]    | `Scenario`, `ScenarioDriver`: timed parcel announcements     |
//! | [`stop`]        | `StopCondition`                                               |
//! | [`config`]      | `CentralConfig` (TOML)                                        |
//! | [`builder`]     | `CentralBuilder`                                              |
//! | [`sim`]         | `CentralSim`, `CentralState`, `RunReport`                     |
//! | [`error`]       | `CentralError`, `CentralResult<T>`                            |
//!
//! # Listener order per tick
//!
//! ```text
//! before_tick:  ScenarioDriver   announce due parcels, open pickup windows
//!               RtCentral        surface solver faults; new parcels → dispatch,
//!                                wait up to one tick for the solver
//!               vehicles         adopt newer schedule (checked), drive, serve
//! after_tick:   RtCentral        repair requested → dispatch snapshot
//! ```
//!
//! # Quick-start
//!
//! ```rust,ignore
//! let scenario = Scenario::new(Point::new(5.0, 5.0))
//!     .vehicle(VehicleSpec::new(Point::new(0.0, 0.0), 50.0))
//!     .parcel(ParcelSpec::builder(a, b).announce_time(200).build()?);
//! let mut sim = CentralBuilder::new(scenario, RandomSolver::supplier())
//!     .config(CentralConfig::from_file("central.toml")?)
//!     .build()?;
//! let report = sim.run()?;
//! ```

pub mod builder;
pub mod central;
pub mod config;
pub mod consistency;
pub mod error;
pub mod scenario;
pub mod sim;
pub mod stop;
pub mod vehicle;


pub use builder::CentralBuilder;
pub use central::RtCentral;
pub use config::CentralConfig;
pub use consistency::{ConsistencyChecker, Inconsistency};
pub use error::{CentralError, CentralResult};
pub use scenario::{Scenario, ScenarioDriver};
pub use sim::{CentralSim, CentralState, RunReport};
pub use stop::StopCondition;
pub use vehicle::RouteFollowingVehicle;
