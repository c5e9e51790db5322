//! Parcel description and lifecycle state.

use std::fmt;

use rt_core::{ParcelId, Point, TimeWindow, VehicleId};

use crate::{PdpError, PdpResult};

// ── ParcelSpec ────────────────────────────────────────────────────────────────

/// Static description of a transport request.  Never changes after creation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ParcelSpec {
    pub pickup_location:      Point,
    pub delivery_location:    Point,
    pub pickup_time_window:   TimeWindow,
    pub delivery_time_window: TimeWindow,
    /// Simulated milliseconds spent loading at the pickup location.
    pub pickup_duration:      u64,
    /// Simulated milliseconds spent unloading at the delivery location.
    pub delivery_duration:    u64,
    /// Simulated time at which the parcel becomes known to the system.
    pub announce_time:        u64,
}

impl ParcelSpec {
    /// Start building a parcel travelling from `from` to `to`.
    pub fn builder(from: Point, to: Point) -> ParcelBuilder {
        ParcelBuilder::new(from, to)
    }
}

/// Fluent builder for [`ParcelSpec`].
///
/// | Method                     | Default               |
/// |----------------------------|-----------------------|
/// | `.announce_time(t)`        | `0`                   |
/// | `.pickup_time_window(tw)`  | `TimeWindow::ALWAYS`  |
/// | `.delivery_time_window(tw)`| `TimeWindow::ALWAYS`  |
/// | `.service_duration(d)`     | `0` (both stops)      |
#[derive(Clone, Debug)]
pub struct ParcelBuilder {
    spec: ParcelSpec,
}

impl ParcelBuilder {
    pub fn new(from: Point, to: Point) -> Self {
        Self {
            spec: ParcelSpec {
                pickup_location:      from,
                delivery_location:    to,
                pickup_time_window:   TimeWindow::ALWAYS,
                delivery_time_window: TimeWindow::ALWAYS,
                pickup_duration:      0,
                delivery_duration:    0,
                announce_time:        0,
            },
        }
    }

    pub fn announce_time(mut self, t: u64) -> Self {
        self.spec.announce_time = t;
        self
    }

    pub fn pickup_time_window(mut self, tw: TimeWindow) -> Self {
        self.spec.pickup_time_window = tw;
        self
    }

    pub fn delivery_time_window(mut self, tw: TimeWindow) -> Self {
        self.spec.delivery_time_window = tw;
        self
    }

    /// Set both the pickup and the delivery duration.
    pub fn service_duration(mut self, d: u64) -> Self {
        self.spec.pickup_duration = d;
        self.spec.delivery_duration = d;
        self
    }

    pub fn pickup_duration(mut self, d: u64) -> Self {
        self.spec.pickup_duration = d;
        self
    }

    pub fn delivery_duration(mut self, d: u64) -> Self {
        self.spec.delivery_duration = d;
        self
    }

    /// Validate and return the spec.
    ///
    /// A parcel announced after its pickup window has closed can never be
    /// served and is rejected.
    pub fn build(self) -> PdpResult<ParcelSpec> {
        let tw = self.spec.pickup_time_window;
        if self.spec.announce_time > tw.end {
            return Err(PdpError::Core(rt_core::CoreError::Config(format!(
                "announce time {} is after the pickup window end {}",
                self.spec.announce_time, tw.end
            ))));
        }
        Ok(self.spec)
    }
}

// ── ParcelState ───────────────────────────────────────────────────────────────

/// Lifecycle of a parcel in ground truth.
///
/// ```text
/// Announced ──(pickup window opens)──▶ Available ──(pickup starts)──▶ InCargo(v) ──▶ Delivered
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ParcelState {
    /// Known to the system, pickup window not yet open.
    Announced,
    /// Pickup window open, not claimed by any vehicle.
    Available,
    /// Loaded into (or being loaded into) the given vehicle.
    InCargo(VehicleId),
    /// Unloaded at its destination.
    Delivered,
}

impl ParcelState {
    /// `true` while no vehicle has claimed the parcel.
    #[inline]
    pub fn is_unassigned(self) -> bool {
        matches!(self, ParcelState::Announced | ParcelState::Available)
    }
}

impl fmt::Display for ParcelState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParcelState::Announced  => f.write_str("announced"),
            ParcelState::Available  => f.write_str("available"),
            ParcelState::InCargo(v) => write!(f, "in cargo of {v}"),
            ParcelState::Delivered  => f.write_str("delivered"),
        }
    }
}

// ── ParcelRecord ──────────────────────────────────────────────────────────────

/// A parcel as stored in [`World`][crate::World].
#[derive(Clone, Debug)]
pub struct ParcelRecord {
    pub(crate) id:    ParcelId,
    pub(crate) spec:  ParcelSpec,
    pub(crate) state: ParcelState,
}

impl ParcelRecord {
    #[inline]
    pub fn id(&self) -> ParcelId {
        self.id
    }

    #[inline]
    pub fn spec(&self) -> &ParcelSpec {
        &self.spec
    }

    #[inline]
    pub fn state(&self) -> ParcelState {
        self.state
    }
}
