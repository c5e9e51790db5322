//! Simulation time model.
//!
//! # Design
//!
//! Simulated time is an integer number of milliseconds since the start of the
//! run.  The simulation advances in fixed steps of `tick_length_ms`; step `n`
//! covers the half-open interval
//!
//!   [n * tick_length_ms, (n + 1) * tick_length_ms)
//!
//! which is handed to every tick listener as a [`TimeLapse`].  Using an
//! integer tick as the canonical counter keeps interval arithmetic exact.

use std::fmt;

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// An absolute simulation step counter.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tick(pub u64);

impl Tick {
    pub const ZERO: Tick = Tick(0);

    /// Return the tick `n` steps after `self`.
    #[inline]
    pub fn offset(self, n: u64) -> Tick {
        Tick(self.0 + n)
    }
}

impl std::ops::Add<u64> for Tick {
    type Output = Tick;
    #[inline]
    fn add(self, rhs: u64) -> Tick {
        Tick(self.0 + rhs)
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ── TimeLapse ─────────────────────────────────────────────────────────────────

/// The half-open interval `[start, end)` of simulated milliseconds covered by
/// one tick.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeLapse {
    pub tick:  Tick,
    pub start: u64,
    pub end:   u64,
}

impl TimeLapse {
    #[inline]
    pub fn new(tick: Tick, start: u64, end: u64) -> Self {
        debug_assert!(start <= end, "time lapse must not run backwards");
        Self { tick, start, end }
    }

    /// Length of the interval in milliseconds.
    #[inline]
    pub fn duration(&self) -> u64 {
        self.end - self.start
    }

    /// `true` if `t` falls inside `[start, end)`.
    #[inline]
    pub fn contains(&self, t: u64) -> bool {
        self.start <= t && t < self.end
    }
}

impl fmt::Display for TimeLapse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}, {})", self.tick, self.start, self.end)
    }
}

// ── TimeWindow ────────────────────────────────────────────────────────────────

/// A service time window `[begin, end)` in simulated milliseconds.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeWindow {
    pub begin: u64,
    pub end:   u64,
}

impl TimeWindow {
    /// A window that is always open.
    pub const ALWAYS: TimeWindow = TimeWindow { begin: 0, end: u64::MAX };

    /// Build a window, rejecting `begin > end`.
    pub fn new(begin: u64, end: u64) -> CoreResult<Self> {
        if begin > end {
            return Err(CoreError::InvalidTimeWindow { begin, end });
        }
        Ok(Self { begin, end })
    }

    /// `true` if `t` is inside `[begin, end)`.
    #[inline]
    pub fn is_in(&self, t: u64) -> bool {
        self.begin <= t && t < self.end
    }

    /// `true` once the window has opened.
    #[inline]
    pub fn has_begun(&self, t: u64) -> bool {
        t >= self.begin
    }
}

impl Default for TimeWindow {
    fn default() -> Self {
        Self::ALWAYS
    }
}

// ── SimClock ──────────────────────────────────────────────────────────────────

/// Tracks the current tick and maps it to a [`TimeLapse`].
///
/// `SimClock` is cheap to copy and intentionally holds no heap data.  Pacing
/// against the wall clock is not its concern; see `rt-clock`.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimClock {
    /// Simulated milliseconds per tick.
    pub tick_length_ms: u64,
    /// The current tick, advanced by `SimClock::advance()` each iteration.
    pub current_tick: Tick,
}

impl SimClock {
    /// Create a clock at tick 0.  `tick_length_ms` must be non-zero.
    pub fn new(tick_length_ms: u64) -> CoreResult<Self> {
        if tick_length_ms == 0 {
            return Err(CoreError::Config("tick length must be at least 1 ms".into()));
        }
        Ok(Self { tick_length_ms, current_tick: Tick::ZERO })
    }

    /// Advance the clock by one tick.
    #[inline]
    pub fn advance(&mut self) {
        self.current_tick = self.current_tick + 1;
    }

    /// Simulated time at the start of the current tick.
    #[inline]
    pub fn current_time(&self) -> u64 {
        self.current_tick.0 * self.tick_length_ms
    }

    /// The interval covered by the current tick.
    #[inline]
    pub fn time_lapse(&self) -> TimeLapse {
        let start = self.current_time();
        TimeLapse::new(self.current_tick, start, start + self.tick_length_ms)
    }
}

impl fmt::Display for SimClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} ms)", self.current_tick, self.current_time())
    }
}
