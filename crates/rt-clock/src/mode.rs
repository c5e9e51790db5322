//! The SIMULATED / REAL_TIME state machine.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, AtomicU64, Ordering};

use tracing::debug;

/// Pacing mode of the tick loop.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ClockMode {
    /// Ticks run back to back.
    #[default]
    Simulated,
    /// Ticks are paced to the wall clock.
    RealTime,
}

impl ClockMode {
    const fn as_u8(self) -> u8 {
        match self {
            ClockMode::Simulated => 0,
            ClockMode::RealTime  => 1,
        }
    }

    const fn from_u8(v: u8) -> Self {
        if v == 1 { ClockMode::RealTime } else { ClockMode::Simulated }
    }
}

impl fmt::Display for ClockMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClockMode::Simulated => f.write_str("SIMULATED"),
            ClockMode::RealTime  => f.write_str("REAL_TIME"),
        }
    }
}

#[derive(Debug)]
struct ModeCell {
    mode:        AtomicU8,
    transitions: AtomicU64,
}

/// Shared handle to the process-wide clock mode.
///
/// Cloning is cheap; every clone controls the same mode.  Requests are
/// compare-and-swap transitions, so concurrent requesters of the same mode
/// produce exactly one transition and the rest are no-ops.
#[derive(Clone, Debug)]
pub struct RealtimeClock {
    cell: Arc<ModeCell>,
}

impl RealtimeClock {
    pub fn new(initial: ClockMode) -> Self {
        Self {
            cell: Arc::new(ModeCell {
                mode:        AtomicU8::new(initial.as_u8()),
                transitions: AtomicU64::new(0),
            }),
        }
    }

    /// Switch SIMULATED → REAL_TIME.  Returns `true` if this call changed the
    /// mode, `false` if it was already `RealTime`.
    pub fn request_real_time(&self) -> bool {
        self.transition(ClockMode::Simulated, ClockMode::RealTime)
    }

    /// Switch REAL_TIME → SIMULATED.  Returns `true` if this call changed the
    /// mode.
    pub fn request_simulated(&self) -> bool {
        self.transition(ClockMode::RealTime, ClockMode::Simulated)
    }

    #[inline]
    pub fn current_mode(&self) -> ClockMode {
        ClockMode::from_u8(self.cell.mode.load(Ordering::Acquire))
    }

    /// Number of effective mode changes since creation.
    pub fn transitions(&self) -> u64 {
        self.cell.transitions.load(Ordering::Relaxed)
    }

    fn transition(&self, from: ClockMode, to: ClockMode) -> bool {
        let changed = self
            .cell
            .mode
            .compare_exchange(from.as_u8(), to.as_u8(), Ordering::AcqRel, Ordering::Acquire)
            .is_ok();
        if changed {
            self.cell.transitions.fetch_add(1, Ordering::Relaxed);
            debug!(%from, %to, "clock mode changed");
        }
        changed
    }
}

impl Default for RealtimeClock {
    fn default() -> Self {
        Self::new(ClockMode::Simulated)
    }
}
