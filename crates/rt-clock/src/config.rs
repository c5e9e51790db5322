//! Dispatcher configuration.

use crate::ClockMode;

/// Settings for a [`TickDispatcher`][crate::TickDispatcher].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DispatchConfig {
    /// Simulated milliseconds per tick, and the wall-clock interval between
    /// tick starts while in `RealTime` mode.
    pub tick_length_ms: u64,
    pub initial_mode:   ClockMode,
    /// Hard timeout: the run ends after this many ticks regardless of the
    /// stop condition.
    pub max_ticks:      Option<u64>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            tick_length_ms: 1_000,
            initial_mode:   ClockMode::Simulated,
            max_ticks:      None,
        }
    }
}
