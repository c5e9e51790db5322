//! Run configuration, loadable from TOML.
//!
//! ```toml
//! tick_length_ms = 100
//! initial_mode   = "simulated"
//! seed           = 123
//! time_out_ms    = 1800000
//! ```
//!
//! Every key is optional; missing keys take their [`Default`] value.

use std::path::Path;

use rt_clock::{ClockMode, DispatchConfig};
use rt_core::rng::DEFAULT_SEED;
use serde::{Deserialize, Serialize};

use crate::{CentralError, CentralResult};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CentralConfig {
    /// Simulated milliseconds per tick; also the wall-clock tick interval in
    /// real-time mode.
    pub tick_length_ms: u64,
    pub initial_mode:   ClockMode,
    /// Master seed of the run's random model.
    pub seed:           u64,
    /// Simulated time at which the run is stopped regardless of progress.
    pub time_out_ms:    u64,
}

impl Default for CentralConfig {
    fn default() -> Self {
        Self {
            tick_length_ms: 1_000,
            initial_mode:   ClockMode::Simulated,
            seed:           DEFAULT_SEED,
            time_out_ms:    8 * 60 * 60 * 1_000,
        }
    }
}

impl CentralConfig {
    pub fn from_toml_str(s: &str) -> CentralResult<Self> {
        let config: CentralConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> CentralResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn to_toml_string(&self) -> CentralResult<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> CentralResult<()> {
        if self.tick_length_ms == 0 {
            return Err(CentralError::Config("tick_length_ms must be at least 1".into()));
        }
        if self.time_out_ms == 0 {
            return Err(CentralError::Config("time_out_ms must be at least 1".into()));
        }
        Ok(())
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        DispatchConfig {
            tick_length_ms: self.tick_length_ms,
            initial_mode:   self.initial_mode,
            max_ticks:      None,
        }
    }
}
