//! `rt-clock`: clock-mode state machine and tick dispatcher.
//!
//! # Two clock modes
//!
//! ```text
//!             request_real_time()
//!   SIMULATED ───────────────────▶ REAL_TIME
//!       ▲                              │
//!       └──────────────────────────────┘
//!             request_simulated()
//! ```
//!
//! In `Simulated` mode the [`TickDispatcher`] runs ticks back to back as fast
//! as the listeners allow.  In `RealTime` mode it sleeps so that consecutive
//! ticks start one `tick_length_ms` of wall time apart.  The mode is read at
//! the start of every tick, so a change made from any thread takes effect no
//! later than the next tick.
//!
//! # Tick order
//!
//! ```text
//! loop:
//!   lapse = [t, t + tick_length)
//!   stop?            → return RunSummary
//!   mode == RealTime → sleep until the next wall-clock boundary
//!   for l in listeners: l.before_tick(lapse, ctx)
//!   for l in listeners: l.after_tick(lapse, ctx)
//!   t += tick_length
//! ```

pub mod config;
pub mod dispatcher;
pub mod error;
pub mod listener;
pub mod mode;

#[cfg(test)]
mod tests;

pub use config::DispatchConfig;
pub use dispatcher::{RunSummary, StopReason, TickDispatcher};
pub use error::{BoxError, ClockError, ClockResult, ListenerResult};
pub use listener::TickListener;
pub use mode::{ClockMode, RealtimeClock};
