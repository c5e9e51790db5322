//! The single-threaded tick loop.

use std::thread;
use std::time::{Duration, Instant};

use rt_core::{SimClock, TimeLapse};
use tracing::{debug, trace};

use crate::{ClockError, ClockMode, ClockResult, DispatchConfig, RealtimeClock, TickListener};

/// Why [`TickDispatcher::run`] returned.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// The caller-supplied stop condition became true.
    Condition,
    /// `max_ticks` was reached.
    Timeout,
}

/// Outcome of a completed run.
#[derive(Clone, Debug)]
pub struct RunSummary {
    /// Ticks executed by this call.
    pub ticks:           u64,
    /// How many of those ticks were paced to the wall clock.
    pub real_time_ticks: u64,
    /// Simulated time at which the loop stopped.
    pub end_time:        u64,
    pub wall_time:       Duration,
    pub reason:          StopReason,
}

/// Drives listeners through consecutive [`TimeLapse`]s.
///
/// Create with [`TickDispatcher::new`], hand [`clock`](Self::clock) clones to
/// whoever needs to switch modes, register listeners, then [`run`](Self::run).
pub struct TickDispatcher<C> {
    config:    DispatchConfig,
    sim_clock: SimClock,
    mode:      RealtimeClock,
    listeners: Vec<Box<dyn TickListener<C>>>,
    /// Wall-clock start of the previous tick, if it ran in `RealTime` mode.
    last_paced_start: Option<Instant>,
}

impl<C> TickDispatcher<C> {
    pub fn new(config: DispatchConfig) -> ClockResult<Self> {
        if config.max_ticks == Some(0) {
            return Err(ClockError::Config("max_ticks must be at least 1".into()));
        }
        let sim_clock = SimClock::new(config.tick_length_ms)?;
        let mode = RealtimeClock::new(config.initial_mode);
        Ok(Self {
            config,
            sim_clock,
            mode,
            listeners: Vec::new(),
            last_paced_start: None,
        })
    }

    /// A handle to this dispatcher's clock mode.
    pub fn clock(&self) -> RealtimeClock {
        self.mode.clone()
    }

    /// Simulated time at the start of the next tick.
    #[inline]
    pub fn current_time(&self) -> u64 {
        self.sim_clock.current_time()
    }

    /// Add a listener.  Listeners are called in registration order.
    pub fn register<L: TickListener<C> + 'static>(&mut self, listener: L) {
        self.listeners.push(Box::new(listener));
    }

    /// Run until `stop` returns `true` or `max_ticks` ticks have executed.
    ///
    /// `stop` is evaluated before each tick with the lapse that is about to
    /// run.  The first listener error aborts the run.
    pub fn run<F>(&mut self, ctx: &mut C, mut stop: F) -> ClockResult<RunSummary>
    where
        F: FnMut(&C, &TimeLapse) -> bool,
    {
        let wall_start = Instant::now();
        let mut ticks = 0;
        let mut real_time_ticks = 0;

        let reason = loop {
            let lapse = self.sim_clock.time_lapse();
            if stop(ctx, &lapse) {
                break StopReason::Condition;
            }
            if self.config.max_ticks.is_some_and(|max| ticks >= max) {
                break StopReason::Timeout;
            }
            if self.step(&lapse, ctx)? == ClockMode::RealTime {
                real_time_ticks += 1;
            }
            ticks += 1;
        };

        let summary = RunSummary {
            ticks,
            real_time_ticks,
            end_time: self.sim_clock.current_time(),
            wall_time: wall_start.elapsed(),
            reason,
        };
        debug!(
            ticks,
            real_time_ticks,
            end_time = summary.end_time,
            reason = ?reason,
            "dispatcher stopped"
        );
        Ok(summary)
    }

    /// Run exactly `n` ticks, ignoring `max_ticks`.
    pub fn run_ticks(&mut self, n: u64, ctx: &mut C) -> ClockResult<()> {
        for _ in 0..n {
            let lapse = self.sim_clock.time_lapse();
            self.step(&lapse, ctx)?;
        }
        Ok(())
    }

    // ── Internals ────────────────────────────────────────────────────────────

    /// Pace, notify listeners, advance.  Returns the mode the tick ran in.
    fn step(&mut self, lapse: &TimeLapse, ctx: &mut C) -> ClockResult<ClockMode> {
        let mode = self.mode.current_mode();
        self.pace(mode);
        trace!(%lapse, %mode, "tick");

        for l in &mut self.listeners {
            l.before_tick(lapse, ctx)
                .map_err(|source| ClockError::Listener { tick: lapse.tick, source })?;
        }
        for l in &mut self.listeners {
            l.after_tick(lapse, ctx)
                .map_err(|source| ClockError::Listener { tick: lapse.tick, source })?;
        }

        self.sim_clock.advance();
        Ok(mode)
    }

    /// In `RealTime` mode, sleep out the remainder of the previous paced
    /// tick's wall-clock interval.  The first paced tick after a switch
    /// starts immediately.
    fn pace(&mut self, mode: ClockMode) {
        if mode == ClockMode::Simulated {
            self.last_paced_start = None;
            return;
        }
        if let Some(prev) = self.last_paced_start {
            let target = Duration::from_millis(self.config.tick_length_ms);
            let elapsed = prev.elapsed();
            if elapsed < target {
                thread::sleep(target - elapsed);
            }
        }
        self.last_paced_start = Some(Instant::now());
    }
}
