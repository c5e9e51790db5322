//! Tests for the clock mode and the tick dispatcher.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use rt_core::{Tick, TimeLapse};

use crate::{
    ClockError, ClockMode, DispatchConfig, ListenerResult, RealtimeClock, StopReason,
    TickDispatcher, TickListener,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn config(tick_length_ms: u64) -> DispatchConfig {
    DispatchConfig { tick_length_ms, ..DispatchConfig::default() }
}

/// Records `"<name>:<before|after>:<tick>"` into a shared log.
struct Recorder {
    name: &'static str,
    log:  Rc<RefCell<Vec<String>>>,
}

impl TickListener<u64> for Recorder {
    fn before_tick(&mut self, lapse: &TimeLapse, _ctx: &mut u64) -> ListenerResult {
        self.log.borrow_mut().push(format!("{}:before:{}", self.name, lapse.tick.0));
        Ok(())
    }

    fn after_tick(&mut self, lapse: &TimeLapse, ctx: &mut u64) -> ListenerResult {
        self.log.borrow_mut().push(format!("{}:after:{}", self.name, lapse.tick.0));
        *ctx += 1;
        Ok(())
    }
}

/// Stores every lapse it sees together with the mode it was observed in.
struct ModeRecorder {
    clock: RealtimeClock,
    seen:  Rc<RefCell<Vec<(TimeLapse, ClockMode, Instant)>>>,
}

impl<C> TickListener<C> for ModeRecorder {
    fn before_tick(&mut self, lapse: &TimeLapse, _ctx: &mut C) -> ListenerResult {
        self.seen.borrow_mut().push((*lapse, self.clock.current_mode(), Instant::now()));
        Ok(())
    }
}

// ── Clock mode ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod mode_tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;

    use super::*;

    #[test]
    fn starts_in_initial_mode() {
        assert_eq!(RealtimeClock::default().current_mode(), ClockMode::Simulated);
        assert_eq!(RealtimeClock::new(ClockMode::RealTime).current_mode(), ClockMode::RealTime);
    }

    #[test]
    fn requests_are_idempotent() {
        let clock = RealtimeClock::default();
        assert!(!clock.request_simulated());
        assert!(clock.request_real_time());
        assert!(!clock.request_real_time());
        assert_eq!(clock.current_mode(), ClockMode::RealTime);
        assert!(clock.request_simulated());
        assert!(!clock.request_simulated());
        assert_eq!(clock.transitions(), 2);
    }

    #[test]
    fn clones_share_state() {
        let a = RealtimeClock::default();
        let b = a.clone();
        a.request_real_time();
        assert_eq!(b.current_mode(), ClockMode::RealTime);
    }

    #[test]
    fn concurrent_requesters_transition_once() {
        let clock = RealtimeClock::default();
        let winners = Arc::new(AtomicUsize::new(0));
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let clock = clock.clone();
                let winners = Arc::clone(&winners);
                thread::spawn(move || {
                    if clock.request_real_time() {
                        winners.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        assert_eq!(winners.load(Ordering::SeqCst), 1);
        assert_eq!(clock.transitions(), 1);
    }

    #[test]
    fn display_names() {
        assert_eq!(ClockMode::Simulated.to_string(), "SIMULATED");
        assert_eq!(ClockMode::RealTime.to_string(), "REAL_TIME");
    }
}

// ── Dispatcher ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod dispatcher_tests {
    use super::*;

    #[test]
    fn zero_tick_length_rejected() {
        assert!(matches!(TickDispatcher::<u64>::new(config(0)), Err(ClockError::Core(_))));
    }

    #[test]
    fn zero_max_ticks_rejected() {
        let cfg = DispatchConfig { max_ticks: Some(0), ..config(10) };
        assert!(matches!(TickDispatcher::<u64>::new(cfg), Err(ClockError::Config(_))));
    }

    #[test]
    fn listeners_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut d = TickDispatcher::new(config(100)).unwrap();
        d.register(Recorder { name: "a", log: Rc::clone(&log) });
        d.register(Recorder { name: "b", log: Rc::clone(&log) });

        let mut ctx = 0u64;
        d.run_ticks(2, &mut ctx).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                "a:before:0", "b:before:0", "a:after:0", "b:after:0",
                "a:before:1", "b:before:1", "a:after:1", "b:after:1",
            ]
        );
        assert_eq!(ctx, 4);
        assert_eq!(d.current_time(), 200);
    }

    #[test]
    fn lapses_are_consecutive() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut d = TickDispatcher::new(config(250)).unwrap();
        d.register(ModeRecorder { clock: d.clock(), seen: Rc::clone(&seen) });

        let mut ctx = ();
        d.run_ticks(4, &mut ctx).unwrap();

        let seen = seen.borrow();
        for (i, (lapse, _, _)) in seen.iter().enumerate() {
            assert_eq!(*lapse, TimeLapse::new(Tick(i as u64), i as u64 * 250, (i as u64 + 1) * 250));
        }
    }

    #[test]
    fn stop_condition_ends_run() {
        let mut d = TickDispatcher::new(config(100)).unwrap();
        let mut ctx = 0u64;
        let summary = d.run(&mut ctx, |_, lapse| lapse.start >= 1_000).unwrap();
        assert_eq!(summary.reason, StopReason::Condition);
        assert_eq!(summary.ticks, 10);
        assert_eq!(summary.end_time, 1_000);
        assert_eq!(summary.real_time_ticks, 0);
    }

    #[test]
    fn max_ticks_is_a_hard_timeout() {
        let cfg = DispatchConfig { max_ticks: Some(25), ..config(100) };
        let mut d = TickDispatcher::new(cfg).unwrap();
        let mut ctx = 0u64;
        let summary = d.run(&mut ctx, |_, _| false).unwrap();
        assert_eq!(summary.reason, StopReason::Timeout);
        assert_eq!(summary.ticks, 25);
    }

    #[test]
    fn listener_error_aborts_with_tick() {
        struct FailAt(u64);
        impl TickListener<u64> for FailAt {
            fn after_tick(&mut self, lapse: &TimeLapse, _ctx: &mut u64) -> ListenerResult {
                if lapse.tick.0 == self.0 {
                    return Err("boom".into());
                }
                Ok(())
            }
        }

        let mut d = TickDispatcher::new(config(100)).unwrap();
        d.register(FailAt(3));
        let mut ctx = 0u64;
        let err = d.run(&mut ctx, |_, _| false).unwrap_err();
        match err {
            ClockError::Listener { tick, source } => {
                assert_eq!(tick, Tick(3));
                assert_eq!(source.to_string(), "boom");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn simulated_mode_does_not_sleep() {
        let mut d = TickDispatcher::new(config(1_000)).unwrap();
        let mut ctx = 0u64;
        let summary = d.run(&mut ctx, |_, lapse| lapse.tick.0 >= 1_000).unwrap();
        assert_eq!(summary.ticks, 1_000);
        assert!(summary.wall_time < Duration::from_secs(1));
    }

    #[test]
    fn real_time_mode_paces_ticks() {
        let cfg = DispatchConfig { initial_mode: ClockMode::RealTime, ..config(20) };
        let mut d = TickDispatcher::new(cfg).unwrap();
        let mut ctx = 0u64;
        let summary = d.run(&mut ctx, |_, lapse| lapse.tick.0 >= 6).unwrap();
        assert_eq!(summary.real_time_ticks, 6);
        // Five full intervals separate six paced tick starts.
        assert!(summary.wall_time >= Duration::from_millis(100), "{:?}", summary.wall_time);
    }

    #[test]
    fn mode_change_from_listener_applies_next_tick() {
        struct SwitchAt {
            tick:  u64,
            clock: RealtimeClock,
        }
        impl TickListener<()> for SwitchAt {
            fn after_tick(&mut self, lapse: &TimeLapse, _ctx: &mut ()) -> ListenerResult {
                if lapse.tick.0 == self.tick {
                    self.clock.request_real_time();
                }
                Ok(())
            }
        }

        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut d = TickDispatcher::new(config(10)).unwrap();
        d.register(ModeRecorder { clock: d.clock(), seen: Rc::clone(&seen) });
        d.register(SwitchAt { tick: 2, clock: d.clock() });

        d.run_ticks(5, &mut ()).unwrap();

        let modes: Vec<ClockMode> = seen.borrow().iter().map(|(_, m, _)| *m).collect();
        assert_eq!(
            modes,
            vec![
                ClockMode::Simulated,
                ClockMode::Simulated,
                ClockMode::Simulated,
                ClockMode::RealTime,
                ClockMode::RealTime,
            ]
        );
        let seen = seen.borrow();
        let gap = seen[4].2.duration_since(seen[3].2);
        assert!(gap >= Duration::from_millis(8), "{gap:?}");
    }
}
