//! Tests for the solver host, scheduler bridge, and bundled solvers.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rt_clock::{ClockMode, RealtimeClock};
use rt_core::{ParcelId, Point, VehicleId};
use rt_pdp::{ParcelSpec, Schedule, Snapshot, VehicleSpec, World};

use crate::scheduler::Bridge;
use crate::{
    CancelToken, RandomSolver, RealtimeSolver, Scheduler, Solver, SolverAdapter, SolverError,
    SolverHost, SolverResult,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn world(vehicles: usize, parcels: usize) -> World {
    let mut w = World::new(Point::new(0.0, 0.0));
    for i in 0..vehicles {
        w.add_vehicle(VehicleSpec::new(Point::new(i as f64, 0.0), 60.0));
    }
    for i in 0..parcels {
        let spec = ParcelSpec::builder(Point::new(i as f64, 1.0), Point::new(i as f64, 2.0))
            .build()
            .unwrap();
        w.announce(spec, 0);
    }
    w
}

fn snapshot_at(time: u64, vehicles: usize) -> Snapshot {
    Snapshot::capture(&world(vehicles, 1), time)
}

/// Poll `cond` every few milliseconds until it holds or `timeout` passes.
fn wait_until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    while Instant::now() < deadline {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(2));
    }
    cond()
}

fn detached_scheduler() -> Scheduler {
    Scheduler::new(Arc::new(Bridge::new(RealtimeClock::default())))
}

#[derive(Debug, Default)]
struct Counts {
    init:       AtomicUsize,
    receive:    AtomicUsize,
    update:     AtomicUsize,
    done:       AtomicUsize,
    cancelled:  AtomicUsize,
    active:     AtomicUsize,
    max_active: AtomicUsize,
}

impl Counts {
    fn get(c: &AtomicUsize) -> usize {
        c.load(Ordering::SeqCst)
    }
}

/// Takes `work` wall time per snapshot, honouring cancellation, then
/// publishes an empty schedule.
struct SleepySolver {
    scheduler: Option<Scheduler>,
    counts:    Arc<Counts>,
    work:      Duration,
}

impl SleepySolver {
    fn boxed(counts: &Arc<Counts>, work: Duration) -> Box<dyn RealtimeSolver> {
        Box::new(Self { scheduler: None, counts: Arc::clone(counts), work })
    }
}

impl RealtimeSolver for SleepySolver {
    fn init(&mut self, scheduler: Scheduler) -> SolverResult<()> {
        self.counts.init.fetch_add(1, Ordering::SeqCst);
        self.scheduler = Some(scheduler);
        Ok(())
    }

    fn receive_snapshot(&mut self, snapshot: Snapshot, cancel: &CancelToken) -> SolverResult<()> {
        let c = &self.counts;
        c.receive.fetch_add(1, Ordering::SeqCst);
        let now_active = c.active.fetch_add(1, Ordering::SeqCst) + 1;
        c.max_active.fetch_max(now_active, Ordering::SeqCst);
        let slept = cancel.sleep(self.work);
        c.active.fetch_sub(1, Ordering::SeqCst);
        if slept.is_err() {
            c.cancelled.fetch_add(1, Ordering::SeqCst);
            return slept;
        }

        let scheduler = self.scheduler.as_ref().ok_or(SolverError::NotInitialized)?;
        c.update.fetch_add(1, Ordering::SeqCst);
        scheduler.update_schedule(Schedule::empty(snapshot.vehicle_count()))?;
        c.done.fetch_add(1, Ordering::SeqCst);
        scheduler.done_for_now();
        Ok(())
    }
}

/// Ignores its cancel token and tags its schedule with the snapshot time.
struct StubbornSolver {
    scheduler: Option<Scheduler>,
    work:      Duration,
}

impl RealtimeSolver for StubbornSolver {
    fn init(&mut self, scheduler: Scheduler) -> SolverResult<()> {
        self.scheduler = Some(scheduler);
        Ok(())
    }

    fn receive_snapshot(&mut self, snapshot: Snapshot, _cancel: &CancelToken) -> SolverResult<()> {
        thread::sleep(self.work);
        let scheduler = self.scheduler.as_ref().ok_or(SolverError::NotInitialized)?;
        scheduler.update_schedule(Schedule::new(vec![vec![ParcelId(snapshot.time() as u32)]]))?;
        scheduler.done_for_now();
        scheduler.done_for_now();
        Ok(())
    }
}

/// A blocking solver returning whatever the closure builds.
struct FnSolver<F>(F);

impl<F> Solver for FnSolver<F>
where
    F: FnMut(&Snapshot) -> SolverResult<Schedule> + Send + 'static,
{
    fn solve(&mut self, snapshot: &Snapshot, _cancel: &CancelToken) -> SolverResult<Schedule> {
        (self.0)(snapshot)
    }
}

fn adapted<F>(f: F) -> Box<dyn RealtimeSolver>
where
    F: FnMut(&Snapshot) -> SolverResult<Schedule> + Send + 'static,
{
    Box::new(SolverAdapter::new(FnSolver(f)))
}

// ── CancelToken ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod cancel_tests {
    use super::*;

    #[test]
    fn sleep_completes_when_not_cancelled() {
        let token = CancelToken::new();
        let start = Instant::now();
        assert!(token.sleep(Duration::from_millis(30)).is_ok());
        assert!(start.elapsed() >= Duration::from_millis(30));
        assert!(token.check().is_ok());
    }

    #[test]
    fn cancel_wakes_sleeper_early() {
        let token = CancelToken::new();
        let remote = token.clone();
        let handle = thread::spawn(move || {
            thread::sleep(Duration::from_millis(20));
            remote.cancel();
        });
        let start = Instant::now();
        assert_eq!(token.sleep(Duration::from_secs(10)), Err(SolverError::Cancelled));
        assert!(start.elapsed() < Duration::from_secs(5));
        handle.join().unwrap();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(SolverError::Cancelled));
    }

    #[test]
    fn cancelled_token_sleeps_zero() {
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(token.sleep(Duration::from_secs(10)), Err(SolverError::Cancelled));
    }
}

// ── Scheduler ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod scheduler_tests {
    use super::*;

    #[test]
    fn no_schedule_message() {
        let s = detached_scheduler();
        let err = s.current_schedule().unwrap_err();
        assert_eq!(err, SolverError::NoSchedule);
        assert_eq!(err.to_string(), "No schedule has been set");
    }

    #[test]
    fn update_without_snapshot_rejected() {
        let s = detached_scheduler();
        assert_eq!(s.update_schedule(Schedule::empty(1)), Err(SolverError::NoSnapshot));
    }

    #[test]
    fn init_sees_no_schedule() {
        struct InitRecorder(Arc<Mutex<Option<String>>>);
        impl RealtimeSolver for InitRecorder {
            fn init(&mut self, scheduler: Scheduler) -> SolverResult<()> {
                let msg = scheduler.current_schedule().err().map(|e| e.to_string());
                *self.0.lock() = msg;
                Ok(())
            }
            fn receive_snapshot(&mut self, _s: Snapshot, _c: &CancelToken) -> SolverResult<()> {
                Ok(())
            }
        }

        let seen = Arc::new(Mutex::new(None));
        let host = SolverHost::start(Box::new(InitRecorder(Arc::clone(&seen))), RealtimeClock::default())
            .unwrap();
        assert_eq!(seen.lock().as_deref(), Some("No schedule has been set"));
        assert_eq!(
            host.reader().current_schedule().unwrap_err().to_string(),
            "No schedule has been set"
        );
        assert_eq!(host.reader().version(), 0);
        assert!(host.reader().latest().is_none());
    }
}

// ── SolverHost ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod host_tests {
    use super::*;

    #[test]
    fn init_runs_once_before_start_returns() {
        let counts = Arc::new(Counts::default());
        let host = SolverHost::start(
            SleepySolver::boxed(&counts, Duration::ZERO),
            RealtimeClock::default(),
        )
        .unwrap();
        assert_eq!(Counts::get(&counts.init), 1);
        assert_eq!(host.generation(), 0);
        assert!(!host.is_outstanding());
    }

    #[test]
    fn init_failure_is_reported_by_start() {
        struct Refuses;
        impl RealtimeSolver for Refuses {
            fn init(&mut self, _s: Scheduler) -> SolverResult<()> {
                Err(SolverError::Failed("no licence".into()))
            }
            fn receive_snapshot(&mut self, _s: Snapshot, _c: &CancelToken) -> SolverResult<()> {
                Ok(())
            }
        }
        let result = SolverHost::start(Box::new(Refuses), RealtimeClock::default());
        assert!(matches!(result, Err(SolverError::Failed(m)) if m == "no licence"));
    }

    #[test]
    fn single_computation_toggles_clock() {
        let counts = Arc::new(Counts::default());
        let clock = RealtimeClock::default();
        let host = SolverHost::start(
            SleepySolver::boxed(&counts, Duration::from_millis(50)),
            clock.clone(),
        )
        .unwrap();

        host.dispatch(snapshot_at(0, 2)).unwrap();
        assert_eq!(clock.current_mode(), ClockMode::RealTime);
        assert!(wait_until(Duration::from_secs(5), || !host.is_outstanding()));

        assert_eq!(clock.current_mode(), ClockMode::Simulated);
        assert_eq!(clock.transitions(), 2);
        assert_eq!(host.reader().version(), 1);
        assert_eq!(host.reader().current_schedule().unwrap().len(), 2);
    }

    #[test]
    fn preempted_computation_is_cancelled() {
        let counts = Arc::new(Counts::default());
        let clock = RealtimeClock::default();
        let host = SolverHost::start(
            SleepySolver::boxed(&counts, Duration::from_millis(1_000)),
            clock.clone(),
        )
        .unwrap();

        host.dispatch(snapshot_at(0, 2)).unwrap();
        thread::sleep(Duration::from_millis(100));
        host.dispatch(snapshot_at(100, 2)).unwrap();
        // Still real time: the preemption must not release the clock.
        assert_eq!(clock.current_mode(), ClockMode::RealTime);

        assert!(wait_until(Duration::from_secs(5), || !host.is_outstanding()));
        assert!(wait_until(Duration::from_secs(1), || !host.is_computing()));

        assert_eq!(Counts::get(&counts.init), 1);
        assert_eq!(Counts::get(&counts.receive), 2);
        assert_eq!(Counts::get(&counts.cancelled), 1);
        assert_eq!(Counts::get(&counts.update), 1);
        assert_eq!(Counts::get(&counts.done), 1);
        assert_eq!(Counts::get(&counts.max_active), 1);
        assert_eq!(clock.current_mode(), ClockMode::Simulated);
        assert_eq!(clock.transitions(), 2);
        assert!(host.check_health().is_ok());
    }

    #[test]
    fn burst_of_dispatches_never_overlaps() {
        let counts = Arc::new(Counts::default());
        let host = SolverHost::start(
            SleepySolver::boxed(&counts, Duration::from_millis(20)),
            RealtimeClock::default(),
        )
        .unwrap();

        for t in 0..10 {
            host.dispatch(snapshot_at(t, 1)).unwrap();
            thread::sleep(Duration::from_millis(3));
        }
        assert!(wait_until(Duration::from_secs(5), || !host.is_outstanding()));

        assert_eq!(Counts::get(&counts.max_active), 1);
        assert!(Counts::get(&counts.receive) <= 10);
        assert!(Counts::get(&counts.done) >= 1);
        assert_eq!(host.generation(), 10);
    }

    #[test]
    fn late_calls_from_superseded_computation_are_dropped() {
        let clock = RealtimeClock::default();
        let solver = StubbornSolver { scheduler: None, work: Duration::from_millis(150) };
        let host = SolverHost::start(Box::new(solver), clock.clone()).unwrap();

        host.dispatch(snapshot_at(1, 1)).unwrap();
        assert!(wait_until(Duration::from_secs(2), || host.is_computing()));
        host.dispatch(snapshot_at(2, 1)).unwrap();

        assert!(wait_until(Duration::from_secs(5), || !host.is_outstanding()));

        let reader = host.reader();
        assert_eq!(reader.version(), 1, "only the surviving computation publishes");
        let schedule = reader.current_schedule().unwrap();
        assert_eq!(schedule.entry(VehicleId(0)), Some(&[ParcelId(2)][..]));
        // Repeated done_for_now does not add transitions.
        assert_eq!(clock.transitions(), 2);
        assert_eq!(clock.current_mode(), ClockMode::Simulated);
    }

    #[test]
    fn entry_count_mismatch_is_fatal() {
        let solver = adapted(|s: &Snapshot| Ok(Schedule::empty(s.vehicle_count() + 1)));
        let host = SolverHost::start(solver, RealtimeClock::default()).unwrap();

        host.dispatch(snapshot_at(0, 2)).unwrap();
        assert!(wait_until(Duration::from_secs(5), || host.check_health().is_err()));

        let expected = SolverError::EntryCountMismatch { expected: 2, got: 3 };
        assert_eq!(host.check_health(), Err(expected.clone()));
        assert_eq!(host.dispatch(snapshot_at(1, 2)), Err(expected));
        assert_eq!(host.reader().version(), 0);
    }

    #[test]
    fn solver_panic_is_fatal() {
        let solver = adapted(|_: &Snapshot| panic!("kaboom"));
        let host = SolverHost::start(solver, RealtimeClock::default()).unwrap();

        host.dispatch(snapshot_at(0, 1)).unwrap();
        assert!(wait_until(Duration::from_secs(5), || host.check_health().is_err()));
        assert_eq!(host.check_health(), Err(SolverError::Panicked("kaboom".into())));
    }

    #[test]
    fn solver_error_is_fatal() {
        let solver = adapted(|_: &Snapshot| Err(SolverError::Failed("infeasible".into())));
        let host = SolverHost::start(solver, RealtimeClock::default()).unwrap();

        host.dispatch(snapshot_at(0, 1)).unwrap();
        assert!(wait_until(Duration::from_secs(5), || host.check_health().is_err()));
        assert_eq!(host.check_health(), Err(SolverError::Failed("infeasible".into())));
    }

    #[test]
    fn fault_releases_clock_and_is_returned_by_dispatch() {
        let clock = RealtimeClock::default();
        let solver = adapted(|_: &Snapshot| Err(SolverError::Failed("infeasible".into())));
        let host = SolverHost::start(solver, clock.clone()).unwrap();

        host.dispatch(snapshot_at(0, 1)).unwrap();
        assert!(!host.wait_until_done(Duration::from_secs(5)), "a failed snapshot is never done");
        assert_eq!(clock.current_mode(), ClockMode::Simulated);

        // The worker has exited; the stored fault wins over `WorkerGone`.
        let fault = SolverError::Failed("infeasible".into());
        assert_eq!(host.dispatch(snapshot_at(1, 1)), Err(fault));
        assert_eq!(host.generation(), 1);
        assert_eq!(clock.current_mode(), ClockMode::Simulated);
    }

    #[test]
    fn wait_until_done_is_bounded() {
        let counts = Arc::new(Counts::default());
        let host = SolverHost::start(
            SleepySolver::boxed(&counts, Duration::from_millis(300)),
            RealtimeClock::default(),
        )
        .unwrap();
        assert!(host.wait_until_done(Duration::ZERO), "nothing dispatched yet");

        host.dispatch(snapshot_at(0, 1)).unwrap();
        let start = Instant::now();
        assert!(!host.wait_until_done(Duration::from_millis(50)));
        assert!(start.elapsed() < Duration::from_millis(250));

        assert!(host.wait_until_done(Duration::from_secs(5)));
        assert_eq!(Counts::get(&counts.done), 1);
        assert_eq!(host.reader().version(), 1);
    }

    #[test]
    fn shutdown_interrupts_long_computation() {
        let counts = Arc::new(Counts::default());
        let mut host = SolverHost::start(
            SleepySolver::boxed(&counts, Duration::from_secs(30)),
            RealtimeClock::default(),
        )
        .unwrap();
        host.dispatch(snapshot_at(0, 1)).unwrap();
        assert!(wait_until(Duration::from_secs(2), || host.is_computing()));

        let start = Instant::now();
        host.shutdown();
        assert!(start.elapsed() < Duration::from_secs(5));
        assert_eq!(Counts::get(&counts.cancelled), 1);
        assert_eq!(host.dispatch(snapshot_at(1, 1)), Err(SolverError::WorkerGone));
    }
}

// ── Adapter ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod adapter_tests {
    use super::*;

    #[test]
    fn double_init_rejected() {
        let mut adapter = SolverAdapter::new(RandomSolver::new(1));
        let s = detached_scheduler();
        assert!(adapter.init(s.clone()).is_ok());
        assert_eq!(adapter.init(s), Err(SolverError::AlreadyInitialized));
    }

    #[test]
    fn receive_before_init_rejected() {
        let mut adapter = SolverAdapter::new(RandomSolver::new(1));
        let result = adapter.receive_snapshot(snapshot_at(0, 1), &CancelToken::new());
        assert_eq!(result, Err(SolverError::NotInitialized));
    }

    #[test]
    fn cancelled_solve_publishes_nothing() {
        let token = CancelToken::new();
        token.cancel();
        let mut adapter = SolverAdapter::new(RandomSolver::new(1));
        adapter.init(detached_scheduler()).unwrap();
        let result = adapter.receive_snapshot(snapshot_at(0, 2), &token);
        assert_eq!(result, Err(SolverError::Cancelled));
    }
}

// ── RandomSolver ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod random_tests {
    use super::*;

    fn busy_snapshot() -> Snapshot {
        let mut w = world(3, 6);
        let spec = ParcelSpec::builder(Point::new(2.0, 0.0), Point::new(9.0, 9.0))
            .build()
            .unwrap();
        let carried = w.announce(spec, 0);
        w.start_pickup(VehicleId(2), carried, 0).unwrap();
        Snapshot::capture(&w, 0)
    }

    #[test]
    fn every_parcel_assigned_once_with_two_stops() {
        let snap = busy_snapshot();
        let schedule = RandomSolver::new(5).solve(&snap, &CancelToken::new()).unwrap();
        assert_eq!(schedule.len(), 3);

        for p in snap.available_parcels() {
            let holders: Vec<usize> = schedule
                .routes()
                .iter()
                .enumerate()
                .filter(|(_, r)| r.contains(&p.id))
                .map(|(i, _)| i)
                .collect();
            assert_eq!(holders.len(), 1, "{} assigned to {holders:?}", p.id);
            let count = schedule.routes()[holders[0]].iter().filter(|&&x| x == p.id).count();
            assert_eq!(count, 2);
        }
    }

    #[test]
    fn cargo_is_delivered_first() {
        let snap = busy_snapshot();
        let schedule = RandomSolver::new(9).solve(&snap, &CancelToken::new()).unwrap();
        let route = schedule.entry(VehicleId(2)).unwrap();
        assert_eq!(route[0], ParcelId(6));
        assert_eq!(route.iter().filter(|&&p| p == ParcelId(6)).count(), 1);
    }

    #[test]
    fn same_seed_same_schedule_sequence() {
        let snap = busy_snapshot();
        let (mut a, mut b) = (RandomSolver::new(42), RandomSolver::new(42));
        let run = |s: &mut RandomSolver| -> Vec<Schedule> {
            (0..8).map(|_| s.solve(&snap, &CancelToken::new()).unwrap()).collect()
        };
        let (seq_a, seq_b) = (run(&mut a), run(&mut b));
        assert_eq!(seq_a, seq_b);
        assert!(seq_a.windows(2).any(|w| w[0] != w[1]), "the generator advances between calls");
    }

    #[test]
    fn supplier_builds_working_solver() {
        let supplier = RandomSolver::supplier();
        let clock = RealtimeClock::default();
        let host = SolverHost::start(crate::SolverSupplier::get(&supplier, 7), clock.clone())
            .unwrap();
        host.dispatch(busy_snapshot()).unwrap();
        assert!(wait_until(Duration::from_secs(5), || host.reader().version() == 1));
        assert!(wait_until(Duration::from_secs(5), || !host.is_outstanding()));
        assert_eq!(clock.current_mode(), ClockMode::Simulated);
    }
}
