//! Runs one solver on a dedicated worker thread.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender};
use rt_clock::RealtimeClock;
use rt_pdp::Snapshot;
use tracing::{debug, error};

use crate::scheduler::Bridge;
use crate::{CancelToken, RealtimeSolver, ScheduleReader, Scheduler, SolverError, SolverResult};

struct Job {
    generation: u64,
    snapshot:   Snapshot,
    cancel:     CancelToken,
}

/// Owns a solver's worker thread and enforces the real-time protocol.
///
/// - `init` has returned before [`start`](Self::start) returns.
/// - At most one `receive_snapshot` runs at a time.
/// - [`dispatch`](Self::dispatch) cancels the running computation, never
///   waits for it, and switches the clock to `RealTime`; the solver's
///   `done_for_now` switches it back.
/// - Snapshots superseded before the worker picked them up are skipped.
/// - A solver error or panic is stored, releases the clock back to
///   `Simulated`, and is reported by [`check_health`](Self::check_health)
///   and every later `dispatch`.
///
/// Dropping the host cancels any computation and joins the worker.
pub struct SolverHost {
    bridge: Arc<Bridge>,
    jobs:   Option<Sender<Job>>,
    worker: Option<JoinHandle<()>>,
}

impl SolverHost {
    /// Spawn the worker, run `init` on it, and wait for it to finish.
    pub fn start(mut solver: Box<dyn RealtimeSolver>, clock: RealtimeClock) -> SolverResult<Self> {
        let bridge = Arc::new(Bridge::new(clock));
        let (job_tx, job_rx) = crossbeam_channel::unbounded();
        let (ack_tx, ack_rx) = crossbeam_channel::bounded::<SolverResult<()>>(1);

        let scheduler = Scheduler::new(Arc::clone(&bridge));
        let worker_bridge = Arc::clone(&bridge);
        let worker = thread::Builder::new()
            .name("rt-solver".into())
            .spawn(move || {
                let init = panic::catch_unwind(AssertUnwindSafe(|| solver.init(scheduler)))
                    .unwrap_or_else(|payload| Err(SolverError::Panicked(panic_message(&*payload))));
                let ready = init.is_ok();
                if ack_tx.send(init).is_err() || !ready {
                    return;
                }
                worker_loop(solver, &worker_bridge, &job_rx);
            })
            .map_err(|e| SolverError::Spawn(e.to_string()))?;

        match ack_rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = worker.join();
                return Err(e);
            }
            Err(_) => return Err(SolverError::WorkerGone),
        }
        debug!("solver initialized");

        Ok(Self { bridge, jobs: Some(job_tx), worker: Some(worker) })
    }

    /// Hand `snapshot` to the solver, preempting any running computation.
    ///
    /// Returns the new generation number.
    pub fn dispatch(&self, snapshot: Snapshot) -> SolverResult<u64> {
        let jobs = self.jobs.as_ref().ok_or(SolverError::WorkerGone)?;

        let mut gens = self.bridge.gens.lock();
        if let Some(fault) = &gens.fault {
            return Err(fault.clone());
        }
        gens.current += 1;
        let generation = gens.current;
        let cancel = CancelToken::new();
        if let Some(prev) = gens.cancel.replace(cancel.clone()) {
            prev.cancel();
        }
        self.bridge.clock.request_real_time();

        let vehicles = snapshot.vehicle_count();
        let time = snapshot.time();
        if jobs.send(Job { generation, snapshot, cancel }).is_err() {
            self.bridge.clock.request_simulated();
            return Err(gens.fault.clone().unwrap_or(SolverError::WorkerGone));
        }
        debug!(generation, vehicles, time, "snapshot dispatched");
        Ok(generation)
    }

    /// Block until the newest snapshot has been answered with
    /// `done_for_now`, the solver has failed, or `timeout` has passed.
    ///
    /// Returns `true` when nothing is outstanding.
    pub fn wait_until_done(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut gens = self.bridge.gens.lock();
        while gens.done < gens.current && gens.fault.is_none() {
            if self.bridge.settled.wait_until(&mut gens, deadline).timed_out() {
                break;
            }
        }
        gens.done >= gens.current
    }

    /// The first fatal solver error, if any.
    pub fn check_health(&self) -> SolverResult<()> {
        match &self.bridge.gens.lock().fault {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }

    /// `true` while the worker is inside `receive_snapshot`.
    pub fn is_computing(&self) -> bool {
        self.bridge.gens.lock().computing
    }

    /// `true` while the newest dispatched snapshot has not been answered
    /// with `done_for_now`.
    pub fn is_outstanding(&self) -> bool {
        let gens = self.bridge.gens.lock();
        gens.done < gens.current
    }

    /// Number of snapshots dispatched so far.
    pub fn generation(&self) -> u64 {
        self.bridge.gens.lock().current
    }

    pub fn reader(&self) -> ScheduleReader {
        ScheduleReader::new(Arc::clone(&self.bridge))
    }

    pub fn clock(&self) -> &RealtimeClock {
        &self.bridge.clock
    }

    /// Cancel any computation, close the job queue, and join the worker.
    pub fn shutdown(&mut self) {
        if let Some(cancel) = self.bridge.gens.lock().cancel.take() {
            cancel.cancel();
        }
        self.jobs = None;
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                error!("solver worker terminated abnormally");
            }
        }
    }
}

impl Drop for SolverHost {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// ── Worker ────────────────────────────────────────────────────────────────────

fn worker_loop(mut solver: Box<dyn RealtimeSolver>, bridge: &Bridge, jobs: &Receiver<Job>) {
    while let Ok(mut job) = jobs.recv() {
        // Only the newest queued snapshot is worth computing.
        for newer in jobs.try_iter() {
            debug!(generation = job.generation, "snapshot superseded before start");
            job = newer;
        }
        let Job { generation, snapshot, cancel } = job;

        {
            let mut gens = bridge.gens.lock();
            if generation != gens.current {
                // The newer job is already queued.
                continue;
            }
            gens.running = generation;
            gens.vehicles = snapshot.vehicle_count();
            gens.computing = true;
        }

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            solver.receive_snapshot(snapshot, &cancel)
        }));

        let mut gens = bridge.gens.lock();
        gens.computing = false;
        let fault = match outcome {
            Ok(Ok(())) => None,
            Ok(Err(SolverError::Cancelled)) if cancel.is_cancelled() => {
                debug!(generation, "computation cancelled");
                None
            }
            Ok(Err(e)) => Some(e),
            Err(payload) => Some(SolverError::Panicked(panic_message(&*payload))),
        };
        if let Some(e) = fault {
            error!(generation, error = %e, "solver failed");
            gens.fault = Some(e);
            bridge.clock.request_simulated();
            bridge.settled.notify_all();
            return;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
