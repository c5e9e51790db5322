//! `rt-solver`: running pluggable solvers next to a ticking simulation.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                        |
//! |---------------|-----------------------------------------------------------------|
//! | [`solver`]    | `RealtimeSolver`, `Solver`, `SolverSupplier` traits             |
//! | [`cancel`]    | `CancelToken`: cooperative cancellation with interruptible sleep |
//! | [`scheduler`] | `Scheduler` (worker side), `ScheduleReader` (simulation side)   |
//! | [`host`]      | `SolverHost`: worker thread, generations, preemption           |
//! | [`adapter`]   | `SolverAdapter`: blocking `Solver` → `RealtimeSolver`          |
//! | [`random`]    | `RandomSolver`: seeded reference solver                        |
//! | [`error`]     | `SolverError`, `SolverResult<T>`                                |
//!
//! # Generations
//!
//! Every [`SolverHost::dispatch`] starts a new *generation*.  The worker
//! records which generation it is computing; scheduler calls made while that
//! generation is no longer the newest are dropped.  This is what makes a
//! superseded computation harmless even if it ignores its cancel token.
//!
//! ```text
//! sim thread                       worker thread
//! ──────────                       ─────────────
//! dispatch(S1) ── gen 1 ─────────▶ receive_snapshot(S1) …
//!   request_real_time()
//! dispatch(S2) ── gen 2, cancel 1 ▶   … Err(Cancelled)
//!                                  receive_snapshot(S2)
//!                                    update_schedule(σ)   → published
//!                                    done_for_now()       → request_simulated()
//! ```

pub mod adapter;
pub mod cancel;
pub mod error;
pub mod host;
pub mod random;
pub mod scheduler;
pub mod solver;

#[cfg(test)]
mod tests;

pub use adapter::SolverAdapter;
pub use cancel::CancelToken;
pub use error::{SolverError, SolverResult};
pub use host::SolverHost;
pub use random::RandomSolver;
pub use scheduler::{ScheduleReader, Scheduler};
pub use solver::{RealtimeSolver, Solver, SolverSupplier};
