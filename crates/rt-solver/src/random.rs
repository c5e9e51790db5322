//! A seeded solver that assigns parcels to random vehicles.

use rt_core::{ParcelId, SimRng};
use rt_pdp::{Schedule, Snapshot};

use crate::{CancelToken, RealtimeSolver, Solver, SolverAdapter, SolverResult};

/// Each vehicle first delivers what it already carries; every unassigned
/// parcel is then appended (pickup + delivery) to a uniformly chosen
/// vehicle.
///
/// The generator advances with every call, so repeated calls on one solver
/// differ.  Two solvers built from the same seed and fed the same sequence
/// of snapshots produce the same sequence of schedules.
pub struct RandomSolver {
    rng: SimRng,
}

impl RandomSolver {
    pub fn new(seed: u64) -> Self {
        Self { rng: SimRng::new(seed) }
    }

    /// Supplier producing adapted `RandomSolver`s, for use with a builder.
    pub fn supplier() -> impl Fn(u64) -> Box<dyn RealtimeSolver> {
        |seed| Box::new(SolverAdapter::new(RandomSolver::new(seed)))
    }
}

impl Solver for RandomSolver {
    fn solve(&mut self, snapshot: &Snapshot, cancel: &CancelToken) -> SolverResult<Schedule> {
        let mut routes: Vec<Vec<ParcelId>> = snapshot
            .vehicles()
            .iter()
            .map(|v| v.contents.iter().map(|p| p.id).collect())
            .collect();
        if routes.is_empty() {
            return Ok(Schedule::new(routes));
        }

        for parcel in snapshot.available_parcels() {
            cancel.check()?;
            let v = self.rng.gen_range(0..routes.len());
            routes[v].push(parcel.id);
            routes[v].push(parcel.id);
        }
        Ok(Schedule::new(routes))
    }
}
