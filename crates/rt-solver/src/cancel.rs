//! Cooperative cancellation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex};

use crate::{SolverError, SolverResult};

#[derive(Debug, Default)]
struct Flag {
    cancelled: Mutex<bool>,
    wakeup:    Condvar,
}

/// Signal telling a running computation that its result is no longer wanted.
///
/// Clones share the flag.  Once cancelled a token stays cancelled.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<Flag>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and wake every [`sleep`](Self::sleep)er.
    pub fn cancel(&self) {
        let mut c = self.flag.cancelled.lock();
        *c = true;
        self.flag.wakeup.notify_all();
    }

    #[inline]
    pub fn is_cancelled(&self) -> bool {
        *self.flag.cancelled.lock()
    }

    /// `Err(Cancelled)` once cancelled.  Call between units of work.
    pub fn check(&self) -> SolverResult<()> {
        if self.is_cancelled() { Err(SolverError::Cancelled) } else { Ok(()) }
    }

    /// Block for `dur`, returning early with `Err(Cancelled)` if the token is
    /// cancelled meanwhile.
    pub fn sleep(&self, dur: Duration) -> SolverResult<()> {
        let deadline = Instant::now() + dur;
        let mut c = self.flag.cancelled.lock();
        while !*c {
            if self.flag.wakeup.wait_until(&mut c, deadline).timed_out() {
                break;
            }
        }
        if *c { Err(SolverError::Cancelled) } else { Ok(()) }
    }
}
