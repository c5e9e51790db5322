use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolverError {
    #[error("computation was cancelled")]
    Cancelled,

    #[error("solver has already been initialized")]
    AlreadyInitialized,

    #[error("solver has not been initialized")]
    NotInitialized,

    #[error("No schedule has been set")]
    NoSchedule,

    #[error("no snapshot has been dispatched to this solver")]
    NoSnapshot,

    #[error("schedule has {got} entries but the snapshot had {expected} vehicles")]
    EntryCountMismatch { expected: usize, got: usize },

    #[error("solver failed: {0}")]
    Failed(String),

    #[error("solver panicked: {0}")]
    Panicked(String),

    #[error("could not start solver worker: {0}")]
    Spawn(String),

    #[error("solver worker has stopped")]
    WorkerGone,
}

pub type SolverResult<T> = Result<T, SolverError>;
