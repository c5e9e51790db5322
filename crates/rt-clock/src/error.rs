use rt_core::{CoreError, Tick};
use thiserror::Error;

/// Error type returned by tick listeners.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

pub type ListenerResult = Result<(), BoxError>;

#[derive(Debug, Error)]
pub enum ClockError {
    #[error("dispatcher configuration error: {0}")]
    Config(String),

    #[error("tick listener failed at {tick}: {source}")]
    Listener {
        tick:   Tick,
        #[source]
        source: BoxError,
    },

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type ClockResult<T> = Result<T, ClockError>;
