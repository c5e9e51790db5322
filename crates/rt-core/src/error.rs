//! Framework error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

/// The top-level error type for `rt-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("invalid time window [{begin}, {end})")]
    InvalidTimeWindow { begin: u64, end: u64 },
}

/// Shorthand result type for `rt-core`.
pub type CoreResult<T> = Result<T, CoreError>;
