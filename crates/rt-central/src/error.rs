use rt_clock::ClockError;
use rt_pdp::PdpError;
use rt_solver::SolverError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CentralError {
    #[error("scenario has no vehicles")]
    NoVehicles,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("could not read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("could not serialize configuration: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Clock(#[from] ClockError),

    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Pdp(#[from] PdpError),
}

pub type CentralResult<T> = Result<T, CentralError>;
