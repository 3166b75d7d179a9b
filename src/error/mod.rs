mod codes;

pub use codes::ExitCode;

use crate::api::ApiError;
use crate::config::ConfigError;
use crate::planner::PlanError;
use thiserror::Error;

/// Top-level error for a run; every variant maps to an exit code.
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Plan(#[from] PlanError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AppError {
    /// Declines and partial outcomes carry their codes as `Ok` values;
    /// anything that surfaces as an error aborted the run outright.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::Failure
    }
}
