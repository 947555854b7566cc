use thiserror::Error;

/// Errors raised by the simulation core before any run executes.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Numeric instability: interval_seconds * (c1 + c2) = {step_factor} (must be < 1.0)")]
    NumericInstability { step_factor: f64 },
}

impl SimError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        SimError::InvalidConfiguration(msg.into())
    }
}

pub type SimResult<T> = Result<T, SimError>;
