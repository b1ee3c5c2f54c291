//! Error type shared by the domain services.
//!
//! Validation problems are data, not failures: they carry every violating
//! field back to the caller so the UI can render per-field messages. Only
//! storage trouble is a real error, and nothing here is fatal to the
//! process.

use thiserror::Error;

use crate::backend::domain::calculator::CalculatorError;
use crate::backend::domain::schema::ValidationFailures;

#[derive(Debug, Error)]
pub enum DomainError {
    /// The addressed flock or record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// The submission failed validation; every violation is listed.
    #[error(transparent)]
    Invalid(#[from] ValidationFailures),

    /// Storage or other infrastructure trouble.
    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<CalculatorError> for DomainError {
    fn from(err: CalculatorError) -> Self {
        let mut failures = ValidationFailures::new();
        match &err {
            CalculatorError::InvalidMortality { .. } => {
                failures.push("dead_count", "invalid_mortality", err.to_string());
            }
            CalculatorError::UnsupportedDateRange { .. } => {
                failures.push("date", "unsupported_date_range", err.to_string());
            }
        }
        DomainError::Invalid(failures)
    }
}
