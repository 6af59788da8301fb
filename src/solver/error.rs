//! Solver error kinds

use thiserror::Error;

use crate::physics::NumericError;

/// Why an equal-time search failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolverError {
    /// Automatic bracketing never saw a sign change
    #[error(
        "no sign change found above t = {lower:e} after {attempts} probes (last probe at t = {last_probe:e})"
    )]
    BracketNotFound {
        lower: f64,
        attempts: usize,
        last_probe: f64,
    },

    /// The interval handed to the root finder does not bracket a root
    #[error("no sign change on [{low:e}, {high:e}]: h(low) = {f_low:e}, h(high) = {f_high:e}")]
    NoSignChange {
        low: f64,
        high: f64,
        f_low: f64,
        f_high: f64,
    },

    /// The root exists but the second density does not exceed the restriction there
    #[error("restriction violated at t = {time:e}: density {value:e} does not exceed {restriction:e}")]
    ConstraintViolation {
        time: f64,
        value: f64,
        restriction: f64,
    },

    /// A density evaluation left its domain
    #[error(transparent)]
    NumericDomain(#[from] NumericError),

    /// Configuration or problem rejected before solving
    #[error("invalid solver configuration: {0}")]
    InvalidConfiguration(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_error_converts() {
        let error: SolverError = NumericError::new(2.0, "negative density").into();

        assert!(matches!(error, SolverError::NumericDomain(_)));
        assert!(error.to_string().contains("negative density"));
    }

    #[test]
    fn test_messages_carry_context() {
        let error = SolverError::ConstraintViolation { time: 1.5, value: 0.1, restriction: 0.2 };
        let text = error.to_string();

        assert!(text.contains("1.5e0"));
        assert!(text.contains("2e-1"));
    }
}
