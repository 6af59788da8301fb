//! Simulation error kinds

use thiserror::Error;

use crate::simulation::phase::Phase;
use crate::solver::SolverError;

/// Why one simulation task failed
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Parameters or configuration rejected before any phase ran
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// A phase failed
    #[error("{phase} phase failed: {source}")]
    Phase {
        phase: Phase,
        #[source]
        source: SolverError,
    },
}

impl SimulationError {
    /// Attach `phase` to a solver or numeric error
    pub fn in_phase(phase: Phase, source: impl Into<SolverError>) -> Self {
        SimulationError::Phase {
            phase,
            source: source.into(),
        }
    }

    /// Phase that failed, if any
    pub fn phase(&self) -> Option<Phase> {
        match self {
            SimulationError::Phase { phase, .. } => Some(*phase),
            SimulationError::Configuration(_) => None,
        }
    }

    /// Classification used in batch reports
    pub fn kind(&self) -> FailureKind {
        match self {
            SimulationError::Phase { .. } => FailureKind::Numeric,
            SimulationError::Configuration(_) => FailureKind::Generic,
        }
    }
}

/// Classification of a failed task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Root finding or density evaluation failed
    Numeric,

    /// Configuration or output failure
    Generic,

    /// The task panicked
    Unknown,
}
