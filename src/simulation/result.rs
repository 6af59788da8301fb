//! Result of one simulation

use crate::physics::ParameterSet;
use crate::simulation::phase::Continuation;
use crate::solver::PhaseResult;

/// Reheating temperature and time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reheating {
    /// `T_rh = (∫ chi dt)^(1/4)`
    pub temperature: f64,

    /// Time of the massless density maximum
    pub time: f64,
}

/// Everything one task produces
///
/// Immutable once built; handed to the results writer.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationResult {
    pub parameters: ParameterSet,
    pub continuation: Continuation,

    /// Background against massive field, `(t_eq, rho_stiff, rho_phi)`
    pub stiff: PhaseResult,

    /// Massive against massless field, `(tau_eq, rho_phi, rho_chi)`.
    /// Present only on the matter-dominated continuation.
    pub matter: Option<PhaseResult>,

    /// Massive against massless field, `(tau2_eq, rho_phi, rho_chi)`
    pub radiation: PhaseResult,

    pub reheating: Reheating,
}

impl SimulationResult {
    /// Whether every computed number is finite
    pub fn is_finite(&self) -> bool {
        self.stiff.is_finite()
            && self.matter.is_none_or(|matter| matter.is_finite())
            && self.radiation.is_finite()
            && self.reheating.temperature.is_finite()
            && self.reheating.time.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn phase(t: f64) -> PhaseResult {
        PhaseResult { equal_time: t, first_value: 1.0, second_value: 1.0 }
    }

    #[test]
    fn test_is_finite() {
        let mut result = SimulationResult {
            parameters: ParameterSet::new(1e-32, 1e20, 0.01, 1.0, 0.0),
            continuation: Continuation::RadiationDominated,
            stiff: phase(1.0),
            matter: None,
            radiation: phase(2.0),
            reheating: Reheating { temperature: 3.0, time: 4.0 },
        };
        assert!(result.is_finite());

        result.matter = Some(phase(f64::NAN));
        assert!(!result.is_finite());
    }
}
