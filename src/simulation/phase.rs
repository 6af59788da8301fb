//! Phases of the pipeline and the branch between continuations

use std::fmt;

/// Stage of the pipeline, attached to every failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Stiff,
    Matter,
    Radiation,
    Reheating,
}

impl Phase {
    pub fn name(&self) -> &'static str {
        match self {
            Phase::Stiff => "stiff",
            Phase::Matter => "matter",
            Phase::Radiation => "radiation",
            Phase::Reheating => "reheating",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which epoch follows the stiff phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Continuation {
    /// The massive field dominates: matter epoch, then radiation
    MatterDominated,

    /// The massless field dominates: straight to radiation
    RadiationDominated,
}

impl Continuation {
    /// Label written to result files
    pub fn label(&self) -> &'static str {
        match self {
            Continuation::MatterDominated => "matter",
            Continuation::RadiationDominated => "radiation",
        }
    }

    pub fn is_matter(&self) -> bool {
        matches!(self, Continuation::MatterDominated)
    }
}

impl fmt::Display for Continuation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Choose the continuation from the densities at the stiff equal time
///
/// The massive field wins only when strictly larger; a tie goes to radiation.
///
/// ```rust
/// use reheat_rs::simulation::{select_continuation, Continuation};
///
/// assert_eq!(select_continuation(2.0, 1.0), Continuation::MatterDominated);
/// assert_eq!(select_continuation(1.0, 1.0), Continuation::RadiationDominated);
/// ```
pub fn select_continuation(phi: f64, chi: f64) -> Continuation {
    if phi > chi {
        Continuation::MatterDominated
    } else {
        Continuation::RadiationDominated
    }
}
