//! Helper functions for integration tests

use reheat_rs::physics::ParameterSet;
use reheat_rs::simulation::SimulationResult;

use super::mock_models::CrossingModel;

/// Relative error with an absolute floor for values near zero
pub fn relative_error(computed: f64, exact: f64) -> f64 {
    if exact.abs() < 1e-14 {
        computed.abs()
    } else {
        ((computed - exact) / exact).abs()
    }
}

/// Parameter sets with masses `1, 2, ..., count`
pub fn mass_grid(count: usize) -> Vec<ParameterSet> {
    (1..=count).map(|m| CrossingModel::parameters(m as f64)).collect()
}

/// Results sorted by mass, for comparisons independent of write order
pub fn sorted_by_mass(mut results: Vec<SimulationResult>) -> Vec<SimulationResult> {
    results.sort_by(|a, b| a.parameters.mass.total_cmp(&b.parameters.mass));
    results
}
