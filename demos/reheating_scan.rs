//! Example: Reheating Scan - Mass × Coupling Grid
//!
//! Runs the power-law model over a grid of masses and couplings on every
//! available core and appends one CSV row per successful simulation to
//! `results/reheating_scan.csv`.
//!
//! **Units**: `G_N = 1/3`, so the stiff background is `1 / (8π t²)`.
//!
//! **Grid**:
//! - m = 0.8, 1, 1.25 (massive field)
//! - λ = 4.5, 4.75, 5, 5.25 (decay coupling)
//! - b = 1, ξ = 0, t0 = 0.01
//!
//! The grid brackets `Γ t_eq ≈ 2.5`, where chi still grows after the matter
//! crossing. The heaviest coupling at the lightest mass leaves phi below chi
//! at `t_eq`; its radiation phase finds no crossing and shows up as a failure.
//!
//! Run with `RUST_LOG=debug` to follow every phase.

use reheat_rs::{
    models::PowerLawModel,
    output::{CsvConfig, CsvMetadata, CsvWriter},
    physics::ParameterSet,
    simulation::{SimulationConfiguration, SimulationManager},
};

use std::sync::Arc;
use std::time::Instant;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("═══════════════════════════════════════════════════════");
    println!("  Reheating Scan - Power-Law Model");
    println!("═══════════════════════════════════════════════════════\n");

    // ====== Parameter grid ======

    let masses = [0.8, 1.0, 1.25];
    let couplings = [4.5, 4.75, 5.0, 5.25];

    let parameters: Vec<ParameterSet> = masses
        .iter()
        .flat_map(|&mass| {
            couplings.iter().map(move |&coupling| {
                ParameterSet::new(0.01, mass, coupling, 1.0, 0.0).with_gravitational_constant(1.0 / 3.0)
            })
        })
        .collect();

    println!("Grid: {} masses × {} couplings = {} simulations\n", masses.len(), couplings.len(), parameters.len());

    // ====== Output ======

    let configuration = SimulationConfiguration::default();
    let mut metadata = CsvMetadata::from_simulation("power law", configuration.solver.method.name());
    metadata.add_custom("G_N".to_string(), "1/3".to_string());

    let writer = Arc::new(CsvWriter::create(
        "results",
        "reheating_scan.csv",
        CsvConfig::default().with_metadata(metadata),
    )?);

    // ====== Batch ======

    let manager = SimulationManager::new(parameters, Arc::new(PowerLawModel::default()), writer.clone(), None)
        .with_configuration(configuration);

    println!("Running on {} workers...", manager.workers());
    let start = Instant::now();
    let report = manager.run();
    let elapsed = start.elapsed().as_secs_f64();

    // =============================================================================================
    // Report
    // =============================================================================================

    println!("\n═══════════════════════════════════════════════════════");
    println!("  Results");
    println!("═══════════════════════════════════════════════════════\n");

    println!("  Attempted : {}", report.attempted);
    println!("  Succeeded : {}", report.succeeded);
    println!("  Failed    : {}", report.failed());
    println!("  Time      : {:.2} s", elapsed);
    println!("  Output    : {}\n", writer.path().display());

    if report.failed() > 0 {
        println!("{:<6} {:<10} {}", "Task", "Kind", "Reason");
        println!("{:-<60}", "");
        for failure in report.sorted_failures() {
            println!("{:<6} {:<10} {}", failure.index, format!("{:?}", failure.kind), failure.message);
        }
    }

    Ok(())
}
