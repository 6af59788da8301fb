//! Integration tests: worker pool + pipeline + result sinks
//!
//! These tests run whole batches and check that every task is attempted
//! exactly once, failures stay isolated, and the output does not depend on
//! the number of workers.

use std::collections::HashSet;
use std::fs;
use std::sync::Arc;

use reheat_rs::output::export::{CsvConfig, CsvMetadata, CsvWriter, MemoryWriter, ResultsWriter, WriteError};
use reheat_rs::physics::ParameterSet;
use reheat_rs::simulation::{FailureKind, SimulationManager, SimulationResult};

mod common;
use common::{mass_grid, sorted_by_mass, CrossingModel, FailingModel};

/// Ten parameter sets, the 4th and 8th of which fail
fn batch_with_two_failures() -> Vec<ParameterSet> {
    (1..=10)
        .map(|m| {
            if m == 4 || m == 8 {
                FailingModel::failing_parameters(m as f64)
            } else {
                CrossingModel::parameters(m as f64)
            }
        })
        .collect()
}

/// Writer that refuses results above a mass threshold
struct PickyWriter {
    inner: MemoryWriter,
    max_mass: f64,
}

impl ResultsWriter for PickyWriter {
    fn write(&self, result: &SimulationResult) -> Result<(), WriteError> {
        if result.parameters.mass > self.max_mass {
            return Err(WriteError::InvalidResult(format!("mass {} refused", result.parameters.mass)));
        }
        self.inner.write(result)
    }
}

// =================================================================================================
// Fault isolation
// =================================================================================================

#[test]
fn test_failures_do_not_stop_the_batch() {
    let writer = Arc::new(MemoryWriter::new());
    let manager = SimulationManager::new(
        batch_with_two_failures(),
        Arc::new(FailingModel::new()),
        writer.clone(),
        Some(3),
    );

    let report = manager.run();

    assert_eq!(report.attempted, 10);
    assert_eq!(report.succeeded, 8);
    assert_eq!(report.failed(), 2);
    assert_eq!(writer.len(), 8);
    assert_eq!(manager.pending(), 0);

    let failed: Vec<usize> = report.sorted_failures().iter().map(|f| f.index).collect();
    assert_eq!(failed, vec![3, 7]);
    for failure in &report.failures {
        assert_eq!(failure.kind, FailureKind::Numeric);
        assert!(failure.message.contains("stiff"), "{}", failure.message);
    }
}

#[test]
fn test_panicking_tasks_are_isolated() {
    let writer = Arc::new(MemoryWriter::new());
    let manager = SimulationManager::new(
        batch_with_two_failures(),
        Arc::new(FailingModel::panicking()),
        writer.clone(),
        Some(4),
    );

    let report = manager.run();

    assert_eq!(report.attempted, 10);
    assert_eq!(report.succeeded, 8);
    assert_eq!(writer.len(), 8);
    for failure in &report.failures {
        assert_eq!(failure.kind, FailureKind::Unknown);
        assert!(failure.message.contains("refused coupling"), "{}", failure.message);
    }
}

#[test]
fn test_writer_failures_are_generic() {
    let writer = Arc::new(PickyWriter {
        inner: MemoryWriter::new(),
        max_mass: 3.0,
    });
    let manager = SimulationManager::new(mass_grid(5), CrossingModel::matter().shared(), writer.clone(), Some(2));

    let report = manager.run();

    assert_eq!(report.succeeded, 3);
    assert_eq!(writer.inner.len(), 3);
    assert!(report.failures.iter().all(|f| f.kind == FailureKind::Generic));
}

#[test]
fn test_empty_batch_returns_immediately() {
    let writer = Arc::new(MemoryWriter::new());
    let manager = SimulationManager::new(Vec::new(), CrossingModel::matter().shared(), writer.clone(), Some(4));

    let report = manager.run();

    assert_eq!(manager.total(), 0);
    assert_eq!(report.attempted, 0);
    assert!(writer.is_empty());
}

// =================================================================================================
// Determinism
// =================================================================================================

#[test]
fn test_worker_count_does_not_change_results() {
    let run = |workers: usize| {
        let writer = Arc::new(MemoryWriter::new());
        let manager = SimulationManager::new(mass_grid(12), CrossingModel::matter().shared(), writer.clone(), Some(workers));
        assert_eq!(manager.workers(), workers);

        let report = manager.run();
        assert_eq!(report.succeeded, 12);
        sorted_by_mass(writer.results())
    };

    let single = run(1);
    for workers in [2, 8] {
        assert_eq!(run(workers), single, "{workers} workers");
    }
}

#[test]
fn test_every_task_is_written_once() {
    let writer = Arc::new(MemoryWriter::new());
    let manager = SimulationManager::new(mass_grid(40), CrossingModel::matter().shared(), writer.clone(), Some(8));

    manager.run();

    let masses: HashSet<u64> = writer.results().iter().map(|r| r.parameters.mass.to_bits()).collect();
    assert_eq!(writer.len(), 40);
    assert_eq!(masses.len(), 40);
}

// =================================================================================================
// CSV output
// =================================================================================================

#[test]
fn test_batch_to_csv() {
    let dir = tempfile::tempdir().unwrap();
    let mut metadata = CsvMetadata::from_simulation("crossing mock", "brent");
    metadata.add_custom("grid".to_string(), "mass 1..10".to_string());
    let config = CsvConfig::default().with_metadata(metadata);

    let writer = Arc::new(CsvWriter::create(dir.path().join("results"), "scan.csv", config).unwrap());
    let manager = SimulationManager::new(batch_with_two_failures(), Arc::new(FailingModel::new()), writer.clone(), Some(4));
    let report = manager.run();

    let content = fs::read_to_string(writer.path()).unwrap();
    let comments = content.lines().filter(|l| l.starts_with('#')).count();
    let rows: Vec<&str> = content.lines().filter(|l| !l.starts_with('#')).collect();

    assert!(comments > 0);
    assert!(content.contains("# grid: mass 1..10"));
    assert!(rows[0].starts_with("t0,m,lambda,b,xi,G_N,continuation"));
    assert_eq!(rows.len(), 1 + report.succeeded);
    assert!(rows[1..].iter().all(|row| row.split(',').count() == 18));
    assert!(rows[1..].iter().all(|row| row.contains(",matter,")));
}

#[test]
fn test_csv_appends_across_batches() {
    let dir = tempfile::tempdir().unwrap();

    for _ in 0..2 {
        let writer = Arc::new(CsvWriter::create(dir.path(), "scan.csv", CsvConfig::default()).unwrap());
        SimulationManager::new(mass_grid(3), CrossingModel::matter().shared(), writer, Some(2)).run();
    }

    let content = fs::read_to_string(dir.path().join("scan.csv")).unwrap();
    let headers = content.lines().filter(|l| l.starts_with("t0,")).count();
    assert_eq!(headers, 1);
    assert_eq!(content.lines().count(), 1 + 6);
}
