//! Fault-isolating worker pool
//!
//! # Architecture
//!
//! ```text
//!              ┌──────────────────────────────┐
//!              │ Mutex<VecDeque<Task>>        │  FIFO, popped exactly once
//!              │ Condvar  +  AtomicBool stop  │
//!              └──────┬───────┬───────┬───────┘
//!                     │       │       │
//!                 worker 0 worker 1 … worker N-1     (scoped threads)
//!                     │       │       │
//!                Simulation::run  (catch_unwind)
//!                     │       │       │
//!              ┌──────▼───────▼───────▼───────┐
//!              │ ResultsWriter (Send + Sync)  │
//!              └──────────────────────────────┘
//! ```
//!
//! Every task is attempted exactly once. A failing task (error, writer
//! failure or panic) is logged with its parameters, recorded in the
//! [`BatchReport`], and the worker moves on to the next task.

use std::any::Any;
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread;

use crate::output::export::ResultsWriter;
use crate::physics::ParameterSet;
use crate::simulation::config::SimulationConfiguration;
use crate::simulation::error::FailureKind;
use crate::simulation::pipeline::Simulation;
use crate::simulation::supplier::DensitySupplier;

/// One queued parameter set
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Task {
    /// Position in the submitted list
    pub index: usize,
    pub parameters: ParameterSet,
}

/// A task that did not produce a written result
#[derive(Debug, Clone, PartialEq)]
pub struct TaskFailure {
    pub index: usize,
    pub parameters: ParameterSet,
    pub kind: FailureKind,
    pub message: String,
}

/// Outcome of [`SimulationManager::run`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// Tasks taken from the queue
    pub attempted: usize,

    /// Tasks whose result was written
    pub succeeded: usize,

    /// Every failed task, in completion order
    pub failures: Vec<TaskFailure>,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Failures sorted by task index
    pub fn sorted_failures(&self) -> Vec<&TaskFailure> {
        let mut failures: Vec<&TaskFailure> = self.failures.iter().collect();
        failures.sort_by_key(|failure| failure.index);
        failures
    }
}

/// Runs many simulations concurrently
///
/// # Example
///
/// ```rust,ignore
/// let manager = SimulationManager::new(grid, Arc::new(PowerLawModel::default()), writer, Some(4));
/// let report = manager.run();
/// assert_eq!(report.attempted, grid_len);
/// ```
pub struct SimulationManager {
    queue: Mutex<VecDeque<Task>>,
    available: Condvar,
    stop: AtomicBool,
    supplier: Arc<dyn DensitySupplier>,
    writer: Arc<dyn ResultsWriter>,
    configuration: SimulationConfiguration,
    workers: usize,
    total: usize,
}

impl SimulationManager {
    /// Queue `parameters` for `workers` threads
    ///
    /// `None` uses the available parallelism of the machine. The worker count
    /// is at least 1.
    pub fn new(
        parameters: Vec<ParameterSet>,
        supplier: Arc<dyn DensitySupplier>,
        writer: Arc<dyn ResultsWriter>,
        workers: Option<usize>,
    ) -> Self {
        let workers = workers
            .unwrap_or_else(|| thread::available_parallelism().map_or(1, NonZeroUsize::get))
            .max(1);

        let queue: VecDeque<Task> = parameters
            .into_iter()
            .enumerate()
            .map(|(index, parameters)| Task { index, parameters })
            .collect();
        let total = queue.len();

        Self {
            queue: Mutex::new(queue),
            available: Condvar::new(),
            stop: AtomicBool::new(false),
            supplier,
            writer,
            configuration: SimulationConfiguration::default(),
            workers,
            total,
        }
    }

    /// Replace the numerical configuration of every task
    pub fn with_configuration(mut self, configuration: SimulationConfiguration) -> Self {
        self.configuration = configuration;
        self
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Number of submitted tasks
    pub fn total(&self) -> usize {
        self.total
    }

    /// Tasks still waiting in the queue
    pub fn pending(&self) -> usize {
        self.lock_queue().len()
    }

    /// Run every queued task and block until all were attempted
    pub fn run(&self) -> BatchReport {
        let report = Mutex::new(BatchReport::default());

        if self.lock_queue().is_empty() {
            self.stop.store(true, Ordering::SeqCst);
        }

        log::info!(
            "Running {} simulations on {} workers ({})",
            self.total,
            self.workers,
            self.supplier.name()
        );

        thread::scope(|scope| {
            for worker in 0..self.workers {
                let report = &report;
                scope.spawn(move || self.work(worker, report));
            }
        });

        let report = report.into_inner().unwrap_or_else(PoisonError::into_inner);
        log::info!(
            "Batch finished: {} attempted, {} succeeded, {} failed",
            report.attempted,
            report.succeeded,
            report.failed()
        );
        report
    }

    // =============================================================================================
    // Worker
    // =============================================================================================

    fn work(&self, worker: usize, report: &Mutex<BatchReport>) {
        while let Some(task) = self.next_task() {
            log::debug!("Worker {} picked task {}", worker, task.index);
            let outcome = self.execute(&task);

            let mut report = report.lock().unwrap_or_else(PoisonError::into_inner);
            report.attempted += 1;
            match outcome {
                Ok(()) => {
                    report.succeeded += 1;
                    log::info!("Task {} completed ({})", task.index, task.parameters);
                }
                Err(failure) => {
                    log::error!(
                        "Task {} failed [{:?}]: {} with parameters {}",
                        failure.index,
                        failure.kind,
                        failure.message,
                        failure.parameters
                    );
                    report.failures.push(failure);
                }
            }
        }
        log::debug!("Worker {} stopped", worker);
    }

    /// Block until a task is available or the queue is drained
    fn next_task(&self) -> Option<Task> {
        let mut queue = self
            .available
            .wait_while(self.lock_queue(), |queue| {
                queue.is_empty() && !self.stop.load(Ordering::SeqCst)
            })
            .unwrap_or_else(PoisonError::into_inner);

        let task = queue.pop_front()?;
        if queue.is_empty() && !self.stop.swap(true, Ordering::SeqCst) {
            self.available.notify_all();
        }
        Some(task)
    }

    /// Run one task in isolation
    fn execute(&self, task: &Task) -> Result<(), TaskFailure> {
        let failure = |kind: FailureKind, message: String| TaskFailure {
            index: task.index,
            parameters: task.parameters,
            kind,
            message,
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let simulation = Simulation::new(task.parameters, &*self.supplier, &self.configuration);
            let result = simulation
                .run()
                .map_err(|error| (error.kind(), error.to_string()))?;
            self.writer
                .write(&result)
                .map_err(|error| (FailureKind::Generic, error.to_string()))
        }));

        match outcome {
            Ok(Ok(())) => Ok(()),
            Ok(Err((kind, message))) => Err(failure(kind, message)),
            Err(payload) => Err(failure(FailureKind::Unknown, panic_message(payload.as_ref()))),
        }
    }

    fn lock_queue(&self) -> MutexGuard<'_, VecDeque<Task>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Text of a panic payload
fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("panicked: {message}")
    } else {
        "panicked with a non-string payload".to_string()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
