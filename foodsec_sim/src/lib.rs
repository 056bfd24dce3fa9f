//! FoodSec Scenario Harness
//!
//! Runs food-security scenarios end to end and compares them:
//!
//! ```text
//! ScenarioId ──config()──► ScenarioConfig
//!                               │
//!                     ScenarioRunner::execute ──► ScenarioOutcome
//!                               │                 (history, metrics, status, diagnostics)
//!                     BatchRunner (rayon pool)
//!                               │
//!              ScenarioComparison / ScenarioExport (JSON)
//! ```
//!
//! Every run gets its own seed derived from the scenario name, so a batch
//! produces the same results whatever the worker count or scheduling.
//!
//! # Usage
//!
//! ```ignore
//! use foodsec_sim::{BatchRunner, ScenarioComparison, ScenarioId, ScenarioRunner};
//!
//! let batch = BatchRunner::new(ScenarioRunner::new().with_final_year(2035));
//! let outcomes = batch.run_library(&ScenarioId::all())?;
//! let comparison = ScenarioComparison::build(&outcomes, "baseline")?;
//! ```

pub mod batch;
pub mod comparison;
pub mod error;
pub mod exporter;
pub mod runner;
pub mod scenarios;

pub use batch::BatchRunner;
pub use comparison::{ScenarioComparison, ScenarioSummary};
pub use error::RunnerError;
pub use exporter::{BatchExport, JsonExport, ScenarioExport};
pub use runner::{KeyMetrics, RunStatus, ScenarioOutcome, ScenarioRunner};
pub use scenarios::ScenarioId;
