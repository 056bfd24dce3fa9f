//! Parallel execution of independent scenarios.
//!
//! Scenarios share only read-only configuration, so they run on a bounded
//! rayon pool. Results come back in input order regardless of which worker
//! finished first.

use crate::error::RunnerError;
use crate::runner::{ScenarioOutcome, ScenarioRunner};
use crate::scenarios::ScenarioId;
use foodsec_core::ScenarioConfig;
use rayon::prelude::*;
use std::collections::BTreeSet;
use tracing::info;

/// Runs many scenarios concurrently with one [`ScenarioRunner`].
#[derive(Debug, Clone, Default)]
pub struct BatchRunner {
    runner: ScenarioRunner,
    
    /// Worker threads; `None` sizes the pool to available cores
    workers: Option<usize>,
}

impl BatchRunner {
    pub fn new(runner: ScenarioRunner) -> Self {
        Self { runner, workers: None }
    }
    
    /// Caps the number of worker threads.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers.max(1));
        self
    }
    
    pub fn runner(&self) -> &ScenarioRunner {
        &self.runner
    }
    
    /// Executes every scenario; outcomes are in input order.
    ///
    /// Names must be unique so results can be compared by name.
    pub fn run(&self, scenarios: &[ScenarioConfig]) -> Result<Vec<ScenarioOutcome>, RunnerError> {
        let mut seen = BTreeSet::new();
        for scenario in scenarios {
            if !seen.insert(scenario.name.as_str()) {
                return Err(RunnerError::DuplicateScenario(scenario.name.clone()));
            }
        }
        
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers.unwrap_or(0))
            .build()?;
        info!("Running {} scenario(s) on {} worker(s)", scenarios.len(), pool.current_num_threads());
        
        let outcomes = pool.install(|| {
            scenarios
                .par_iter()
                .map(|scenario| self.runner.execute(scenario))
                .collect::<Vec<_>>()
        });
        
        let failed = outcomes.iter().filter(|o| !o.status.is_completed()).count();
        info!("✓ Batch finished: {} completed, {} failed", outcomes.len() - failed, failed);
        Ok(outcomes)
    }
    
    /// Executes library scenarios by id.
    pub fn run_library(&self, ids: &[ScenarioId]) -> Result<Vec<ScenarioOutcome>, RunnerError> {
        let configs: Vec<ScenarioConfig> = ids.iter().map(ScenarioId::config).collect();
        self.run(&configs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_parallel_matches_sequential_in_input_order() {
        let ids = ScenarioId::all();
        let batch = BatchRunner::default().with_workers(3);
        
        let parallel = batch.run_library(&ids).unwrap();
        
        assert_eq!(parallel.len(), ids.len());
        for (id, outcome) in ids.iter().zip(&parallel) {
            assert_eq!(outcome.scenario, id.name());
            let sequential = batch.runner().execute(&id.config());
            assert_eq!(outcome.history, sequential.history);
            assert_eq!(outcome.metrics, sequential.metrics);
        }
    }
    
    #[test]
    fn test_duplicate_names_rejected() {
        let baseline = ScenarioId::Baseline.config();
        let err = BatchRunner::default()
            .run(&[baseline.clone(), baseline])
            .unwrap_err();
        assert!(matches!(err, RunnerError::DuplicateScenario(name) if name == "baseline"));
    }
}
