//! Scenario runner - executes one scenario end to end.

use foodsec_core::{
    Diagnostic, History, MetricsAggregator, MetricsResult, ScenarioConfig, SectorRegistry, SimulationEngine,
    SimulationError, Horizon, PROJECTION_END,
};
use foodsec_core::metrics::FOOD_SECURITY_INDEX;
use foodsec_env::{CancelToken, DeterministicEnv, RunId, SimEnvironment, Year};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// How a run ended.
#[derive(Debug, Clone, PartialEq)]
pub enum RunStatus {
    /// Every year simulated, nothing to report
    Completed,
    
    /// Every year simulated, with clamped values or missing metric inputs
    CompletedWithWarnings,
    
    /// Aborted; the history holds the years completed before the error
    Failed(SimulationError),
}

impl RunStatus {
    /// Short machine-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RunStatus::Completed => "completed",
            RunStatus::CompletedWithWarnings => "completed_with_warnings",
            RunStatus::Failed(_) => "failed",
        }
    }
    
    /// Returns true unless the run failed.
    pub fn is_completed(&self) -> bool {
        !matches!(self, RunStatus::Failed(_))
    }
}

impl std::fmt::Display for RunStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunStatus::Failed(e) => write!(f, "failed: {}", e),
            other => write!(f, "{}", other.label()),
        }
    }
}

/// Headline final-year figures of a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub final_year: Year,
    pub population_million: f64,
    pub gdp_per_capita: f64,
    pub stunting_rate: f64,
    pub wasting_rate: f64,
    pub caloric_intake: f64,
    
    /// Mean over every snapshot, initial state included
    pub mean_rice_production_mt: f64,
    
    pub food_security_index: Option<f64>,
}

/// Everything a run produced.
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    /// Scenario name
    pub scenario: String,
    
    /// Identifier derived from the seed
    pub run_id: RunId,
    
    /// Seed used
    pub seed: u64,
    
    /// Snapshots, initial state first
    pub history: History,
    
    /// Composite indices derived from `history`
    pub metrics: MetricsResult,
    
    pub status: RunStatus,
    
    /// Non-fatal issues, clamps first then data-quality flags
    pub diagnostics: Vec<Diagnostic>,
}

impl ScenarioOutcome {
    /// The error that stopped the run, if any.
    pub fn failure(&self) -> Option<&SimulationError> {
        match &self.status {
            RunStatus::Failed(e) => Some(e),
            _ => None,
        }
    }
    
    /// Final-year headline figures; `None` if the history lacks them.
    pub fn key_metrics(&self) -> Option<KeyMetrics> {
        let last = self.history.last()?;
        let rice = self.history.series("rice_production_mt");
        if rice.is_empty() {
            return None;
        }
        let mean_rice = rice.iter().map(|(_, v)| v).sum::<f64>() / rice.len() as f64;
        
        Some(KeyMetrics {
            final_year: last.year(),
            population_million: last.get("population_million")?,
            gdp_per_capita: last.get("gdp_per_capita")?,
            stunting_rate: last.get("stunting_rate")?,
            wasting_rate: last.get("wasting_rate")?,
            caloric_intake: last.get("caloric_intake")?,
            mean_rice_production_mt: mean_rice,
            food_security_index: self.metrics.value(FOOD_SECURITY_INDEX, last.year()),
        })
    }
}

/// Runs scenarios through the simulation engine.
///
/// Holds only read-only configuration, so one runner can execute many
/// scenarios concurrently.
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    /// Sectors to simulate
    registry: SectorRegistry,
    
    /// Last simulated year
    final_year: Year,
    
    /// Mixed into every scenario seed
    master_seed: u64,
    
    /// Shared with every run started by this runner
    cancel: CancelToken,
    
    aggregator: MetricsAggregator,
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl ScenarioRunner {
    /// Creates a runner over the standard sectors through 2035.
    pub fn new() -> Self {
        Self {
            registry: SectorRegistry::standard(),
            final_year: PROJECTION_END,
            master_seed: 0,
            cancel: CancelToken::new(),
            aggregator: MetricsAggregator::default(),
        }
    }
    
    /// Sets the sector registry.
    pub fn with_registry(mut self, registry: SectorRegistry) -> Self {
        self.registry = registry;
        self
    }
    
    /// Sets the last simulated year.
    pub fn with_final_year(mut self, year: Year) -> Self {
        self.final_year = year;
        self
    }
    
    /// Sets the master seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.master_seed = seed;
        self
    }
    
    /// Shares a caller-owned cancellation token with every run.
    ///
    /// The token is runner-wide: once cancelled, every later [`execute`]
    /// call on this runner stops before its first year. Use
    /// [`execute_with_cancel`] to stop a single run.
    ///
    /// [`execute`]: Self::execute
    /// [`execute_with_cancel`]: Self::execute_with_cancel
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }
    
    /// Sets the metrics aggregator.
    pub fn with_aggregator(mut self, aggregator: MetricsAggregator) -> Self {
        self.aggregator = aggregator;
        self
    }
    
    /// Handle on the runner-wide token. Cancelling it is sticky and affects
    /// in-flight and future runs alike.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }
    
    /// Runs `scenario` from its initial year through the final year,
    /// observing the runner-wide cancellation token.
    pub fn execute(&self, scenario: &ScenarioConfig) -> ScenarioOutcome {
        self.execute_with_cancel(scenario, &self.cancel)
    }
    
    /// Like [`execute`](Self::execute) but stopped by `cancel` only, leaving
    /// the runner usable for later runs.
    pub fn execute_with_cancel(&self, scenario: &ScenarioConfig, cancel: &CancelToken) -> ScenarioOutcome {
        let env = DeterministicEnv::for_scenario(&scenario.name, self.master_seed).with_cancel_token(cancel.clone());
        info!("Starting scenario: {} (seed={})", scenario.name, env.seed());
        
        let horizon = Horizon::following(scenario.initial_year(), self.final_year);
        let run = match SimulationEngine::from_registry(&self.registry) {
            Ok(engine) => engine.run(scenario, horizon, &env),
            Err(e) => foodsec_core::EngineRun {
                history: History::new(scenario.initial_state.clone()),
                warnings: Vec::new(),
                failure: Some(e.into()),
            },
        };
        
        let metrics = self.aggregator.aggregate(&run.history);
        let diagnostics: Vec<Diagnostic> = run
            .warnings
            .into_iter()
            .map(Diagnostic::SanityBound)
            .chain(metrics.data_quality.iter().cloned().map(Diagnostic::DataQuality))
            .collect();
        
        let status = match run.failure {
            Some(e) => RunStatus::Failed(e),
            None if diagnostics.is_empty() => RunStatus::Completed,
            None => RunStatus::CompletedWithWarnings,
        };
        
        match &status {
            RunStatus::Failed(e) => warn!("✗ {} failed after {} snapshot(s): {}", scenario.name, run.history.len(), e),
            _ => info!("✓ {} {} ({} diagnostic(s))", scenario.name, status.label(), diagnostics.len()),
        }
        
        ScenarioOutcome {
            scenario: scenario.name.clone(),
            run_id: env.run_id(),
            seed: env.seed(),
            history: run.history,
            metrics,
            status,
            diagnostics,
        }
    }
}
