//! The year loop.
//!
//! ```text
//! for year in horizon:
//!   1. stop if cancelled
//!   2. apply active interventions (declaration order) to a fresh copy of
//!      the coefficients and to the previous snapshot; persistent Scale/Add
//!      on an indicator builds on its value from before the effective year
//!   3. call each sector in plan order
//!   4. merge outputs: reject conflicts, undeclared writes and non-finite
//!      values; quantize; clamp to sanity bounds with a warning
//!   5. require the full schema, append the snapshot
//! ```
//!
//! Any fatal error stops the loop. The snapshots completed before it are
//! always returned alongside the error.

use crate::diagnostics::SanityBoundWarning;
use crate::error::{ConfigurationError, SimulationError};
use crate::intervention::{Adjustment, Intervention, InterventionTarget, Persistence};
use crate::precision::quantize_indicator;
use crate::registry::{SectorPlan, SectorRegistry};
use crate::scenario::{Horizon, ScenarioConfig};
use crate::sector::{DeclaredReads, SectorInputs};
use crate::state::{History, IndicatorMap, StateSnapshot};
use foodsec_env::{scenario_seed, SimEnvironment, Year};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// Sector name → coefficient name → value.
type CoefficientTable = BTreeMap<String, BTreeMap<String, f64>>;

/// Outcome of one engine run. `failure` is `None` when every year completed.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineRun {
    /// Initial snapshot plus every completed year
    pub history: History,
    
    /// Values clamped to their sanity bounds
    pub warnings: Vec<SanityBoundWarning>,
    
    /// Fatal error that stopped the loop
    pub failure: Option<SimulationError>,
}

impl EngineRun {
    /// Returns true if every requested year was simulated.
    pub fn is_complete(&self) -> bool {
        self.failure.is_none()
    }
}

/// Advances a scenario year by year through a validated sector plan.
#[derive(Debug, Clone)]
pub struct SimulationEngine {
    plan: SectorPlan,
}

impl SimulationEngine {
    /// Creates an engine for a validated plan.
    pub fn new(plan: SectorPlan) -> Self {
        Self { plan }
    }
    
    /// Validates the registry and creates an engine.
    pub fn from_registry(registry: &SectorRegistry) -> Result<Self, ConfigurationError> {
        Ok(Self::new(registry.build()?))
    }
    
    /// Engine over the seven standard sectors.
    pub fn standard() -> Result<Self, ConfigurationError> {
        Self::from_registry(&SectorRegistry::standard())
    }
    
    pub fn plan(&self) -> &SectorPlan {
        &self.plan
    }
    
    /// Checks a scenario and horizon against the plan without running.
    pub fn validate(&self, scenario: &ScenarioConfig, horizon: Horizon) -> Result<(), ConfigurationError> {
        let initial = &scenario.initial_state;
        
        for indicator in self.plan.indicators() {
            if !initial.contains(indicator) {
                return Err(ConfigurationError::MissingInitialIndicator {
                    indicator: indicator.to_string(),
                });
            }
        }
        for (indicator, value) in initial.indicators() {
            if self.plan.owner(indicator).is_none() {
                return Err(ConfigurationError::UnknownInitialIndicator {
                    indicator: indicator.to_string(),
                });
            }
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteInitialValue {
                    indicator: indicator.to_string(),
                    value,
                });
            }
        }
        
        for (sector, name, value) in scenario.coefficients.iter() {
            if !self.plan.has_coefficient(sector, name) {
                return Err(ConfigurationError::UnknownCoefficient {
                    sector: sector.to_string(),
                    name: name.to_string(),
                });
            }
            if !value.is_finite() {
                return Err(ConfigurationError::NonFiniteCoefficient {
                    sector: sector.to_string(),
                    name: name.to_string(),
                    value,
                });
            }
        }
        
        for intervention in &scenario.interventions {
            let known = match &intervention.target {
                InterventionTarget::Coefficient { sector, name } => self.plan.has_coefficient(sector, name),
                InterventionTarget::Indicator(name) => self.plan.owner(name).is_some(),
            };
            if !known {
                return Err(ConfigurationError::UnknownInterventionTarget {
                    label: intervention.label.clone(),
                    target: intervention.target.to_string(),
                });
            }
            // Overrides reach sectors only through lagged reads.
            if let InterventionTarget::Indicator(name) = &intervention.target {
                if !self.plan.is_read_lagged(name) {
                    return Err(ConfigurationError::IneffectiveOverride {
                        label: intervention.label.clone(),
                        indicator: name.clone(),
                    });
                }
            }
            if !intervention.adjustment.operand().is_finite() {
                return Err(ConfigurationError::NonFiniteIntervention {
                    label: intervention.label.clone(),
                });
            }
        }
        
        if horizon.first != initial.year() + 1 || horizon.last < initial.year() {
            return Err(ConfigurationError::HorizonMismatch {
                initial_year: initial.year(),
                first: horizon.first,
                last: horizon.last,
            });
        }
        
        Ok(())
    }
    
    /// Runs `scenario` over `horizon`.
    ///
    /// Configuration problems are reported before any year is simulated,
    /// with a history holding only the initial snapshot.
    pub fn run(&self, scenario: &ScenarioConfig, horizon: Horizon, env: &dyn SimEnvironment) -> EngineRun {
        let mut history = History::new(scenario.initial_state.clone());
        let mut warnings = Vec::new();
        
        if let Err(e) = self.validate(scenario, horizon) {
            warn!(scenario = %scenario.name, error = %e, "Scenario rejected");
            return EngineRun {
                history,
                warnings,
                failure: Some(e.into()),
            };
        }
        
        let coefficients = self.resolve_coefficients(scenario);
        info!(
            scenario = %scenario.name,
            first = horizon.first,
            last = horizon.last,
            sectors = self.plan.sectors().len(),
            "Starting simulation"
        );
        
        let mut failure = None;
        for year in horizon.years() {
            if env.is_cancelled() {
                info!(scenario = %scenario.name, next_year = year, "Run cancelled");
                failure = Some(SimulationError::Cancelled { next_year: year });
                break;
            }
            
            match self.step(scenario, &coefficients, &history, year, env, &mut warnings) {
                Ok(snapshot) => {
                    debug!(year, indicators = snapshot.len(), "Year merged");
                    history.push(snapshot);
                }
                Err(e) => {
                    warn!(scenario = %scenario.name, year, error = %e, "Simulation aborted");
                    failure = Some(e);
                    break;
                }
            }
        }
        
        if failure.is_none() {
            info!(
                "✓ {} simulated {} year(s), {} value(s) clamped",
                scenario.name,
                history.len() - 1,
                warnings.len()
            );
        }
        
        EngineRun {
            history,
            warnings,
            failure,
        }
    }
    
    /// Sector defaults overlaid with the scenario's coefficients.
    fn resolve_coefficients(&self, scenario: &ScenarioConfig) -> CoefficientTable {
        let mut table = self.plan.default_coefficients().clone();
        for (sector, name, value) in scenario.coefficients.iter() {
            if let Some(slot) = table.get_mut(sector).and_then(|c| c.get_mut(name)) {
                *slot = value;
            }
        }
        table
    }
    
    /// Computes one year from the latest finalized snapshot in `history`.
    fn step(
        &self,
        scenario: &ScenarioConfig,
        coefficients: &CoefficientTable,
        history: &History,
        year: Year,
        env: &dyn SimEnvironment,
        warnings: &mut Vec<SanityBoundWarning>,
    ) -> Result<StateSnapshot, SimulationError> {
        let previous = history.last().unwrap_or(&scenario.initial_state);
        let active = scenario.active_interventions(year);
        let (coefficients, inputs_snapshot) = apply_interventions(&active, coefficients, history, previous, year)?;
        
        let empty = BTreeMap::new();
        let no_reads = DeclaredReads::default();
        let mut merged = IndicatorMap::new();
        let mut writers: BTreeMap<String, String> = BTreeMap::new();
        
        for sector in self.plan.sectors() {
            let name = sector.name();
            let seed = env.year_seed(year, scenario_seed(name, 0));
            let sector_coefficients = coefficients.get(name).unwrap_or(&empty);
            let reads = self.plan.declared_reads(name).unwrap_or(&no_reads);
            let inputs = SectorInputs::new(
                year,
                reads,
                &inputs_snapshot,
                &merged,
                sector_coefficients,
                &active,
                seed,
            );
            
            let update = sector.update(&inputs).map_err(|source| SimulationError::Sector {
                year,
                sector: name.to_string(),
                source,
            })?;
            
            for (indicator, value) in update {
                if let Some(first) = writers.get(&indicator) {
                    return Err(SimulationError::MergeConflict {
                        year,
                        indicator,
                        first: first.clone(),
                        second: name.to_string(),
                    });
                }
                let owner = match self.plan.owner(&indicator) {
                    Some(owner) if owner.sector == name => owner,
                    _ => {
                        return Err(SimulationError::UndeclaredWrite {
                            year,
                            sector: name.to_string(),
                            indicator,
                        })
                    }
                };
                if !value.is_finite() {
                    return Err(SimulationError::NumericInvalid {
                        year,
                        sector: name.to_string(),
                        indicator,
                        value,
                    });
                }
                
                let mut stored = quantize_indicator(value);
                if let Some((min, max)) = owner.bounds {
                    if stored < min || stored > max {
                        let clamped = stored.clamp(min, max);
                        warn!(year, sector = name, %indicator, value, clamped, "Value outside sanity bound");
                        warnings.push(SanityBoundWarning {
                            year,
                            sector: name.to_string(),
                            indicator: indicator.clone(),
                            value,
                            clamped_to: clamped,
                            min,
                            max,
                        });
                        stored = clamped;
                    }
                }
                
                writers.insert(indicator.clone(), name.to_string());
                merged.insert(indicator, stored);
            }
        }
        
        if let Some(missing) = self.plan.indicators().find(|i| !merged.contains_key(*i)) {
            return Err(SimulationError::MissingIndicator {
                year,
                indicator: missing.to_string(),
            });
        }
        
        Ok(StateSnapshot::new(year, merged))
    }
}

/// Applies interventions in declaration order.
///
/// Returns this year's coefficient table and the previous snapshot with
/// indicator overrides applied. A later intervention on the same target sees
/// the value left by an earlier one.
fn apply_interventions(
    active: &[&Intervention],
    coefficients: &CoefficientTable,
    history: &History,
    previous: &StateSnapshot,
    year: Year,
) -> Result<(CoefficientTable, StateSnapshot), SimulationError> {
    let mut coefficients = coefficients.clone();
    let mut overrides = IndicatorMap::new();
    
    for intervention in active {
        let applied = match &intervention.target {
            InterventionTarget::Coefficient { sector, name } => {
                match coefficients.get_mut(sector).and_then(|c| c.get_mut(name)) {
                    Some(slot) => {
                        *slot = intervention.adjustment.apply(*slot);
                        Some(*slot)
                    }
                    None => None,
                }
            }
            InterventionTarget::Indicator(name) => {
                let base = overrides
                    .get(name)
                    .copied()
                    .or_else(|| indicator_base(intervention, name, history, previous));
                base.map(|base| {
                    let value = intervention.adjustment.apply(base);
                    overrides.insert(name.clone(), value);
                    value
                })
            }
        };
        
        if let Some(value) = applied {
            if !value.is_finite() {
                return Err(SimulationError::NumericInvalid {
                    year,
                    sector: format!("intervention '{}'", intervention.label),
                    indicator: intervention.target.to_string(),
                    value,
                });
            }
            debug!(year, label = %intervention.label, value, "Intervention applied");
        }
    }
    
    let snapshot = if overrides.is_empty() {
        previous.clone()
    } else {
        previous.with_values(overrides)
    };
    Ok((coefficients, snapshot))
}

/// Value an indicator adjustment starts from when no earlier intervention
/// touched the target this year.
///
/// A persistent Scale or Add is anchored to the indicator as it stood the
/// year before it took effect, so it shifts the level once instead of
/// compounding on its own output.
fn indicator_base(
    intervention: &Intervention,
    name: &str,
    history: &History,
    previous: &StateSnapshot,
) -> Option<f64> {
    let relative = !matches!(intervention.adjustment, Adjustment::Set(_));
    if relative && intervention.persistence == Persistence::Persistent {
        let initial_year = history.first().map_or(previous.year(), StateSnapshot::year);
        let anchor_year = (intervention.effective_year - 1).max(initial_year);
        if let Some(value) = history.at_year(anchor_year).and_then(|s| s.get(name)) {
            return Some(value);
        }
    }
    previous.get(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::{baseline_initial_state, BASELINE_YEAR, PROJECTION_END};
    use crate::error::SectorError;
    use crate::registry::Placement;
    use crate::sector::{IndicatorSpec, SectorModel};
    use crate::sectors;
    use approx::assert_relative_eq;
    use foodsec_env::{CancelToken, DeterministicEnv};
    use std::sync::Arc;
    
    fn full_horizon() -> Horizon {
        Horizon::following(BASELINE_YEAR, PROJECTION_END)
    }
    
    fn baseline() -> ScenarioConfig {
        ScenarioConfig::new("baseline", baseline_initial_state())
    }
    
    fn env() -> DeterministicEnv {
        DeterministicEnv::for_scenario("baseline", 0)
    }
    
    fn run(scenario: &ScenarioConfig) -> EngineRun {
        SimulationEngine::standard().unwrap().run(scenario, full_horizon(), &env())
    }
    
    /// Writes a fixed value into one indicator, replacing the owner's output.
    struct Fixed {
        name: &'static str,
        indicator: &'static str,
        value: f64,
        declare: bool,
    }
    
    impl SectorModel for Fixed {
        fn name(&self) -> &str {
            self.name
        }
        
        fn writes(&self) -> Vec<IndicatorSpec> {
            if self.declare {
                vec![IndicatorSpec::bounded(self.indicator, 0.0, 1.0)]
            } else {
                Vec::new()
            }
        }
        
        fn update(&self, _inputs: &SectorInputs<'_>) -> Result<IndicatorMap, SectorError> {
            Ok(sectors::outputs([(self.indicator, self.value)]))
        }
    }
    
    /// Standard sectors plus one extra sector writing an indicator of its own.
    fn engine_with_extra(value: f64) -> (SimulationEngine, ScenarioConfig) {
        let registry = SectorRegistry::standard().with_sector(
            Arc::new(Fixed {
                name: "gauge",
                indicator: "gauge_index",
                value,
                declare: true,
            }),
            Placement::after("nutrition"),
        );
        let scenario = baseline().with_initial_value("gauge_index", 0.5);
        (SimulationEngine::from_registry(&registry).unwrap(), scenario)
    }
    
    #[test]
    fn test_baseline_completes_with_consecutive_years() {
        let result = run(&baseline());
        
        assert!(result.is_complete(), "{:?}", result.failure);
        assert_eq!(result.history.len(), 11);
        for pair in result.history.snapshots().windows(2) {
            assert_eq!(pair[0].year() + 1, pair[1].year());
        }
    }
    
    #[test]
    fn test_every_snapshot_has_exact_schema() {
        let engine = SimulationEngine::standard().unwrap();
        let result = engine.run(&baseline(), full_horizon(), &env());
        let schema: Vec<&str> = engine.plan().indicators().collect();
        
        for snapshot in result.history.snapshots() {
            let names: Vec<&str> = snapshot.names().collect();
            assert_eq!(names, schema, "year {}", snapshot.year());
            assert!(snapshot.indicators().all(|(_, v)| v.is_finite()));
        }
    }
    
    #[test]
    fn test_first_year_rice_yield_follows_growth_trend() {
        let result = run(&baseline());
        let y2026 = result.history.at_year(2026).unwrap();
        let stress = y2026.get("climate_stress_index").unwrap();
        
        // growth = 0.01 + 0.005*0.7 + 0.02*0.1 + 0.1*(1 - 1) - 0.01*0.35 = 0.012
        let expected = 100.0 * 1.012 * (1.0 - 0.4 * (stress - 0.08));
        assert_relative_eq!(y2026.get("crop_yield_rice").unwrap(), expected, epsilon = 1e-8);
        assert_relative_eq!(stress, 0.086592, epsilon = 1e-9);
        assert_relative_eq!(y2026.get("crop_yield_rice").unwrap(), 100.93315584, epsilon = 1e-8);
    }
    
    #[test]
    fn test_persistent_subsidy_intervention() {
        let scenario = baseline().with_intervention(Intervention::set_indicator(2027, "policy_subsidy_level", 0.5));
        let result = run(&scenario);
        assert!(result.is_complete());
        
        for snapshot in result.history.snapshots() {
            let subsidy = snapshot.get("policy_subsidy_level").unwrap();
            if snapshot.year() < 2027 {
                assert_eq!(subsidy, 0.1, "year {}", snapshot.year());
            } else {
                assert_eq!(subsidy, 0.5, "year {}", snapshot.year());
            }
        }
    }
    
    #[test]
    fn test_later_intervention_overrides_earlier_one() {
        let scenario = baseline()
            .with_intervention(Intervention::set_indicator(2027, "policy_subsidy_level", 0.5))
            .with_intervention(Intervention::set_indicator(2031, "policy_subsidy_level", 0.3));
        let result = run(&scenario);
        
        let subsidy = |y| result.history.at_year(y).unwrap().get("policy_subsidy_level").unwrap();
        assert_eq!(subsidy(2030), 0.5);
        assert_eq!(subsidy(2031), 0.3);
        assert_eq!(subsidy(2035), 0.3);
    }
    
    #[test]
    fn test_one_shot_shock_applies_in_its_year_only() {
        let scenario = baseline().with_intervention(
            Intervention::set_coefficient(2028, "climate", "shock_magnitude", 0.6).one_shot(),
        );
        let result = run(&scenario);
        
        let shock = |y| result.history.at_year(y).unwrap().get("climate_shock_index").unwrap();
        assert_eq!(shock(2027), 0.0);
        assert_eq!(shock(2028), 0.6);
        assert_eq!(shock(2029), 0.0);
        
        let count = |y| result.history.at_year(y).unwrap().get("policy_active_interventions").unwrap();
        assert_eq!(count(2028), 1.0);
        assert_eq!(count(2029), 0.0);
    }
    
    #[test]
    fn test_scale_and_add_compose_in_declaration_order() {
        use crate::intervention::Adjustment;
        let target = InterventionTarget::Indicator("safety_net_coverage".into());
        let scenario = baseline()
            .with_intervention(Intervention::new(2026, target.clone(), Adjustment::Scale(2.0)).one_shot())
            .with_intervention(Intervention::new(2026, target, Adjustment::Add(0.1)).one_shot());
        let result = run(&scenario);
        
        let coverage = result.history.at_year(2026).unwrap().get("safety_net_coverage").unwrap();
        assert_relative_eq!(coverage, 0.2 * 2.0 + 0.1, epsilon = 1e-9);
    }
    
    #[test]
    fn test_persistent_add_shifts_level_once() {
        use crate::intervention::Adjustment;
        let target = InterventionTarget::Indicator("safety_net_coverage".into());
        let scenario = baseline().with_intervention(Intervention::new(2027, target, Adjustment::Add(0.1)));
        let result = run(&scenario);
        assert!(result.is_complete());
        
        let coverage = |y| result.history.at_year(y).unwrap().get("safety_net_coverage").unwrap();
        assert_relative_eq!(coverage(2026), 0.2, epsilon = 1e-9);
        for year in 2027..=PROJECTION_END {
            assert_relative_eq!(coverage(year), 0.3, epsilon = 1e-9);
        }
        assert!(result.warnings.iter().all(|w| w.indicator != "safety_net_coverage"));
    }
    
    #[test]
    fn test_persistent_scale_after_set_uses_set_level() {
        use crate::intervention::Adjustment;
        let target = InterventionTarget::Indicator("policy_subsidy_level".into());
        let scenario = baseline()
            .with_intervention(Intervention::set_indicator(2027, "policy_subsidy_level", 0.2))
            .with_intervention(Intervention::new(2030, target, Adjustment::Scale(1.5)));
        let result = run(&scenario);
        
        let subsidy = |y| result.history.at_year(y).unwrap().get("policy_subsidy_level").unwrap();
        assert_relative_eq!(subsidy(2029), 0.2, epsilon = 1e-9);
        assert_relative_eq!(subsidy(2030), 0.3, epsilon = 1e-9);
        assert_relative_eq!(subsidy(2035), 0.3, epsilon = 1e-9);
    }
    
    #[test]
    fn test_out_of_bound_value_is_clamped_with_warning() {
        let (engine, scenario) = engine_with_extra(1.7);
        let result = engine.run(&scenario, full_horizon(), &env());
        
        assert!(result.is_complete());
        let gauge: Vec<&SanityBoundWarning> = result.warnings.iter().filter(|w| w.sector == "gauge").collect();
        assert_eq!(gauge.len(), 10);
        let w = gauge[0];
        assert_eq!((w.year, w.sector.as_str(), w.indicator.as_str()), (2026, "gauge", "gauge_index"));
        assert_eq!(w.value, 1.7);
        assert_eq!(w.clamped_to, 1.0);
        assert_eq!(result.history.at_year(2026).unwrap().get("gauge_index"), Some(1.0));
    }
    
    #[test]
    fn test_non_finite_output_keeps_partial_history() {
        let (engine, scenario) = engine_with_extra(f64::NAN);
        let result = engine.run(&scenario, full_horizon(), &env());
        
        assert_eq!(result.history.len(), 1);
        match result.failure {
            Some(SimulationError::NumericInvalid { year, sector, indicator, .. }) => {
                assert_eq!(year, 2026);
                assert_eq!(sector, "gauge");
                assert_eq!(indicator, "gauge_index");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
    
    #[test]
    fn test_undeclared_runtime_write_is_fatal() {
        let registry = SectorRegistry::standard().with_sector(
            Arc::new(Fixed {
                name: "rogue",
                indicator: "ghost_index",
                value: 1.0,
                declare: false,
            }),
            Placement::after("nutrition"),
        );
        let engine = SimulationEngine::from_registry(&registry).unwrap();
        let result = engine.run(&baseline(), full_horizon(), &env());
        
        assert_eq!(result.history.len(), 1);
        assert_eq!(
            result.failure,
            Some(SimulationError::UndeclaredWrite {
                year: 2026,
                sector: "rogue".into(),
                indicator: "ghost_index".into(),
            })
        );
    }
    
    /// Writes its own indicator but peeks at a value it never declared.
    struct Peeker;
    
    impl SectorModel for Peeker {
        fn name(&self) -> &str {
            "peeker"
        }
        
        fn writes(&self) -> Vec<IndicatorSpec> {
            vec![IndicatorSpec::unbounded("peek_index")]
        }
        
        fn update(&self, inputs: &SectorInputs<'_>) -> Result<IndicatorMap, SectorError> {
            let price = inputs.now("market_price_index")?;
            Ok(sectors::outputs([("peek_index", price)]))
        }
    }
    
    #[test]
    fn test_undeclared_read_is_fatal() {
        let registry = SectorRegistry::standard().with_sector(Arc::new(Peeker), Placement::after("nutrition"));
        let engine = SimulationEngine::from_registry(&registry).unwrap();
        let scenario = baseline().with_initial_value("peek_index", 1.0);
        let result = engine.run(&scenario, full_horizon(), &env());
        
        assert_eq!(result.history.len(), 1);
        assert_eq!(
            result.failure,
            Some(SimulationError::Sector {
                year: 2026,
                sector: "peeker".into(),
                source: SectorError::UndeclaredRead("market_price_index".into()),
            })
        );
    }
    
    #[test]
    fn test_second_writer_at_runtime_is_a_merge_conflict() {
        let registry = SectorRegistry::standard().with_sector(
            Arc::new(Fixed {
                name: "rogue",
                indicator: "market_price_index",
                value: 1.0,
                declare: false,
            }),
            Placement::after("nutrition"),
        );
        let engine = SimulationEngine::from_registry(&registry).unwrap();
        let result = engine.run(&baseline(), full_horizon(), &env());
        
        assert_eq!(result.history.len(), 1);
        assert_eq!(
            result.failure,
            Some(SimulationError::MergeConflict {
                year: 2026,
                indicator: "market_price_index".into(),
                first: "market".into(),
                second: "rogue".into(),
            })
        );
    }
    
    #[test]
    fn test_configuration_errors_stop_before_first_year() {
        let engine = SimulationEngine::standard().unwrap();
        
        let unknown = baseline().with_coefficient("agriculture", "moon_phase", 1.0);
        let result = engine.run(&unknown, full_horizon(), &env());
        assert_eq!(result.history.len(), 1);
        assert!(matches!(
            result.failure,
            Some(SimulationError::Configuration(ConfigurationError::UnknownCoefficient { .. }))
        ));
        
        let bad_target = baseline().with_intervention(Intervention::set_indicator(2027, "mystery_index", 1.0));
        assert!(matches!(
            engine.validate(&bad_target, full_horizon()),
            Err(ConfigurationError::UnknownInterventionTarget { .. })
        ));
        
        let unread = baseline().with_intervention(Intervention::set_indicator(2027, "poverty_rate", 0.1));
        assert_eq!(
            engine.validate(&unread, full_horizon()),
            Err(ConfigurationError::IneffectiveOverride {
                label: "poverty_rate@2027".into(),
                indicator: "poverty_rate".into(),
            })
        );
        
        let nan = baseline().with_initial_value("stunting_rate", f64::NAN);
        assert!(matches!(
            engine.validate(&nan, full_horizon()),
            Err(ConfigurationError::NonFiniteInitialValue { .. })
        ));
        
        assert!(matches!(
            engine.validate(&baseline(), Horizon::new(2027, 2035)),
            Err(ConfigurationError::HorizonMismatch { .. })
        ));
    }
    
    #[test]
    fn test_missing_initial_indicator() {
        let mut values = baseline_initial_state().to_map();
        values.remove("anemia_rate");
        let scenario = ScenarioConfig::new("partial", StateSnapshot::new(BASELINE_YEAR, values));
        
        let engine = SimulationEngine::standard().unwrap();
        assert_eq!(
            engine.validate(&scenario, full_horizon()),
            Err(ConfigurationError::MissingInitialIndicator {
                indicator: "anemia_rate".into()
            })
        );
    }
    
    #[test]
    fn test_cancelled_run_returns_partial_history() {
        let token = CancelToken::new();
        token.cancel();
        let env = env().with_cancel_token(token);
        
        let result = SimulationEngine::standard().unwrap().run(&baseline(), full_horizon(), &env);
        assert_eq!(result.history.len(), 1);
        assert_eq!(result.failure, Some(SimulationError::Cancelled { next_year: 2026 }));
    }
    
    #[test]
    fn test_runs_are_bit_identical() {
        let scenario = baseline()
            .with_coefficient("climate", "variability_amplitude", 0.2)
            .with_intervention(Intervention::set_indicator(2029, "safety_net_coverage", 0.4));
        
        assert_eq!(run(&scenario).history, run(&scenario).history);
    }
}
