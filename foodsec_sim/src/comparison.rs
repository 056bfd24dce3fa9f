//! Cross-scenario comparison of final-year results.

use crate::error::RunnerError;
use crate::runner::ScenarioOutcome;
use foodsec_core::precision::{quantize_index, quantize_indicator};
use foodsec_core::IndicatorMap;
use foodsec_env::Year;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Final-year values of one scenario and its differences from the reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioSummary {
    pub final_year: Year,
    
    /// Final snapshot
    pub indicators: IndicatorMap,
    
    /// Composite indices in the final year
    pub indices: BTreeMap<String, f64>,
    
    /// `indicators − reference indicators`
    pub indicator_deltas: IndicatorMap,
    
    /// `indices − reference indices`
    pub index_deltas: BTreeMap<String, f64>,
}

/// Completed scenarios side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioComparison {
    /// Scenario all deltas are taken against
    pub reference: String,
    
    /// Completed scenarios by name, reference included
    pub scenarios: BTreeMap<String, ScenarioSummary>,
    
    /// Failed scenarios, left out of the comparison
    pub excluded: Vec<String>,
}

impl ScenarioComparison {
    /// Compares completed outcomes against the scenario named `reference`.
    ///
    /// Failed runs carry partial histories and are excluded rather than
    /// compared. The reference itself must have completed.
    pub fn build(outcomes: &[ScenarioOutcome], reference: &str) -> Result<Self, RunnerError> {
        let (completed, failed): (Vec<&ScenarioOutcome>, Vec<&ScenarioOutcome>) =
            outcomes.iter().partition(|o| o.status.is_completed());
        
        let reference_outcome = completed
            .iter()
            .find(|o| o.scenario == reference)
            .ok_or_else(|| RunnerError::ReferenceUnavailable(reference.to_string()))?;
        let (reference_indicators, reference_indices) = final_values(reference_outcome)
            .ok_or_else(|| RunnerError::ReferenceUnavailable(reference.to_string()))?;
        
        let mut scenarios = BTreeMap::new();
        for outcome in completed {
            let Some((indicators, indices)) = final_values(outcome) else {
                continue;
            };
            let final_year = outcome.history.last().map(|s| s.year()).unwrap_or_default();
            let indicator_deltas = deltas(&indicators, &reference_indicators, quantize_indicator);
            let index_deltas = deltas(&indices, &reference_indices, quantize_index);
            scenarios.insert(
                outcome.scenario.clone(),
                ScenarioSummary {
                    final_year,
                    indicators,
                    indices,
                    indicator_deltas,
                    index_deltas,
                },
            );
        }
        
        Ok(Self {
            reference: reference.to_string(),
            scenarios,
            excluded: failed.iter().map(|o| o.scenario.clone()).collect(),
        })
    }
    
    /// Difference from the reference for one indicator.
    pub fn indicator_delta(&self, scenario: &str, indicator: &str) -> Option<f64> {
        self.scenarios.get(scenario)?.indicator_deltas.get(indicator).copied()
    }
    
    /// Difference from the reference for one composite index.
    pub fn index_delta(&self, scenario: &str, index: &str) -> Option<f64> {
        self.scenarios.get(scenario)?.index_deltas.get(index).copied()
    }
}

/// Final snapshot values and final-year indices.
fn final_values(outcome: &ScenarioOutcome) -> Option<(IndicatorMap, BTreeMap<String, f64>)> {
    let last = outcome.history.last()?;
    let indices = outcome
        .metrics
        .series
        .iter()
        .filter_map(|(name, series)| series.get(&last.year()).map(|v| (name.clone(), *v)))
        .collect();
    Some((last.to_map(), indices))
}

fn deltas(
    values: &BTreeMap<String, f64>,
    reference: &BTreeMap<String, f64>,
    quantize: fn(f64) -> f64,
) -> BTreeMap<String, f64> {
    values
        .iter()
        .filter_map(|(name, v)| reference.get(name).map(|r| (name.clone(), quantize(v - r))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScenarioRunner;
    use crate::scenarios::ScenarioId;
    use foodsec_env::CancelToken;
    
    #[test]
    fn test_deltas_against_baseline() {
        let runner = ScenarioRunner::new();
        let outcomes: Vec<ScenarioOutcome> = [ScenarioId::Baseline, ScenarioId::SubsidyExpansion]
            .iter()
            .map(|id| runner.execute(&id.config()))
            .collect();
        
        let comparison = ScenarioComparison::build(&outcomes, "baseline").unwrap();
        
        assert!(comparison.excluded.is_empty());
        assert_eq!(comparison.indicator_delta("baseline", "crop_yield_rice"), Some(0.0));
        assert_eq!(comparison.indicator_delta("subsidy_expansion", "policy_subsidy_level"), Some(0.4));
        assert!(comparison.indicator_delta("subsidy_expansion", "crop_yield_rice").unwrap() > 0.0);
        assert_eq!(comparison.scenarios["baseline"].final_year, 2035);
    }
    
    #[test]
    fn test_failed_runs_are_excluded() {
        let cancelled = CancelToken::new();
        cancelled.cancel();
        let outcomes = vec![
            ScenarioRunner::new().execute(&ScenarioId::Baseline.config()),
            ScenarioRunner::new()
                .with_cancel_token(cancelled)
                .execute(&ScenarioId::HighClimateImpact.config()),
        ];
        
        let comparison = ScenarioComparison::build(&outcomes, "baseline").unwrap();
        assert_eq!(comparison.excluded, vec!["high_climate_impact".to_string()]);
        assert!(!comparison.scenarios.contains_key("high_climate_impact"));
        
        let err = ScenarioComparison::build(&outcomes, "high_climate_impact").unwrap_err();
        assert!(matches!(err, RunnerError::ReferenceUnavailable(_)));
    }
}
