//! Composite food-security indices
//! ================================
//!
//! Four pillar sub-scores are derived from each snapshot, each the mean of
//! its available terms in [0, 1]:
//! - **Availability**: calories against need, self-sufficiency
//! - **Access**: purchasing power, share not in poverty
//! - **Utilization**: absence of stunting and wasting, dietary diversity
//! - **Stability**: price calm year on year, absence of climate stress
//!
//! The composite is their weighted sum, renormalized over the pillars that
//! had any data. A missing input drops out with weight zero and is reported
//! as a [`DataQualityWarning`]; it never fails aggregation.

use crate::diagnostics::DataQualityWarning;
use crate::precision::{clamp01, quantize_index};
use crate::state::{History, StateSnapshot};
use foodsec_env::Year;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

pub const AVAILABILITY: &str = "availability";
pub const ACCESS: &str = "access";
pub const UTILIZATION: &str = "utilization";
pub const STABILITY: &str = "stability";
pub const FOOD_SECURITY_INDEX: &str = "food_security_index";

/// Pillar weights of the composite index.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompositeWeights {
    pub availability: f64,
    pub access: f64,
    pub utilization: f64,
    pub stability: f64,
}

impl Default for CompositeWeights {
    fn default() -> Self {
        Self {
            availability: 0.3,
            access: 0.3,
            utilization: 0.2,
            stability: 0.2,
        }
    }
}

/// Aggregation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsConfig {
    pub weights: CompositeWeights,
    
    /// Daily energy requirement (kcal per capita)
    pub caloric_need: f64,
    
    /// Maximum dietary diversity score
    pub max_diversity_score: f64,
    
    /// A relative price change of `1 / price_volatility_scale` scores zero
    pub price_volatility_scale: f64,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            weights: CompositeWeights::default(),
            caloric_need: 2100.0,
            max_diversity_score: 12.0,
            price_volatility_scale: 5.0,
        }
    }
}

/// Per-year series of every composite index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsResult {
    /// Index name → year → value
    pub series: BTreeMap<String, BTreeMap<Year, f64>>,
    
    /// Inputs that were missing and weighted zero
    pub data_quality: Vec<DataQualityWarning>,
}

impl MetricsResult {
    /// Series of one index.
    pub fn index(&self, name: &str) -> Option<&BTreeMap<Year, f64>> {
        self.series.get(name)
    }
    
    /// Value of one index in one year.
    pub fn value(&self, name: &str, year: Year) -> Option<f64> {
        self.series.get(name)?.get(&year).copied()
    }
    
    /// Latest value of one index.
    pub fn final_value(&self, name: &str) -> Option<f64> {
        self.series.get(name)?.values().next_back().copied()
    }
}

/// Derives composite indices from a history. Stateless; results are
/// recomputed on every call.
#[derive(Debug, Clone, Default)]
pub struct MetricsAggregator {
    config: MetricsConfig,
}

/// Scores accumulated for one pillar in one year.
#[derive(Default)]
struct Pillar {
    sum: f64,
    terms: usize,
}

impl Pillar {
    fn add(&mut self, score: f64) {
        self.sum += score;
        self.terms += 1;
    }
    
    fn mean(&self) -> Option<f64> {
        (self.terms > 0).then(|| self.sum / self.terms as f64)
    }
}

impl MetricsAggregator {
    pub fn new(config: MetricsConfig) -> Self {
        Self { config }
    }
    
    pub fn config(&self) -> &MetricsConfig {
        &self.config
    }
    
    /// Computes every index for every snapshot of `history`.
    pub fn aggregate(&self, history: &History) -> MetricsResult {
        let mut result = MetricsResult::default();
        let mut missing: BTreeMap<(&'static str, &'static str), Vec<Year>> = BTreeMap::new();
        
        let mut previous: Option<&StateSnapshot> = None;
        for snapshot in history.snapshots() {
            let year = snapshot.year();
            let mut note = |pillar: &'static str, indicator: &'static str| {
                missing.entry((pillar, indicator)).or_default().push(year);
            };
            
            let pillars = [
                (AVAILABILITY, self.config.weights.availability, self.availability(snapshot, &mut note)),
                (ACCESS, self.config.weights.access, self.access(snapshot, &mut note)),
                (UTILIZATION, self.config.weights.utilization, self.utilization(snapshot, &mut note)),
                (STABILITY, self.config.weights.stability, self.stability(snapshot, previous, &mut note)),
            ];
            
            let mut weighted = 0.0;
            let mut weight_total = 0.0;
            for (name, weight, score) in pillars {
                if let Some(score) = score {
                    let score = quantize_index(score);
                    result.series.entry(name.to_string()).or_default().insert(year, score);
                    weighted += weight * score;
                    weight_total += weight;
                }
            }
            if weight_total > 0.0 {
                result
                    .series
                    .entry(FOOD_SECURITY_INDEX.to_string())
                    .or_default()
                    .insert(year, quantize_index(weighted / weight_total));
            }
            
            previous = Some(snapshot);
        }
        
        result.data_quality = missing
            .into_iter()
            .map(|((component, indicator), years)| DataQualityWarning {
                component: component.to_string(),
                indicator: indicator.to_string(),
                years,
            })
            .collect();
        for w in &result.data_quality {
            warn!(component = %w.component, indicator = %w.indicator, years = w.years.len(), "Metric input missing");
        }
        result
    }
    
    /// Looks up a term, recording it as missing if absent.
    fn term(
        snapshot: &StateSnapshot,
        pillar: &'static str,
        indicator: &'static str,
        note: &mut impl FnMut(&'static str, &'static str),
        score: impl Fn(f64) -> f64,
        acc: &mut Pillar,
    ) {
        match snapshot.get(indicator) {
            Some(v) => acc.add(score(v)),
            None => note(pillar, indicator),
        }
    }
    
    fn availability(
        &self,
        s: &StateSnapshot,
        note: &mut impl FnMut(&'static str, &'static str),
    ) -> Option<f64> {
        let mut p = Pillar::default();
        let need = self.config.caloric_need;
        Self::term(s, AVAILABILITY, "caloric_availability", note, |v| clamp01(v / need), &mut p);
        Self::term(s, AVAILABILITY, "self_sufficiency_ratio", note, clamp01, &mut p);
        p.mean()
    }
    
    fn access(&self, s: &StateSnapshot, note: &mut impl FnMut(&'static str, &'static str)) -> Option<f64> {
        let mut p = Pillar::default();
        Self::term(s, ACCESS, "household_purchasing_power", note, clamp01, &mut p);
        Self::term(s, ACCESS, "poverty_rate", note, |v| clamp01(1.0 - v), &mut p);
        p.mean()
    }
    
    fn utilization(&self, s: &StateSnapshot, note: &mut impl FnMut(&'static str, &'static str)) -> Option<f64> {
        let mut p = Pillar::default();
        let max_diversity = self.config.max_diversity_score;
        Self::term(s, UTILIZATION, "stunting_rate", note, |v| clamp01(1.0 - v), &mut p);
        Self::term(s, UTILIZATION, "wasting_rate", note, |v| clamp01(1.0 - v), &mut p);
        Self::term(s, UTILIZATION, "dietary_diversity_score", note, |v| clamp01(v / max_diversity), &mut p);
        p.mean()
    }
    
    /// The price term needs the previous year; the first snapshot is scored
    /// on climate stress alone.
    fn stability(
        &self,
        s: &StateSnapshot,
        previous: Option<&StateSnapshot>,
        note: &mut impl FnMut(&'static str, &'static str),
    ) -> Option<f64> {
        let mut p = Pillar::default();
        if let Some(prev) = previous {
            match (s.get("market_price_index"), prev.get("market_price_index")) {
                (Some(now), Some(before)) if before > 0.0 => {
                    let change = (now - before).abs() / before;
                    p.add(1.0 - clamp01(change * self.config.price_volatility_scale));
                }
                _ => note(STABILITY, "market_price_index"),
            }
        }
        Self::term(s, STABILITY, "climate_stress_index", note, |v| clamp01(1.0 - v), &mut p);
        p.mean()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::baseline_initial_state;
    use approx::assert_relative_eq;
    
    #[test]
    fn test_baseline_scores() {
        let history = History::new(baseline_initial_state());
        let metrics = MetricsAggregator::default().aggregate(&history);
        
        assert!(metrics.data_quality.is_empty());
        // mean(1.0, 0.88)
        assert_relative_eq!(metrics.value(AVAILABILITY, 2025).unwrap(), 0.94, epsilon = 1e-9);
        // mean(1.0, 0.84)
        assert_relative_eq!(metrics.value(ACCESS, 2025).unwrap(), 0.92, epsilon = 1e-9);
        // mean(0.72, 0.92, 0.425)
        assert_relative_eq!(metrics.value(UTILIZATION, 2025).unwrap(), 0.688333, epsilon = 1e-9);
        assert_relative_eq!(metrics.value(STABILITY, 2025).unwrap(), 0.92, epsilon = 1e-9);
        
        let expected = 0.3 * 0.94 + 0.3 * 0.92 + 0.2 * 0.688333 + 0.2 * 0.92;
        assert_relative_eq!(metrics.value(FOOD_SECURITY_INDEX, 2025).unwrap(), expected, epsilon = 1e-6);
    }
    
    #[test]
    fn test_price_swing_lowers_stability() {
        let mut history = History::new(baseline_initial_state());
        let mut values = baseline_initial_state().to_map();
        values.insert("market_price_index".into(), 1.1);
        history.push(StateSnapshot::new(2026, values));
        
        let metrics = MetricsAggregator::default().aggregate(&history);
        // price term 1 - 0.1*5 = 0.5, stress term 0.92
        assert_relative_eq!(metrics.value(STABILITY, 2026).unwrap(), 0.71, epsilon = 1e-9);
    }
    
    #[test]
    fn test_missing_inputs_are_weighted_zero_and_reported() {
        let mut values = baseline_initial_state().to_map();
        values.remove("household_purchasing_power");
        values.remove("poverty_rate");
        values.remove("wasting_rate");
        let mut history = History::new(StateSnapshot::new(2025, values.clone()));
        history.push(StateSnapshot::new(2026, values));
        
        let metrics = MetricsAggregator::default().aggregate(&history);
        
        assert!(metrics.index(ACCESS).is_none());
        // mean(0.72, 0.425)
        assert_relative_eq!(metrics.value(UTILIZATION, 2026).unwrap(), 0.5725, epsilon = 1e-9);
        
        // Renormalized over availability, utilization and stability
        // stability: steady price 1.0, stress term 0.92
        let expected = (0.3 * 0.94 + 0.2 * 0.5725 + 0.2 * 0.96) / 0.7;
        assert_relative_eq!(metrics.value(FOOD_SECURITY_INDEX, 2026).unwrap(), expected, epsilon = 1e-6);
        
        let flagged: Vec<(&str, &str, usize)> = metrics
            .data_quality
            .iter()
            .map(|w| (w.component.as_str(), w.indicator.as_str(), w.years.len()))
            .collect();
        assert_eq!(
            flagged,
            vec![
                ("access", "household_purchasing_power", 2),
                ("access", "poverty_rate", 2),
                ("utilization", "wasting_rate", 2),
            ]
        );
    }
}
