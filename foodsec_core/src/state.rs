//! System state: one immutable snapshot per simulated year.

use foodsec_env::Year;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Indicator name → value, in deterministic (sorted) order.
pub type IndicatorMap = BTreeMap<String, f64>;

/// All sector indicators for one year.
///
/// A snapshot is never mutated once built. The engine derives the next
/// year's snapshot as a fresh value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    year: Year,
    values: IndicatorMap,
}

impl StateSnapshot {
    /// Creates a snapshot for `year` from `(name, value)` pairs.
    pub fn new<K, I>(year: Year, values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        Self {
            year,
            values: values.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
    
    /// Returns the simulated year.
    pub fn year(&self) -> Year {
        self.year
    }
    
    /// Returns an indicator value.
    pub fn get(&self, indicator: &str) -> Option<f64> {
        self.values.get(indicator).copied()
    }
    
    /// Returns true if the indicator is present.
    pub fn contains(&self, indicator: &str) -> bool {
        self.values.contains_key(indicator)
    }
    
    /// Iterates `(name, value)` pairs in name order.
    pub fn indicators(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }
    
    /// Iterates indicator names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }
    
    /// Number of indicators.
    pub fn len(&self) -> usize {
        self.values.len()
    }
    
    /// Returns true if the snapshot holds no indicators.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
    
    /// Returns a copy of the plain mapping.
    pub fn to_map(&self) -> IndicatorMap {
        self.values.clone()
    }
    
    /// Derives a new snapshot for the same year with some values replaced.
    pub fn with_values(&self, overrides: IndicatorMap) -> Self {
        let mut values = self.values.clone();
        values.extend(overrides);
        Self {
            year: self.year,
            values,
        }
    }
}

/// The ordered snapshots of one run, starting with the initial state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct History {
    snapshots: Vec<StateSnapshot>,
}

impl History {
    /// Starts a history at the initial snapshot.
    pub fn new(initial: StateSnapshot) -> Self {
        Self {
            snapshots: vec![initial],
        }
    }
    
    pub(crate) fn push(&mut self, snapshot: StateSnapshot) {
        self.snapshots.push(snapshot);
    }
    
    /// All snapshots in year order.
    pub fn snapshots(&self) -> &[StateSnapshot] {
        &self.snapshots
    }
    
    /// Number of snapshots, initial state included.
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }
    
    /// Always false for a history built by the engine.
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
    
    /// The initial snapshot.
    pub fn first(&self) -> Option<&StateSnapshot> {
        self.snapshots.first()
    }
    
    /// The latest completed snapshot.
    pub fn last(&self) -> Option<&StateSnapshot> {
        self.snapshots.last()
    }
    
    /// Looks up the snapshot for a year.
    pub fn at_year(&self, year: Year) -> Option<&StateSnapshot> {
        let first = self.snapshots.first()?.year();
        let idx = usize::try_from(year - first).ok()?;
        self.snapshots.get(idx).filter(|s| s.year() == year)
    }
    
    /// Years covered, in order.
    pub fn years(&self) -> Vec<Year> {
        self.snapshots.iter().map(StateSnapshot::year).collect()
    }
    
    /// Time series of one indicator (years where it is present).
    pub fn series(&self, indicator: &str) -> Vec<(Year, f64)> {
        self.snapshots
            .iter()
            .filter_map(|s| s.get(indicator).map(|v| (s.year(), v)))
            .collect()
    }
    
    /// Plain `year → indicator → value` table for external consumers.
    pub fn to_table(&self) -> BTreeMap<Year, IndicatorMap> {
        self.snapshots
            .iter()
            .map(|s| (s.year(), s.to_map()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    fn snapshot(year: Year, rice: f64) -> StateSnapshot {
        StateSnapshot::new(year, [("crop_yield_rice", rice), ("stunting_rate", 0.28)])
    }
    
    #[test]
    fn test_with_values_leaves_original_untouched() {
        let base = snapshot(2025, 100.0);
        let mut overrides = IndicatorMap::new();
        overrides.insert("crop_yield_rice".into(), 90.0);
        
        let derived = base.with_values(overrides);
        
        assert_eq!(base.get("crop_yield_rice"), Some(100.0));
        assert_eq!(derived.get("crop_yield_rice"), Some(90.0));
        assert_eq!(derived.year(), 2025);
        assert_eq!(derived.len(), 2);
    }
    
    #[test]
    fn test_history_lookup_and_series() {
        let mut history = History::new(snapshot(2025, 100.0));
        history.push(snapshot(2026, 101.0));
        history.push(snapshot(2027, 102.5));
        
        assert_eq!(history.len(), 3);
        assert_eq!(history.years(), vec![2025, 2026, 2027]);
        assert_eq!(history.at_year(2026).and_then(|s| s.get("crop_yield_rice")), Some(101.0));
        assert!(history.at_year(2024).is_none());
        assert!(history.at_year(2030).is_none());
        assert_eq!(
            history.series("crop_yield_rice"),
            vec![(2025, 100.0), (2026, 101.0), (2027, 102.5)]
        );
        assert_eq!(history.to_table().len(), 3);
    }
}
