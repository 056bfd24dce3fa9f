//! Scenario configuration: initial state, coefficients and interventions.

use crate::intervention::Intervention;
use crate::state::StateSnapshot;
use foodsec_env::Year;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sector name → coefficient name → value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Coefficients {
    values: BTreeMap<String, BTreeMap<String, f64>>,
}

impl Coefficients {
    /// Creates an empty set (every sector uses its defaults).
    pub fn new() -> Self {
        Self::default()
    }
    
    /// Returns one coefficient.
    pub fn get(&self, sector: &str, name: &str) -> Option<f64> {
        self.values.get(sector)?.get(name).copied()
    }
    
    /// Sets one coefficient.
    pub fn set(&mut self, sector: impl Into<String>, name: impl Into<String>, value: f64) {
        self.values
            .entry(sector.into())
            .or_default()
            .insert(name.into(), value);
    }
    
    /// Returns all coefficients of one sector.
    pub fn sector(&self, sector: &str) -> Option<&BTreeMap<String, f64>> {
        self.values.get(sector)
    }
    
    /// Iterates `(sector, name, value)` in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, f64)> {
        self.values.iter().flat_map(|(sector, map)| {
            map.iter()
                .map(move |(name, value)| (sector.as_str(), name.as_str(), *value))
        })
    }
    
    /// Number of coefficients across sectors.
    pub fn len(&self) -> usize {
        self.values.values().map(BTreeMap::len).sum()
    }
    
    /// Returns true if no coefficient is set.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A named, complete definition of one simulated future.
///
/// The engine reads a scenario and never mutates it, so one config can be
/// shared by concurrent runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Unique scenario identifier
    pub name: String,
    
    /// Free-form description
    #[serde(default)]
    pub description: String,
    
    /// Baseline snapshot; the first simulated year is the one after it
    pub initial_state: StateSnapshot,
    
    /// Overrides of sector default coefficients
    #[serde(default)]
    pub coefficients: Coefficients,
    
    /// Interventions in declaration order
    #[serde(default)]
    pub interventions: Vec<Intervention>,
}

impl ScenarioConfig {
    /// Creates a scenario with default coefficients and no interventions.
    pub fn new(name: impl Into<String>, initial_state: StateSnapshot) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            initial_state,
            coefficients: Coefficients::new(),
            interventions: Vec::new(),
        }
    }
    
    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
    
    /// Overrides one sector coefficient.
    pub fn with_coefficient(mut self, sector: &str, name: &str, value: f64) -> Self {
        self.coefficients.set(sector, name, value);
        self
    }
    
    /// Appends an intervention (declaration order is application order).
    pub fn with_intervention(mut self, intervention: Intervention) -> Self {
        self.interventions.push(intervention);
        self
    }
    
    /// Replaces one value of the initial state.
    pub fn with_initial_value(mut self, indicator: &str, value: f64) -> Self {
        let mut overrides = BTreeMap::new();
        overrides.insert(indicator.to_string(), value);
        self.initial_state = self.initial_state.with_values(overrides);
        self
    }
    
    /// Returns the initial year.
    pub fn initial_year(&self) -> Year {
        self.initial_state.year()
    }
    
    /// Interventions that apply when computing `year`, in declaration order.
    pub fn active_interventions(&self, year: Year) -> Vec<&Intervention> {
        self.interventions
            .iter()
            .filter(|i| i.is_active(year))
            .collect()
    }
}

/// Inclusive range of simulated years.
///
/// The first year must be the year right after the initial snapshot; the
/// engine rejects anything else before running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Horizon {
    pub first: Year,
    pub last: Year,
}

impl Horizon {
    pub fn new(first: Year, last: Year) -> Self {
        Self { first, last }
    }
    
    /// Horizon running from the year after `initial_year` through `last`.
    pub fn following(initial_year: Year, last: Year) -> Self {
        Self::new(initial_year + 1, last)
    }
    
    /// Simulated years in increasing order (empty if `last < first`).
    pub fn years(&self) -> std::ops::RangeInclusive<Year> {
        self.first..=self.last
    }
    
    /// Number of simulated years.
    pub fn len(&self) -> usize {
        usize::try_from(self.last - self.first + 1).unwrap_or(0)
    }
    
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
