//! Scheduled changes to coefficients or state.

use foodsec_env::Year;
use serde::{Deserialize, Serialize};

/// What an intervention modifies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterventionTarget {
    /// A sector coefficient, applied to that year's working copy of coefficients
    Coefficient { sector: String, name: String },
    
    /// A state indicator, applied to the previous snapshot before sectors read it
    Indicator(String),
}

impl std::fmt::Display for InterventionTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InterventionTarget::Coefficient { sector, name } => write!(f, "{}.{}", sector, name),
            InterventionTarget::Indicator(name) => write!(f, "{}", name),
        }
    }
}

/// How the targeted value changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Adjustment {
    /// Replace the value
    Set(f64),
    /// Multiply the value
    Scale(f64),
    /// Add to the value
    Add(f64),
}

impl Adjustment {
    /// Applies the adjustment to `value`.
    pub fn apply(&self, value: f64) -> f64 {
        match *self {
            Adjustment::Set(v) => v,
            Adjustment::Scale(f) => value * f,
            Adjustment::Add(d) => value + d,
        }
    }
    
    /// Returns the adjustment's operand.
    pub fn operand(&self) -> f64 {
        match *self {
            Adjustment::Set(v) | Adjustment::Scale(v) | Adjustment::Add(v) => v,
        }
    }
}

/// Whether an intervention applies once or every year from its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Persistence {
    OneShot,
    Persistent,
}

/// A policy or external shock scheduled for a given year.
///
/// Owned by its `ScenarioConfig`; the engine only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Intervention {
    /// Human-readable label used in errors and logs
    pub label: String,
    
    /// First year the intervention applies
    pub effective_year: Year,
    
    pub target: InterventionTarget,
    
    pub adjustment: Adjustment,
    
    pub persistence: Persistence,
}

impl Intervention {
    /// Creates a persistent intervention.
    pub fn new(effective_year: Year, target: InterventionTarget, adjustment: Adjustment) -> Self {
        let label = format!("{}@{}", target, effective_year);
        Self {
            label,
            effective_year,
            target,
            adjustment,
            persistence: Persistence::Persistent,
        }
    }
    
    /// Persistently sets a state indicator from `year` on.
    pub fn set_indicator(year: Year, indicator: impl Into<String>, value: f64) -> Self {
        Self::new(year, InterventionTarget::Indicator(indicator.into()), Adjustment::Set(value))
    }
    
    /// Persistently sets a sector coefficient from `year` on.
    pub fn set_coefficient(
        year: Year,
        sector: impl Into<String>,
        name: impl Into<String>,
        value: f64,
    ) -> Self {
        let target = InterventionTarget::Coefficient {
            sector: sector.into(),
            name: name.into(),
        };
        Self::new(year, target, Adjustment::Set(value))
    }
    
    /// Makes the intervention apply in its effective year only.
    pub fn one_shot(mut self) -> Self {
        self.persistence = Persistence::OneShot;
        self
    }
    
    /// Replaces the generated label.
    pub fn labelled(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
    
    /// Returns true if the intervention applies when computing `year`.
    pub fn is_active(&self, year: Year) -> bool {
        match self.persistence {
            Persistence::OneShot => year == self.effective_year,
            Persistence::Persistent => year >= self.effective_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_activation_windows() {
        let persistent = Intervention::set_indicator(2027, "policy_subsidy_level", 0.5);
        assert!(!persistent.is_active(2026));
        assert!(persistent.is_active(2027));
        assert!(persistent.is_active(2035));
        
        let once = persistent.clone().one_shot();
        assert!(!once.is_active(2026));
        assert!(once.is_active(2027));
        assert!(!once.is_active(2028));
    }
    
    #[test]
    fn test_adjustments() {
        assert_eq!(Adjustment::Set(0.5).apply(0.1), 0.5);
        assert_eq!(Adjustment::Scale(2.0).apply(0.25), 0.5);
        assert_eq!(Adjustment::Add(-0.1).apply(0.5), 0.4);
    }
    
    #[test]
    fn test_default_label() {
        let i = Intervention::set_coefficient(2028, "climate", "shock_magnitude", 0.6);
        assert_eq!(i.label, "climate.shock_magnitude@2028");
        assert_eq!(i.labelled("flood").label, "flood");
    }
}
