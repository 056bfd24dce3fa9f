//! Named scenario library.
//!
//! Every scenario starts from the shared 2025 baseline and differs only in
//! coefficients and interventions.

use foodsec_core::{baseline_initial_state, Intervention, ScenarioConfig};

/// Scenario identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ScenarioId {
    /// Current trends continue
    Baseline,
    
    /// Faster warming, drying and hazard growth with two major shocks
    HighClimateImpact,
    
    /// Stronger adaptation investment dampens climate stress
    EnhancedAdaptation,
    
    /// Safety-net coverage doubled from 2026 with larger transfers
    PolicyChangeSafetyNet,
    
    /// Input subsidies raised to 0.5 from 2027
    SubsidyExpansion,
}

impl ScenarioId {
    /// Returns a list of all scenarios.
    pub fn all() -> Vec<ScenarioId> {
        vec![
            ScenarioId::Baseline,
            ScenarioId::HighClimateImpact,
            ScenarioId::EnhancedAdaptation,
            ScenarioId::PolicyChangeSafetyNet,
            ScenarioId::SubsidyExpansion,
        ]
    }
    
    /// Returns the scenario name.
    pub fn name(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "baseline",
            ScenarioId::HighClimateImpact => "high_climate_impact",
            ScenarioId::EnhancedAdaptation => "enhanced_adaptation",
            ScenarioId::PolicyChangeSafetyNet => "policy_change_safety_net",
            ScenarioId::SubsidyExpansion => "subsidy_expansion",
        }
    }
    
    /// Returns a description of the scenario.
    pub fn description(&self) -> &'static str {
        match self {
            ScenarioId::Baseline => "Business as usual: current climate, technology and policy trends",
            ScenarioId::HighClimateImpact => {
                "Accelerated warming and drying, rising flood/drought risk, shocks in 2028 and 2032"
            }
            ScenarioId::EnhancedAdaptation => "Doubled adaptation effectiveness and faster adaptive-capacity growth",
            ScenarioId::PolicyChangeSafetyNet => "Safety-net coverage raised to 40% from 2026 with larger transfers",
            ScenarioId::SubsidyExpansion => "Agricultural input subsidy raised to 0.5 from 2027",
        }
    }
    
    /// Builds the scenario from the 2025 baseline.
    pub fn config(&self) -> ScenarioConfig {
        let base = ScenarioConfig::new(self.name(), baseline_initial_state()).with_description(self.description());
        
        match self {
            ScenarioId::Baseline => base,
            ScenarioId::HighClimateImpact => base
                .with_coefficient("climate", "temp_anomaly_trend", 0.05)
                .with_coefficient("climate", "precip_change_trend", -0.01)
                .with_coefficient("climate", "flood_risk_trend", 0.008)
                .with_coefficient("climate", "drought_risk_trend", 0.006)
                .with_intervention(
                    Intervention::set_coefficient(2028, "climate", "shock_magnitude", 0.6)
                        .one_shot()
                        .labelled("2028 monsoon flood"),
                )
                .with_intervention(
                    Intervention::set_coefficient(2032, "climate", "shock_magnitude", 0.4)
                        .one_shot()
                        .labelled("2032 drought"),
                ),
            ScenarioId::EnhancedAdaptation => base
                .with_coefficient("climate", "adaptation_effectiveness", 0.6)
                .with_coefficient("socioeconomic", "adaptive_capacity_growth", 0.04)
                .with_coefficient("agriculture", "technology_adoption_speed", 0.15),
            ScenarioId::PolicyChangeSafetyNet => base
                .with_coefficient("socioeconomic", "safety_net_transfer_value", 0.2)
                .with_intervention(
                    Intervention::set_indicator(2026, "safety_net_coverage", 0.4).labelled("safety net expansion"),
                ),
            ScenarioId::SubsidyExpansion => base.with_intervention(
                Intervention::set_indicator(2027, "policy_subsidy_level", 0.5).labelled("input subsidy expansion"),
            ),
        }
    }
}

impl std::fmt::Display for ScenarioId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for ScenarioId {
    type Err = String;
    
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "baseline" => Ok(ScenarioId::Baseline),
            "high_climate_impact" | "high_climate" => Ok(ScenarioId::HighClimateImpact),
            "enhanced_adaptation" | "adaptation" => Ok(ScenarioId::EnhancedAdaptation),
            "policy_change_safety_net" | "safety_net" => Ok(ScenarioId::PolicyChangeSafetyNet),
            "subsidy_expansion" | "subsidy" => Ok(ScenarioId::SubsidyExpansion),
            _ => Err(format!("Unknown scenario: {}", s)),
        }
    }
}
