//! Bangladesh 2025 baseline.
//!
//! Values are national aggregates: population in millions, GDP per capita in
//! USD, production in million tonnes, yields as an index (2025 = 100),
//! prices as an index (2025 = 1.0) except retail rice in BDT/kg.

use crate::state::StateSnapshot;
use foodsec_env::Year;

/// Year of the baseline snapshot.
pub const BASELINE_YEAR: Year = 2025;

/// Last year of the standard projection.
pub const PROJECTION_END: Year = 2035;

/// Initial state covering every indicator of the standard sectors.
pub fn baseline_initial_state() -> StateSnapshot {
    StateSnapshot::new(
        BASELINE_YEAR,
        [
            // Climate
            ("climate_temp_anomaly", 0.0),
            ("climate_precip_change", 0.0),
            ("climate_shock_index", 0.0),
            ("flood_risk_index", 0.30),
            ("drought_risk_index", 0.15),
            ("climate_stress_index", 0.08),
            // Agriculture
            ("crop_yield_rice", 100.0),
            ("crop_yield_wheat", 100.0),
            ("rice_production_mt", 38.0),
            ("wheat_production_mt", 1.2),
            ("technology_adoption_rate", 0.7),
            ("crop_diversification_index", 0.35),
            // Land-water-energy
            ("cultivated_area_mha", 8.0),
            ("irrigation_coverage", 0.6),
            ("water_stress_index", 0.35),
            ("energy_cost_index", 1.0),
            // Market
            ("market_price_index", 1.0),
            ("rice_price_retail", 50.0),
            ("self_sufficiency_ratio", 0.88),
            ("food_import_share", 0.08),
            // Policy
            ("policy_subsidy_level", 0.1),
            ("safety_net_coverage", 0.2),
            ("policy_import_tariff", 0.05),
            ("policy_active_interventions", 0.0),
            // Socioeconomic
            ("population_million", 170.0),
            ("gdp_per_capita", 2600.0),
            ("poverty_rate", 0.16),
            ("labor_productivity_index", 1.0),
            ("household_purchasing_power", 1.03),
            ("health_service_coverage", 0.5),
            ("adaptive_capacity_index", 0.4),
            // Nutrition
            ("caloric_availability", 2300.0),
            ("caloric_intake", 2115.0),
            ("protein_availability", 62.0),
            ("stunting_rate", 0.28),
            ("wasting_rate", 0.08),
            ("anemia_rate", 0.37),
            ("dietary_diversity_score", 5.1),
        ],
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SectorRegistry;
    
    #[test]
    fn test_baseline_covers_standard_schema_exactly() {
        let plan = SectorRegistry::standard().build().unwrap();
        let state = baseline_initial_state();
        
        let schema: Vec<&str> = plan.indicators().collect();
        let names: Vec<&str> = state.names().collect();
        assert_eq!(schema, names);
        assert_eq!(state.year(), BASELINE_YEAR);
    }
}
