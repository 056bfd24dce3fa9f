//! Nutrition: dietary energy and protein, diversity, and prevalence rates.
//!
//! Availability comes from this year's harvest; affordability, food prices
//! and health coverage come from the previous year's market and
//! socioeconomic state.
//! Prevalence rates improve when intake clears the adequacy thresholds and
//! deteriorate otherwise, with better health coverage damping both moves.

use super::outputs;
use crate::error::SectorError;
use crate::sector::{CoefficientSpec, IndicatorSpec, SectorInputs, SectorModel};
use crate::state::IndicatorMap;

pub const NAME: &str = "nutrition";

const DAYS_PER_YEAR: f64 = 365.0;

#[derive(Debug, Clone, Copy, Default)]
pub struct NutritionSector;

impl NutritionSector {
    /// Next prevalence rate given whether intake was adequate.
    fn prevalence(
        inputs: &SectorInputs<'_>,
        indicator: &str,
        adequate: bool,
        improvement: &str,
        deterioration: &str,
        health_damping: f64,
    ) -> Result<f64, SectorError> {
        let step = if adequate {
            -inputs.coefficient(improvement)?
        } else {
            inputs.coefficient(deterioration)?
        };
        Ok(inputs.lagged(indicator)? + step * health_damping)
    }
}

impl SectorModel for NutritionSector {
    fn name(&self) -> &str {
        NAME
    }
    
    fn writes(&self) -> Vec<IndicatorSpec> {
        vec![
            IndicatorSpec::bounded("caloric_availability", 800.0, 4500.0),
            IndicatorSpec::bounded("caloric_intake", 600.0, 4500.0),
            IndicatorSpec::bounded("protein_availability", 10.0, 200.0),
            IndicatorSpec::bounded("stunting_rate", 0.0, 1.0),
            IndicatorSpec::bounded("wasting_rate", 0.0, 1.0),
            IndicatorSpec::bounded("anemia_rate", 0.0, 1.0),
            IndicatorSpec::bounded("dietary_diversity_score", 0.0, 12.0),
        ]
    }
    
    fn reads_current(&self) -> Vec<&'static str> {
        vec!["rice_production_mt", "wheat_production_mt", "crop_diversification_index"]
    }
    
    fn reads_lagged(&self) -> Vec<&'static str> {
        vec![
            "population_million",
            "household_purchasing_power",
            "market_price_index",
            "health_service_coverage",
            "food_import_share",
            "stunting_rate",
            "wasting_rate",
            "anemia_rate",
        ]
    }
    
    fn coefficients(&self) -> Vec<CoefficientSpec> {
        vec![
            CoefficientSpec::new("rice_kcal_per_kg", 3600.0),
            CoefficientSpec::new("wheat_kcal_per_kg", 3400.0),
            CoefficientSpec::new("rice_protein_g_per_kg", 70.0),
            CoefficientSpec::new("wheat_protein_g_per_kg", 120.0),
            CoefficientSpec::new("food_use_share", 0.75),
            CoefficientSpec::new("other_kcal_per_capita", 450.0),
            CoefficientSpec::new("other_protein_g_per_capita", 25.0),
            CoefficientSpec::new("affordability_elasticity", 0.3),
            CoefficientSpec::new("food_price_elasticity", 0.2),
            CoefficientSpec::new("intake_ratio", 0.92),
            CoefficientSpec::new("diversity_base", 3.0),
            CoefficientSpec::new("diversity_range", 6.0),
            CoefficientSpec::new("energy_threshold_kcal", 2100.0),
            CoefficientSpec::new("protein_threshold_g", 50.0),
            CoefficientSpec::new("diversity_threshold", 5.0),
            CoefficientSpec::new("health_damping", 0.1),
            CoefficientSpec::new("stunting_improvement", 0.005),
            CoefficientSpec::new("stunting_deterioration", 0.002),
            CoefficientSpec::new("wasting_improvement", 0.003),
            CoefficientSpec::new("wasting_deterioration", 0.001),
            CoefficientSpec::new("anemia_improvement", 0.01),
            CoefficientSpec::new("anemia_deterioration", 0.005),
        ]
    }
    
    fn update(&self, inputs: &SectorInputs<'_>) -> Result<IndicatorMap, SectorError> {
        let population = inputs.lagged("population_million")?;
        if population <= 0.0 {
            return Err(SectorError::computation(format!("population must be positive, got {}", population)));
        }
        // Mt → kg per person per day
        let per_capita_day = 1e9 / (population * 1e6 * DAYS_PER_YEAR);
        let food_use = inputs.coefficient("food_use_share")?;
        let rice = inputs.now("rice_production_mt")? * food_use * per_capita_day;
        let wheat = inputs.now("wheat_production_mt")? * food_use * per_capita_day;
        
        // Imports top up the domestic share of supply
        let domestic_share = (1.0 - inputs.lagged("food_import_share")?).max(0.05);
        
        let kcal = (rice * inputs.coefficient("rice_kcal_per_kg")? + wheat * inputs.coefficient("wheat_kcal_per_kg")?)
            / domestic_share
            + inputs.coefficient("other_kcal_per_capita")?;
        let protein = (rice * inputs.coefficient("rice_protein_g_per_kg")?
            + wheat * inputs.coefficient("wheat_protein_g_per_kg")?)
            / domestic_share
            + inputs.coefficient("other_protein_g_per_capita")?;
        
        let price = inputs.lagged("market_price_index")?;
        if price <= 0.0 {
            return Err(SectorError::computation(format!("market price index must be positive, got {}", price)));
        }
        let purchasing_power = inputs.lagged("household_purchasing_power")?.max(0.0);
        // Dearer food squeezes intake even when incomes keep pace
        let affordability = (purchasing_power.powf(inputs.coefficient("affordability_elasticity")?)
            * price.powf(-inputs.coefficient("food_price_elasticity")?))
        .min(1.0);
        let intake = kcal * affordability * inputs.coefficient("intake_ratio")?;
        
        let diversity = inputs.coefficient("diversity_base")?
            + inputs.coefficient("diversity_range")? * inputs.now("crop_diversification_index")?;
        
        let energy_ok = intake >= inputs.coefficient("energy_threshold_kcal")?;
        let protein_ok = protein >= inputs.coefficient("protein_threshold_g")?;
        let diversity_ok = diversity >= inputs.coefficient("diversity_threshold")?;
        let damping = 1.0 - inputs.coefficient("health_damping")? * inputs.lagged("health_service_coverage")?;
        
        let stunting = Self::prevalence(
            inputs,
            "stunting_rate",
            energy_ok && protein_ok,
            "stunting_improvement",
            "stunting_deterioration",
            damping,
        )?;
        let wasting = Self::prevalence(
            inputs,
            "wasting_rate",
            energy_ok,
            "wasting_improvement",
            "wasting_deterioration",
            damping,
        )?;
        let anemia = Self::prevalence(
            inputs,
            "anemia_rate",
            diversity_ok,
            "anemia_improvement",
            "anemia_deterioration",
            damping,
        )?;
        
        Ok(outputs([
            ("caloric_availability", kcal),
            ("caloric_intake", intake),
            ("protein_availability", protein),
            ("stunting_rate", stunting),
            ("wasting_rate", wasting),
            ("anemia_rate", anemia),
            ("dietary_diversity_score", diversity),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::baseline::baseline_initial_state;
    use crate::sectors::testing::{run_on, run_on_baseline};
    use crate::state::IndicatorMap;
    use approx::assert_relative_eq;
    
    #[test]
    fn test_adequate_diet_improves_prevalence() {
        let out = run_on_baseline(
            &NutritionSector,
            &[
                ("rice_production_mt", 38.0),
                ("wheat_production_mt", 1.2),
                ("crop_diversification_index", 0.35),
            ],
        )
        .unwrap();
        
        assert!(out["caloric_availability"] > 2250.0 && out["caloric_availability"] < 2350.0);
        assert!(out["caloric_intake"] > 2100.0);
        assert!(out["protein_availability"] > 50.0);
        
        // health coverage 0.5 → damping 0.95
        assert_relative_eq!(out["stunting_rate"], 0.28 - 0.005 * 0.95, epsilon = 1e-12);
        assert_relative_eq!(out["wasting_rate"], 0.08 - 0.003 * 0.95, epsilon = 1e-12);
        // diversity 3 + 6*0.35 = 5.1 clears the threshold
        assert_relative_eq!(out["dietary_diversity_score"], 5.1, epsilon = 1e-12);
        assert_relative_eq!(out["anemia_rate"], 0.37 - 0.01 * 0.95, epsilon = 1e-12);
    }
    
    #[test]
    fn test_harvest_failure_worsens_prevalence() {
        let out = run_on_baseline(
            &NutritionSector,
            &[
                ("rice_production_mt", 20.0),
                ("wheat_production_mt", 0.5),
                ("crop_diversification_index", 0.2),
            ],
        )
        .unwrap();
        
        assert!(out["caloric_intake"] < 2100.0);
        assert_relative_eq!(out["stunting_rate"], 0.28 + 0.002 * 0.95, epsilon = 1e-12);
        assert_relative_eq!(out["wasting_rate"], 0.08 + 0.001 * 0.95, epsilon = 1e-12);
        assert_relative_eq!(out["anemia_rate"], 0.37 + 0.005 * 0.95, epsilon = 1e-12);
    }
    
    const HARVEST: [(&str, f64); 3] = [
        ("rice_production_mt", 38.0),
        ("wheat_production_mt", 1.2),
        ("crop_diversification_index", 0.35),
    ];
    
    #[test]
    fn test_food_price_spike_cuts_intake() {
        let normal = run_on_baseline(&NutritionSector, &HARVEST).unwrap();
        
        let mut spike = IndicatorMap::new();
        spike.insert("market_price_index".into(), 4.0);
        let previous = baseline_initial_state().with_values(spike);
        let dear = run_on(&NutritionSector, &previous, &HARVEST).unwrap();
        
        assert_eq!(dear["caloric_availability"], normal["caloric_availability"]);
        assert!(dear["caloric_intake"] < normal["caloric_intake"]);
        // 4^-0.2 ≈ 0.758 with purchasing power ≈ 1
        assert!(dear["caloric_intake"] < 0.8 * normal["caloric_intake"]);
    }
    
    #[test]
    fn test_non_positive_price_is_rejected() {
        let mut broken = IndicatorMap::new();
        broken.insert("market_price_index".into(), 0.0);
        let previous = baseline_initial_state().with_values(broken);
        
        assert!(matches!(
            run_on(&NutritionSector, &previous, &HARVEST),
            Err(SectorError::Computation(_))
        ));
    }
}
