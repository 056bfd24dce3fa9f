//! Land-water-energy nexus: cultivated area, irrigation, water stress, energy cost.

use super::outputs;
use crate::error::SectorError;
use crate::precision::clamp01;
use crate::sector::{CoefficientSpec, IndicatorSpec, SectorInputs, SectorModel};
use crate::state::IndicatorMap;

pub const NAME: &str = "nexus";

#[derive(Debug, Clone, Copy, Default)]
pub struct NexusSector;

impl SectorModel for NexusSector {
    fn name(&self) -> &str {
        NAME
    }
    
    fn writes(&self) -> Vec<IndicatorSpec> {
        vec![
            IndicatorSpec::bounded("cultivated_area_mha", 0.0, 15.0),
            IndicatorSpec::bounded("irrigation_coverage", 0.0, 1.0),
            IndicatorSpec::bounded("water_stress_index", 0.0, 1.0),
            IndicatorSpec::bounded("energy_cost_index", 0.1, 10.0),
        ]
    }
    
    fn reads_current(&self) -> Vec<&'static str> {
        vec![
            "climate_precip_change",
            "drought_risk_index",
            "flood_risk_index",
            "technology_adoption_rate",
        ]
    }
    
    fn reads_lagged(&self) -> Vec<&'static str> {
        vec!["cultivated_area_mha", "irrigation_coverage", "energy_cost_index"]
    }
    
    fn coefficients(&self) -> Vec<CoefficientSpec> {
        vec![
            CoefficientSpec::new("area_loss_rate", 0.004),
            CoefficientSpec::new("flood_area_loss", 0.002),
            CoefficientSpec::new("irrigation_expansion", 0.02),
            CoefficientSpec::new("water_stress_base", 0.2),
            CoefficientSpec::new("water_drought_weight", 0.5),
            CoefficientSpec::new("water_irrigation_weight", 0.1),
            CoefficientSpec::new("water_precip_weight", 0.5),
            CoefficientSpec::new("water_technology_relief", 0.02),
            CoefficientSpec::new("energy_cost_growth", 0.02),
            CoefficientSpec::new("irrigation_energy_intensity", 0.3),
        ]
    }
    
    fn update(&self, inputs: &SectorInputs<'_>) -> Result<IndicatorMap, SectorError> {
        // Urbanization erodes farmland, floods add to it
        let area_loss = inputs.coefficient("area_loss_rate")?
            + inputs.coefficient("flood_area_loss")? * inputs.now("flood_risk_index")?;
        let area = inputs.lagged("cultivated_area_mha")? * (1.0 - area_loss);
        
        let previous_irrigation = inputs.lagged("irrigation_coverage")?;
        let irrigation =
            clamp01(previous_irrigation + inputs.coefficient("irrigation_expansion")? * (1.0 - previous_irrigation));
        
        let water_stress = clamp01(
            inputs.coefficient("water_stress_base")?
                + inputs.coefficient("water_drought_weight")? * inputs.now("drought_risk_index")?
                + inputs.coefficient("water_irrigation_weight")? * irrigation
                - inputs.coefficient("water_precip_weight")? * inputs.now("climate_precip_change")?
                - inputs.coefficient("water_technology_relief")? * inputs.now("technology_adoption_rate")?,
        );
        
        let energy = inputs.lagged("energy_cost_index")? * (1.0 + inputs.coefficient("energy_cost_growth")?)
            + inputs.coefficient("irrigation_energy_intensity")? * (irrigation - previous_irrigation);
        
        Ok(outputs([
            ("cultivated_area_mha", area),
            ("irrigation_coverage", irrigation),
            ("water_stress_index", water_stress),
            ("energy_cost_index", energy),
        ]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sectors::testing::run_on_baseline;
    use approx::assert_relative_eq;
    
    #[test]
    fn test_baseline_year() {
        let out = run_on_baseline(
            &NexusSector,
            &[
                ("climate_precip_change", -0.005),
                ("drought_risk_index", 0.153),
                ("flood_risk_index", 0.304),
                ("technology_adoption_rate", 0.72),
            ],
        )
        .unwrap();
        
        assert_relative_eq!(out["cultivated_area_mha"], 8.0 * (1.0 - 0.004 - 0.002 * 0.304), epsilon = 1e-12);
        assert_relative_eq!(out["irrigation_coverage"], 0.608, epsilon = 1e-12);
        assert_relative_eq!(out["water_stress_index"], 0.3254, epsilon = 1e-12);
        assert_relative_eq!(out["energy_cost_index"], 1.02 + 0.3 * 0.008, epsilon = 1e-12);
    }
}
