//! Socioeconomic: population, income, poverty, labor and household capacity.
//!
//! Poverty follows a GDP relation with a floor, reduced by safety-net
//! coverage:
//!
//! ```text
//! poverty = max(floor, intercept − (gdp − gdp_ref) / gdp_scale) · (1 − reduction·coverage)
//! ```
//!
//! Stunting feeds back into labor productivity with a one-year lag.

use super::outputs;
use crate::error::SectorError;
use crate::precision::clamp01;
use crate::sector::{CoefficientSpec, IndicatorSpec, SectorInputs, SectorModel};
use crate::state::IndicatorMap;

pub const NAME: &str = "socioeconomic";

#[derive(Debug, Clone, Copy, Default)]
pub struct SocioeconomicSector;

impl SectorModel for SocioeconomicSector {
    fn name(&self) -> &str {
        NAME
    }
    
    fn writes(&self) -> Vec<IndicatorSpec> {
        vec![
            IndicatorSpec::bounded("population_million", 50.0, 400.0),
            IndicatorSpec::bounded("gdp_per_capita", 100.0, 50_000.0),
            IndicatorSpec::bounded("poverty_rate", 0.0, 1.0),
            IndicatorSpec::bounded("labor_productivity_index", 0.1, 3.0),
            IndicatorSpec::bounded("household_purchasing_power", 0.0, 5.0),
            IndicatorSpec::bounded("health_service_coverage", 0.0, 1.0),
            IndicatorSpec::bounded("adaptive_capacity_index", 0.0, 1.0),
        ]
    }
    
    fn reads_current(&self) -> Vec<&'static str> {
        vec!["climate_stress_index", "market_price_index", "safety_net_coverage"]
    }
    
    fn reads_lagged(&self) -> Vec<&'static str> {
        vec![
            "population_million",
            "gdp_per_capita",
            "labor_productivity_index",
            "health_service_coverage",
            "adaptive_capacity_index",
            "stunting_rate",
        ]
    }
    
    fn coefficients(&self) -> Vec<CoefficientSpec> {
        vec![
            CoefficientSpec::new("population_growth", 0.01),
            CoefficientSpec::new("gdp_growth", 0.065),
            CoefficientSpec::new("stress_growth_penalty", 0.05),
            CoefficientSpec::new("poverty_floor", 0.1),
            CoefficientSpec::new("poverty_intercept", 0.25),
            CoefficientSpec::new("poverty_gdp_reference", 2200.0),
            CoefficientSpec::new("poverty_gdp_scale", 5000.0),
            CoefficientSpec::new("safety_net_poverty_reduction", 0.3),
            CoefficientSpec::new("labor_growth", 0.01),
            CoefficientSpec::new("stunting_labor_penalty", 0.5),
            CoefficientSpec::new("reference_stunting_rate", 0.28),
            CoefficientSpec::new("reference_gdp_per_capita", 2600.0),
            CoefficientSpec::new("safety_net_transfer_value", 0.15),
            CoefficientSpec::new("health_expansion", 0.02),
            CoefficientSpec::new("adaptive_capacity_growth", 0.02),
        ]
    }
    
    fn update(&self, inputs: &SectorInputs<'_>) -> Result<IndicatorMap, SectorError> {
        let population = inputs.lagged("population_million")? * (1.0 + inputs.coefficient("population_growth")?);
        
        let growth = inputs.coefficient("gdp_growth")?
            - inputs.coefficient("stress_growth_penalty")? * inputs.now("climate_stress_index")?;
        let gdp = inputs.lagged("gdp_per_capita")? * (1.0 + growth);
        
        let coverage = inputs.now("safety_net_coverage")?;
        let scale = inputs.coefficient("poverty_gdp_scale")?;
        if scale <= 0.0 {
            return Err(SectorError::computation("poverty GDP scale must be positive"));
        }
        let gdp_poverty = (inputs.coefficient("poverty_intercept")?
            - (gdp - inputs.coefficient("poverty_gdp_reference")?) / scale)
            .max(inputs.coefficient("poverty_floor")?);
        let poverty = clamp01(gdp_poverty * (1.0 - inputs.coefficient("safety_net_poverty_reduction")? * coverage));
        
        let stunting_excess = inputs.lagged("stunting_rate")? - inputs.coefficient("reference_stunting_rate")?;
        let labor = inputs.lagged("labor_productivity_index")?
            * (1.0 + inputs.coefficient("labor_growth")?)
            * (1.0 - inputs.coefficient("stunting_labor_penalty")? * stunting_excess);
        
        let price = inputs.now("market_price_index")?;
        let reference_gdp = inputs.coefficient("reference_gdp_per_capita")?;
        if price <= 0.0 || reference_gdp <= 0.0 {
            return Err(SectorError::computation("price index and reference GDP must be positive"));
        }
        let purchasing_power =
            gdp / reference_gdp * (1.0 + inputs.coefficient("safety_net_transfer_value")? * coverage) / price;
        
        let health = inputs.lagged("health_service_coverage")?;
        let health = clamp01(health + inputs.coefficient("health_expansion")? * (1.0 - health));
        let adaptive = inputs.lagged("adaptive_capacity_index")?;
        let adaptive = clamp01(adaptive + inputs.coefficient("adaptive_capacity_growth")? * (1.0 - adaptive));
        
        Ok(outputs([
            ("population_million", population),
            ("gdp_per_capita", gdp),
            ("poverty_rate", poverty),
            ("labor_productivity_index", labor),
            ("household_purchasing_power", purchasing_power),
            ("health_service_coverage", health),
            ("adaptive_capacity_index", adaptive),
        ]))
    }
}
