//! Agriculture: cereal yields, production, technology and diversification.
//!
//! # Yield growth trend (per crop)
//!
//! ```text
//! growth  = trend + tech_yield_gain·tech[t-1] + subsidy_yield_response·subsidy[t-1]
//!         + labor_yield_elasticity·(labor[t-1] − 1)
//!         − water_stress_yield_penalty·water_stress[t-1]
//! climate = 1 + climate_sensitivity·(stress[t] − stress[t-1])
//! shock   = 1 − shock_yield_loss·shock[t]
//! yield   = yield[t-1]·(1 + growth)·climate·shock
//! ```
//!
//! Labor productivity, subsidies and water stress come from sectors that run
//! later in the year and are therefore read with a one-year lag.

use super::outputs;
use crate::error::SectorError;
use crate::sector::{CoefficientSpec, IndicatorSpec, SectorInputs, SectorModel};
use crate::state::IndicatorMap;

pub const NAME: &str = "agriculture";

#[derive(Debug, Clone, Copy, Default)]
pub struct AgricultureSector;

/// Per-crop parameters of the yield formula.
struct Crop {
    yield_indicator: &'static str,
    production_indicator: &'static str,
    trend: &'static str,
    climate_sensitivity: &'static str,
    reference_production: &'static str,
}

const RICE: Crop = Crop {
    yield_indicator: "crop_yield_rice",
    production_indicator: "rice_production_mt",
    trend: "rice_yield_trend",
    climate_sensitivity: "rice_climate_sensitivity",
    reference_production: "reference_rice_production_mt",
};

const WHEAT: Crop = Crop {
    yield_indicator: "crop_yield_wheat",
    production_indicator: "wheat_production_mt",
    trend: "wheat_yield_trend",
    climate_sensitivity: "wheat_climate_sensitivity",
    reference_production: "reference_wheat_production_mt",
};

impl AgricultureSector {
    /// Shared part of the growth rate (everything but the crop trend).
    fn common_growth(inputs: &SectorInputs<'_>) -> Result<f64, SectorError> {
        Ok(inputs.coefficient("tech_yield_gain")? * inputs.lagged("technology_adoption_rate")?
            + inputs.coefficient("subsidy_yield_response")? * inputs.lagged("policy_subsidy_level")?
            + inputs.coefficient("labor_yield_elasticity")? * (inputs.lagged("labor_productivity_index")? - 1.0)
            - inputs.coefficient("water_stress_yield_penalty")? * inputs.lagged("water_stress_index")?)
    }
    
    /// Returns `(yield, production)` for one crop.
    fn crop(inputs: &SectorInputs<'_>, crop: &Crop, common_growth: f64) -> Result<(f64, f64), SectorError> {
        let stress_change = inputs.now("climate_stress_index")? - inputs.lagged("climate_stress_index")?;
        
        let growth = inputs.coefficient(crop.trend)? + common_growth;
        let climate = 1.0 + inputs.coefficient(crop.climate_sensitivity)? * stress_change;
        let shock = 1.0 - inputs.coefficient("shock_yield_loss")? * inputs.now("climate_shock_index")?;
        let yield_index = inputs.lagged(crop.yield_indicator)? * (1.0 + growth) * climate * shock;
        
        let reference_yield = inputs.coefficient("reference_yield")?;
        let reference_area = inputs.coefficient("reference_area_mha")?;
        if reference_yield <= 0.0 || reference_area <= 0.0 {
            return Err(SectorError::computation("reference yield and area must be positive"));
        }
        let area_share = inputs.lagged("cultivated_area_mha")? / reference_area;
        let production =
            inputs.coefficient(crop.reference_production)? * (yield_index / reference_yield) * area_share;
        
        Ok((yield_index, production))
    }
    
    /// Moves `current` a fraction `speed` of the way toward `target`.
    fn approach(current: f64, target: f64, speed: f64) -> f64 {
        current + speed * (target - current)
    }
}

impl SectorModel for AgricultureSector {
    fn name(&self) -> &str {
        NAME
    }
    
    fn writes(&self) -> Vec<IndicatorSpec> {
        vec![
            IndicatorSpec::bounded("crop_yield_rice", 0.0, 1000.0),
            IndicatorSpec::bounded("crop_yield_wheat", 0.0, 1000.0),
            IndicatorSpec::bounded("rice_production_mt", 0.0, 200.0),
            IndicatorSpec::bounded("wheat_production_mt", 0.0, 50.0),
            IndicatorSpec::bounded("technology_adoption_rate", 0.0, 1.0),
            IndicatorSpec::bounded("crop_diversification_index", 0.0, 1.0),
        ]
    }
    
    fn reads_current(&self) -> Vec<&'static str> {
        vec!["climate_stress_index", "climate_shock_index"]
    }
    
    fn reads_lagged(&self) -> Vec<&'static str> {
        vec![
            "crop_yield_rice",
            "crop_yield_wheat",
            "technology_adoption_rate",
            "crop_diversification_index",
            "climate_stress_index",
            "policy_subsidy_level",
            "labor_productivity_index",
            "water_stress_index",
            "cultivated_area_mha",
        ]
    }
    
    fn coefficients(&self) -> Vec<CoefficientSpec> {
        vec![
            CoefficientSpec::new("rice_yield_trend", 0.01),
            CoefficientSpec::new("wheat_yield_trend", 0.015),
            CoefficientSpec::new("tech_yield_gain", 0.005),
            CoefficientSpec::new("subsidy_yield_response", 0.02),
            CoefficientSpec::new("labor_yield_elasticity", 0.1),
            CoefficientSpec::new("water_stress_yield_penalty", 0.01),
            CoefficientSpec::new("rice_climate_sensitivity", -0.4),
            CoefficientSpec::new("wheat_climate_sensitivity", -0.6),
            CoefficientSpec::new("shock_yield_loss", 0.3),
            CoefficientSpec::new("reference_rice_production_mt", 38.0),
            CoefficientSpec::new("reference_wheat_production_mt", 1.2),
            CoefficientSpec::new("reference_yield", 100.0),
            CoefficientSpec::new("reference_area_mha", 8.0),
            CoefficientSpec::new("technology_target", 0.9),
            CoefficientSpec::new("technology_adoption_speed", 0.1),
            CoefficientSpec::new("diversification_target", 0.5),
            CoefficientSpec::new("diversification_speed", 0.05),
        ]
    }
    
    fn update(&self, inputs: &SectorInputs<'_>) -> Result<IndicatorMap, SectorError> {
        let common = Self::common_growth(inputs)?;
        let (rice_yield, rice_production) = Self::crop(inputs, &RICE, common)?;
        let (wheat_yield, wheat_production) = Self::crop(inputs, &WHEAT, common)?;
        
        let technology = Self::approach(
            inputs.lagged("technology_adoption_rate")?,
            inputs.coefficient("technology_target")?,
            inputs.coefficient("technology_adoption_speed")?,
        );
        let diversification = Self::approach(
            inputs.lagged("crop_diversification_index")?,
            inputs.coefficient("diversification_target")?,
            inputs.coefficient("diversification_speed")?,
        );
        
        Ok(outputs([
            ("crop_yield_rice", rice_yield),
            ("crop_yield_wheat", wheat_yield),
            ("rice_production_mt", rice_production),
            ("wheat_production_mt", wheat_production),
            ("technology_adoption_rate", technology),
            ("crop_diversification_index", diversification),
        ]))
    }
}
