//! Market: cereal prices, self-sufficiency and imports.
//!
//! Supply is last year's harvest net of storage loss and transport
//! efficiency. Demand scales with last year's population and income. The
//! unmet gap after imports moves the price index:
//!
//! ```text
//! gap   = (demand − supply − imports) / demand
//! price = price[t-1]·(1 + speed·gap / |elasticity| + energy_pass_through·(energy[t]/energy[t-1] − 1))
//! ```

use super::outputs;
use crate::error::SectorError;
use crate::precision::clamp01;
use crate::sector::{CoefficientSpec, IndicatorSpec, SectorInputs, SectorModel};
use crate::state::IndicatorMap;

pub const NAME: &str = "market";

#[derive(Debug, Clone, Copy, Default)]
pub struct MarketSector;

impl SectorModel for MarketSector {
    fn name(&self) -> &str {
        NAME
    }
    
    fn writes(&self) -> Vec<IndicatorSpec> {
        vec![
            IndicatorSpec::bounded("market_price_index", 0.2, 5.0),
            IndicatorSpec::bounded("rice_price_retail", 1.0, 500.0),
            IndicatorSpec::bounded("self_sufficiency_ratio", 0.0, 3.0),
            IndicatorSpec::bounded("food_import_share", 0.0, 1.0),
        ]
    }
    
    fn reads_current(&self) -> Vec<&'static str> {
        vec!["energy_cost_index"]
    }
    
    fn reads_lagged(&self) -> Vec<&'static str> {
        vec![
            "rice_production_mt",
            "wheat_production_mt",
            "population_million",
            "gdp_per_capita",
            "policy_import_tariff",
            "market_price_index",
            "energy_cost_index",
        ]
    }
    
    fn coefficients(&self) -> Vec<CoefficientSpec> {
        vec![
            CoefficientSpec::new("storage_loss_rate", 0.06),
            CoefficientSpec::new("transport_efficiency", 0.95),
            CoefficientSpec::new("per_capita_cereal_kg", 210.0),
            CoefficientSpec::new("per_capita_other_use_kg", 25.0),
            CoefficientSpec::new("income_elasticity", 0.1),
            CoefficientSpec::new("reference_gdp_per_capita", 2600.0),
            CoefficientSpec::new("trade_openness", 0.9),
            CoefficientSpec::new("tariff_import_sensitivity", 2.0),
            CoefficientSpec::new("price_adjustment_speed", 0.1),
            CoefficientSpec::new("price_elasticity_demand", -0.3),
            CoefficientSpec::new("energy_pass_through", 0.1),
            CoefficientSpec::new("tariff_pass_through", 0.2),
            CoefficientSpec::new("reference_retail_price", 50.0),
        ]
    }
    
    fn update(&self, inputs: &SectorInputs<'_>) -> Result<IndicatorMap, SectorError> {
        let harvest = inputs.lagged("rice_production_mt")? + inputs.lagged("wheat_production_mt")?;
        let supply = harvest
            * (1.0 - inputs.coefficient("storage_loss_rate")?)
            * inputs.coefficient("transport_efficiency")?;
        
        let reference_gdp = inputs.coefficient("reference_gdp_per_capita")?;
        if reference_gdp <= 0.0 {
            return Err(SectorError::computation("reference GDP per capita must be positive"));
        }
        let income_effect =
            (inputs.lagged("gdp_per_capita")? / reference_gdp).powf(inputs.coefficient("income_elasticity")?);
        // million people × kg/person → Mt
        let per_capita_kg = inputs.coefficient("per_capita_cereal_kg")? + inputs.coefficient("per_capita_other_use_kg")?;
        let demand = inputs.lagged("population_million")? * per_capita_kg / 1000.0 * income_effect;
        if demand <= 0.0 || !demand.is_finite() {
            return Err(SectorError::computation(format!("cereal demand must be positive, got {}", demand)));
        }
        
        let tariff = inputs.lagged("policy_import_tariff")?;
        let import_propensity = inputs.coefficient("trade_openness")?
            * (1.0 - tariff * inputs.coefficient("tariff_import_sensitivity")?).max(0.0);
        let imports = import_propensity * (demand - supply).max(0.0);
        
        let elasticity = inputs.coefficient("price_elasticity_demand")?.abs();
        if elasticity < 1e-9 {
            return Err(SectorError::computation("price elasticity of demand must be non-zero"));
        }
        let previous_energy = inputs.lagged("energy_cost_index")?;
        let energy_change = if previous_energy > 0.0 {
            inputs.now("energy_cost_index")? / previous_energy - 1.0
        } else {
            0.0
        };
        
        let gap = (demand - supply - imports) / demand;
        let price = inputs.lagged("market_price_index")?
            * (1.0
                + inputs.coefficient("price_adjustment_speed")? * gap / elasticity
                + inputs.coefficient("energy_pass_through")? * energy_change);
        let retail = inputs.coefficient("reference_retail_price")?
            * price
            * (1.0 + inputs.coefficient("tariff_pass_through")? * tariff);
        
        Ok(outputs([
            ("market_price_index", price),
            ("rice_price_retail", retail),
            ("self_sufficiency_ratio", supply / demand),
            ("food_import_share", clamp01(imports / demand)),
        ]))
    }
}
