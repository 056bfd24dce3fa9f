//! Climate: temperature and rainfall anomalies, hazard risk, composite stress.
//!
//! Anomalies drift by scenario trends. Shocks are step functions, normally
//! supplied by one-shot interventions on `shock_magnitude`. Stress is
//! dampened by the previous year's adaptive capacity.

use super::outputs;
use crate::error::SectorError;
use crate::precision::clamp01;
use crate::sector::{CoefficientSpec, IndicatorSpec, SectorInputs, SectorModel};
use crate::state::IndicatorMap;
use rand_distr::{Distribution, Normal};

pub const NAME: &str = "climate";

#[derive(Debug, Clone, Copy, Default)]
pub struct ClimateSector;

impl SectorModel for ClimateSector {
    fn name(&self) -> &str {
        NAME
    }
    
    fn writes(&self) -> Vec<IndicatorSpec> {
        vec![
            IndicatorSpec::bounded("climate_temp_anomaly", -5.0, 10.0),
            IndicatorSpec::bounded("climate_precip_change", -0.5, 0.5),
            IndicatorSpec::bounded("climate_shock_index", 0.0, 1.0),
            IndicatorSpec::bounded("flood_risk_index", 0.0, 1.0),
            IndicatorSpec::bounded("drought_risk_index", 0.0, 1.0),
            IndicatorSpec::bounded("climate_stress_index", 0.0, 1.0),
        ]
    }
    
    fn reads_lagged(&self) -> Vec<&'static str> {
        vec![
            "climate_temp_anomaly",
            "climate_precip_change",
            "flood_risk_index",
            "drought_risk_index",
            "adaptive_capacity_index",
        ]
    }
    
    fn coefficients(&self) -> Vec<CoefficientSpec> {
        vec![
            CoefficientSpec::new("temp_anomaly_trend", 0.03),
            CoefficientSpec::new("precip_change_trend", -0.005),
            CoefficientSpec::new("flood_risk_trend", 0.004),
            CoefficientSpec::new("drought_risk_trend", 0.003),
            CoefficientSpec::new("shock_magnitude", 0.0),
            CoefficientSpec::new("stress_temp_weight", 0.15),
            CoefficientSpec::new("stress_precip_weight", 0.5),
            CoefficientSpec::new("stress_hazard_weight", 0.4),
            CoefficientSpec::new("adaptation_effectiveness", 0.3),
            CoefficientSpec::new("variability_amplitude", 0.0),
        ]
    }
    
    fn update(&self, inputs: &SectorInputs<'_>) -> Result<IndicatorMap, SectorError> {
        let amplitude = inputs.coefficient("variability_amplitude")?;
        let noise = if amplitude > 0.0 {
            let normal = Normal::new(0.0, amplitude)
                .map_err(|e| SectorError::computation(format!("temperature variability: {}", e)))?;
            normal.sample(&mut inputs.rng())
        } else {
            0.0
        };
        
        let temp = inputs.lagged("climate_temp_anomaly")? + inputs.coefficient("temp_anomaly_trend")? + noise;
        let precip = inputs.lagged("climate_precip_change")? + inputs.coefficient("precip_change_trend")?;
        let shock = clamp01(inputs.coefficient("shock_magnitude")?);
        
        let flood = clamp01(
            inputs.lagged("flood_risk_index")? + inputs.coefficient("flood_risk_trend")? + 0.5 * shock,
        );
        // Shocks only worsen drought in a drying year
        let drought = clamp01(
            inputs.lagged("drought_risk_index")?
                + inputs.coefficient("drought_risk_trend")?
                + shock * (-precip).max(0.0),
        );
        
        let exposure = inputs.coefficient("stress_temp_weight")? * temp.max(0.0)
            + inputs.coefficient("stress_precip_weight")? * precip.abs()
            + inputs.coefficient("stress_hazard_weight")? * (flood + drought) / 2.0
            + shock;
        let dampening = 1.0
            - inputs.coefficient("adaptation_effectiveness")? * inputs.lagged("adaptive_capacity_index")?;
        let stress = clamp01(exposure * dampening);
        
        Ok(outputs([
            ("climate_temp_anomaly", temp),
            ("climate_precip_change", precip),
            ("climate_shock_index", shock),
            ("flood_risk_index", flood),
            ("drought_risk_index", drought),
            ("climate_stress_index", stress),
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
        let out = run_on_baseline(&ClimateSector, &[]).unwrap();
        
        assert_relative_eq!(out["climate_temp_anomaly"], 0.03, epsilon = 1e-12);
        assert_relative_eq!(out["climate_precip_change"], -0.005, epsilon = 1e-12);
        assert_eq!(out["climate_shock_index"], 0.0);
        assert_relative_eq!(out["flood_risk_index"], 0.304, epsilon = 1e-12);
        assert_relative_eq!(out["drought_risk_index"], 0.153, epsilon = 1e-12);
        // (0.15*0.03 + 0.5*0.005 + 0.4*0.2285) * (1 - 0.3*0.4)
        assert_relative_eq!(out["climate_stress_index"], 0.086592, epsilon = 1e-12);
    }
    
    #[test]
    fn test_output_matches_declared_writes() {
        let out = run_on_baseline(&ClimateSector, &[]).unwrap();
        let declared: Vec<&str> = ClimateSector.writes().iter().map(|s| s.name).collect();
        assert_eq!(out.len(), declared.len());
        assert!(declared.iter().all(|d| out.contains_key(*d)));
    }
}
