//! Policy and governance levers.
//!
//! Levels carry over unchanged from the previous snapshot. Because indicator
//! interventions are applied to that snapshot before sectors run, a lever
//! changes only when an intervention sets it and then stays put until the
//! next one.

use super::outputs;
use crate::error::SectorError;
use crate::sector::{IndicatorSpec, SectorInputs, SectorModel};
use crate::state::IndicatorMap;

pub const NAME: &str = "policy";

const LEVERS: [&str; 3] = ["policy_subsidy_level", "safety_net_coverage", "policy_import_tariff"];

#[derive(Debug, Clone, Copy, Default)]
pub struct PolicySector;

impl SectorModel for PolicySector {
    fn name(&self) -> &str {
        NAME
    }
    
    fn writes(&self) -> Vec<IndicatorSpec> {
        vec![
            IndicatorSpec::bounded("policy_subsidy_level", 0.0, 1.0),
            IndicatorSpec::bounded("safety_net_coverage", 0.0, 1.0),
            IndicatorSpec::bounded("policy_import_tariff", 0.0, 1.0),
            IndicatorSpec::bounded("policy_active_interventions", 0.0, 10_000.0),
        ]
    }
    
    fn reads_lagged(&self) -> Vec<&'static str> {
        LEVERS.to_vec()
    }
    
    fn update(&self, inputs: &SectorInputs<'_>) -> Result<IndicatorMap, SectorError> {
        let mut out = IndicatorMap::new();
        for lever in LEVERS {
            out.insert(lever.to_string(), inputs.lagged(lever)?);
        }
        out.extend(outputs([(
            "policy_active_interventions",
            inputs.interventions().len() as f64,
        )]));
        Ok(out)
    }
}
