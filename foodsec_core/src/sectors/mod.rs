//! The seven standard sector models.
//!
//! Execution order is causal:
//! ```text
//! climate → agriculture → nexus → market → policy → socioeconomic → nutrition
//! ```
//! Any influence running against this order (nutrition on labor, labor on
//! yields, adaptive capacity on climate stress, prices on demand) is read
//! from the previous year's snapshot.

pub mod agriculture;
pub mod climate;
pub mod market;
pub mod nexus;
pub mod nutrition;
pub mod policy;
pub mod socioeconomic;

pub use agriculture::AgricultureSector;
pub use climate::ClimateSector;
pub use market::MarketSector;
pub use nexus::NexusSector;
pub use nutrition::NutritionSector;
pub use policy::PolicySector;
pub use socioeconomic::SocioeconomicSector;

use crate::sector::SectorModel;
use crate::state::IndicatorMap;
use std::sync::Arc;

/// All standard sectors, in execution order.
pub fn standard_sectors() -> Vec<Arc<dyn SectorModel>> {
    vec![
        Arc::new(ClimateSector),
        Arc::new(AgricultureSector),
        Arc::new(NexusSector),
        Arc::new(MarketSector),
        Arc::new(PolicySector),
        Arc::new(SocioeconomicSector),
        Arc::new(NutritionSector),
    ]
}

/// Collects a sector's `(indicator, value)` outputs.
pub(crate) fn outputs<const N: usize>(values: [(&str, f64); N]) -> IndicatorMap {
    values
        .into_iter()
        .map(|(name, value)| (name.to_string(), value))
        .collect()
}
