//! Non-fatal run diagnostics.

use foodsec_env::Year;
use serde::{Deserialize, Serialize};

/// A finite value outside its sector-declared plausible range.
///
/// The value was clamped and the run continued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SanityBoundWarning {
    pub year: Year,
    pub sector: String,
    pub indicator: String,
    /// Value as computed by the sector
    pub value: f64,
    /// Value stored in the snapshot
    pub clamped_to: f64,
    pub min: f64,
    pub max: f64,
}

/// An optional metric input missing from the history.
///
/// The affected term was given weight zero for the listed years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataQualityWarning {
    /// Composite index component that lost the term
    pub component: String,
    pub indicator: String,
    pub years: Vec<Year>,
}

/// Anything worth surfacing about a run that did not stop it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    SanityBound(SanityBoundWarning),
    DataQuality(DataQualityWarning),
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::SanityBound(w) => write!(
                f,
                "year {}: {} produced {} = {} outside [{}, {}], clamped to {}",
                w.year, w.sector, w.indicator, w.value, w.min, w.max, w.clamped_to
            ),
            Diagnostic::DataQuality(w) => write!(
                f,
                "{}: '{}' missing in {} year(s), weighted zero",
                w.component,
                w.indicator,
                w.years.len()
            ),
        }
    }
}
