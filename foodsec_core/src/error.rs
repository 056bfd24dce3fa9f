//! Error taxonomy for the simulation engine.
//!
//! Fatal conditions are `Err` values. Non-fatal ones (clamped values,
//! missing optional metric inputs) live in [`crate::diagnostics`] and are
//! accumulated rather than raised.

use foodsec_env::Year;
use thiserror::Error;

/// A scenario or sector set that cannot be run.
///
/// Always detected before the first simulated year.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    /// The initial snapshot lacks an indicator declared by a sector
    #[error("initial state is missing indicator '{indicator}'")]
    MissingInitialIndicator { indicator: String },
    
    /// The initial snapshot carries an indicator no sector produces
    #[error("initial state contains unknown indicator '{indicator}'")]
    UnknownInitialIndicator { indicator: String },
    
    /// The initial snapshot carries NaN or infinity
    #[error("initial value of '{indicator}' is not finite ({value})")]
    NonFiniteInitialValue { indicator: String, value: f64 },
    
    /// A coefficient names a sector or parameter that is not declared
    #[error("unknown coefficient '{sector}.{name}'")]
    UnknownCoefficient { sector: String, name: String },
    
    /// A coefficient is NaN or infinite
    #[error("coefficient '{sector}.{name}' is not finite ({value})")]
    NonFiniteCoefficient { sector: String, name: String, value: f64 },
    
    /// An intervention targets a parameter or indicator that does not exist
    #[error("intervention '{label}' targets unknown parameter '{target}'")]
    UnknownInterventionTarget { label: String, target: String },
    
    /// An indicator override that no sector would ever observe
    #[error("intervention '{label}' overrides '{indicator}', which no sector reads from the previous year")]
    IneffectiveOverride { label: String, indicator: String },
    
    /// An intervention carries a non-finite adjustment
    #[error("intervention '{label}' has a non-finite adjustment")]
    NonFiniteIntervention { label: String },
    
    /// Two sectors declare ownership of the same indicator
    #[error("indicator '{indicator}' is written by both '{first}' and '{second}'")]
    ConflictingWrites {
        indicator: String,
        first: String,
        second: String,
    },
    
    /// Ordering constraints between sectors form a cycle
    #[error("cyclic sector dependency among: {}", sectors.join(", "))]
    CyclicDependency { sectors: Vec<String> },
    
    /// Two sectors registered under one name
    #[error("sector '{name}' is registered twice")]
    DuplicateSector { name: String },
    
    /// A placement refers to a sector that is not registered
    #[error("sector '{sector}' is placed relative to unknown sector '{anchor}'")]
    UnknownPlacementAnchor { sector: String, anchor: String },
    
    /// A sector reads an indicator that no sector produces
    #[error("sector '{sector}' reads undeclared indicator '{indicator}'")]
    UnresolvedRead { sector: String, indicator: String },
    
    /// The horizon does not start the year after the initial snapshot
    #[error("horizon {first}..={last} does not follow initial year {initial_year}")]
    HorizonMismatch {
        initial_year: Year,
        first: Year,
        last: Year,
    },
}

/// A sector model could not compute its update.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SectorError {
    /// A lagged input is absent from the previous snapshot
    #[error("missing input indicator '{0}'")]
    MissingInput(String),
    
    /// A same-year input has not been produced by an upstream sector
    #[error("indicator '{0}' has not been produced earlier this year")]
    NotYetProduced(String),
    
    /// The sector read an indicator it did not declare
    #[error("indicator '{0}' is not among the sector's declared reads")]
    UndeclaredRead(String),
    
    /// A coefficient was not resolved for this sector
    #[error("missing coefficient '{0}'")]
    MissingCoefficient(String),
    
    /// Any other domain failure
    #[error("computation failed: {0}")]
    Computation(String),
}

impl SectorError {
    /// Creates a computation error.
    pub fn computation(msg: impl Into<String>) -> Self {
        Self::Computation(msg.into())
    }
}

/// Fatal failure of a simulation run.
///
/// The engine stops at the failing year and hands back the history
/// accumulated so far alongside this error.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
    
    /// Two sectors wrote the same indicator in one year
    #[error("year {year}: indicator '{indicator}' written by both '{first}' and '{second}'")]
    MergeConflict {
        year: Year,
        indicator: String,
        first: String,
        second: String,
    },
    
    /// A sector produced NaN or infinity
    #[error("year {year}: sector '{sector}' produced non-finite '{indicator}' ({value})")]
    NumericInvalid {
        year: Year,
        sector: String,
        indicator: String,
        value: f64,
    },
    
    /// A sector returned an error
    #[error("year {year}: sector '{sector}' failed: {source}")]
    Sector {
        year: Year,
        sector: String,
        #[source]
        source: SectorError,
    },
    
    /// A sector wrote an indicator it did not declare
    #[error("year {year}: sector '{sector}' wrote undeclared indicator '{indicator}'")]
    UndeclaredWrite {
        year: Year,
        sector: String,
        indicator: String,
    },
    
    /// A declared indicator was not produced
    #[error("year {year}: indicator '{indicator}' was not produced")]
    MissingIndicator { year: Year, indicator: String },
    
    /// The caller cancelled the run between years
    #[error("cancelled before simulating year {next_year}")]
    Cancelled { next_year: Year },
}

impl SimulationError {
    /// Returns the sector names involved, when the error names any.
    pub fn sectors(&self) -> Vec<&str> {
        match self {
            Self::Configuration(ConfigurationError::ConflictingWrites { first, second, .. })
            | Self::MergeConflict { first, second, .. } => vec![first.as_str(), second.as_str()],
            Self::Configuration(ConfigurationError::CyclicDependency { sectors }) => {
                sectors.iter().map(String::as_str).collect()
            }
            Self::NumericInvalid { sector, .. }
            | Self::Sector { sector, .. }
            | Self::UndeclaredWrite { sector, .. } => vec![sector.as_str()],
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conflict_message_names_both_sectors() {
        let err = SimulationError::from(ConfigurationError::ConflictingWrites {
            indicator: "market_price_index".into(),
            first: "market".into(),
            second: "shadow_market".into(),
        });

        let msg = err.to_string();
        assert!(msg.contains("market_price_index"));
        assert!(msg.contains("'market'"));
        assert!(msg.contains("'shadow_market'"));
        assert_eq!(err.sectors(), vec!["market", "shadow_market"]);
    }
}
