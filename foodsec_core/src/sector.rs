//! The capability interface every sector model implements.
//!
//! A sector declares up front what it writes, what it reads (same-year or
//! lagged) and which coefficients it accepts. The registry uses these
//! declarations to order sectors and reject conflicts before any year runs.

use crate::error::SectorError;
use crate::intervention::Intervention;
use crate::state::{IndicatorMap, StateSnapshot};
use foodsec_env::Year;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::collections::{BTreeMap, BTreeSet};

/// An indicator a sector owns, with its optional plausible range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndicatorSpec {
    pub name: &'static str,
    
    /// Inclusive `(min, max)`; values outside are clamped with a warning
    pub bounds: Option<(f64, f64)>,
}

impl IndicatorSpec {
    pub const fn bounded(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            bounds: Some((min, max)),
        }
    }
    
    pub const fn unbounded(name: &'static str) -> Self {
        Self { name, bounds: None }
    }
}

/// A coefficient a sector accepts, with its default value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoefficientSpec {
    pub name: &'static str,
    pub default: f64,
}

impl CoefficientSpec {
    pub const fn new(name: &'static str, default: f64) -> Self {
        Self { name, default }
    }
}

/// One thematic subsystem of the coupled model.
///
/// # Contract
///
/// `update` must be a pure function of its [`SectorInputs`]. Implementations
/// may hold constants but no mutable state carried across years, and may
/// only draw randomness from [`SectorInputs::rng`].
///
/// Reading an indicator produced by a sector that runs later in the same
/// year is not possible: such reads must go through
/// [`SectorInputs::lagged`], which sees the previous year's value.
pub trait SectorModel: Send + Sync {
    /// Unique sector name
    fn name(&self) -> &str;
    
    /// Indicators this sector produces every year
    fn writes(&self) -> Vec<IndicatorSpec>;
    
    /// Indicators read from sectors that ran earlier in the same year
    fn reads_current(&self) -> Vec<&'static str> {
        Vec::new()
    }
    
    /// Indicators read from the previous year's snapshot
    fn reads_lagged(&self) -> Vec<&'static str> {
        Vec::new()
    }
    
    /// Coefficients accepted, with defaults
    fn coefficients(&self) -> Vec<CoefficientSpec> {
        Vec::new()
    }
    
    /// Computes this year's values for every indicator in `writes`.
    fn update(&self, inputs: &SectorInputs<'_>) -> Result<IndicatorMap, SectorError>;
}

/// The indicators one sector declared it reads, split by lag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeclaredReads {
    current: BTreeSet<String>,
    lagged: BTreeSet<String>,
}

impl DeclaredReads {
    pub fn new<'s>(
        current: impl IntoIterator<Item = &'s str>,
        lagged: impl IntoIterator<Item = &'s str>,
    ) -> Self {
        Self {
            current: current.into_iter().map(str::to_string).collect(),
            lagged: lagged.into_iter().map(str::to_string).collect(),
        }
    }
    
    /// Collects the declarations of `model`.
    pub fn of(model: &dyn SectorModel) -> Self {
        Self::new(model.reads_current(), model.reads_lagged())
    }
    
    pub fn reads_current(&self, indicator: &str) -> bool {
        self.current.contains(indicator)
    }
    
    pub fn reads_lagged(&self, indicator: &str) -> bool {
        self.lagged.contains(indicator)
    }
}

/// Everything a sector may look at while computing one year.
///
/// Indicator access is limited to the sector's [`DeclaredReads`]; any other
/// name yields [`SectorError::UndeclaredRead`].
#[derive(Debug, Clone, Copy)]
pub struct SectorInputs<'a> {
    year: Year,
    reads: &'a DeclaredReads,
    previous: &'a StateSnapshot,
    current: &'a IndicatorMap,
    coefficients: &'a BTreeMap<String, f64>,
    interventions: &'a [&'a Intervention],
    seed: u64,
}

impl<'a> SectorInputs<'a> {
    /// Assembles the inputs for one sector call.
    ///
    /// `previous` is the last finalized snapshot with this year's indicator
    /// overrides applied; `current` holds what upstream sectors already
    /// produced this year.
    pub fn new(
        year: Year,
        reads: &'a DeclaredReads,
        previous: &'a StateSnapshot,
        current: &'a IndicatorMap,
        coefficients: &'a BTreeMap<String, f64>,
        interventions: &'a [&'a Intervention],
        seed: u64,
    ) -> Self {
        Self {
            year,
            reads,
            previous,
            current,
            coefficients,
            interventions,
            seed,
        }
    }
    
    /// The year being computed.
    pub fn year(&self) -> Year {
        self.year
    }
    
    /// Previous year's value of an indicator.
    pub fn lagged(&self, indicator: &str) -> Result<f64, SectorError> {
        if !self.reads.reads_lagged(indicator) {
            return Err(SectorError::UndeclaredRead(indicator.to_string()));
        }
        self.previous
            .get(indicator)
            .ok_or_else(|| SectorError::MissingInput(indicator.to_string()))
    }
    
    /// Value produced earlier this year by an upstream sector.
    pub fn now(&self, indicator: &str) -> Result<f64, SectorError> {
        if !self.reads.reads_current(indicator) {
            return Err(SectorError::UndeclaredRead(indicator.to_string()));
        }
        self.current
            .get(indicator)
            .copied()
            .ok_or_else(|| SectorError::NotYetProduced(indicator.to_string()))
    }
    
    /// This year's effective coefficient (defaults, scenario overrides and
    /// active interventions already applied).
    pub fn coefficient(&self, name: &str) -> Result<f64, SectorError> {
        self.coefficients
            .get(name)
            .copied()
            .ok_or_else(|| SectorError::MissingCoefficient(name.to_string()))
    }
    
    /// Interventions active this year, in declaration order.
    pub fn interventions(&self) -> &[&'a Intervention] {
        self.interventions
    }
    
    /// RNG seeded from (scenario, year, sector).
    pub fn rng(&self) -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(self.seed)
    }
}
