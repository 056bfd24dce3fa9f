//! FoodSec Core - Coupled Multi-Sector Food-Security Simulation
//!
//! Advances a shared system state year by year through seven interacting
//! sector models and derives composite food-security indices:
//!
//! ```text
//! ScenarioConfig ──► SimulationEngine ──► History ──► MetricsAggregator
//!                        │
//!        climate → agriculture → nexus → market → policy → socioeconomic → nutrition
//! ```
//!
//! Circular causality (nutrition → labor → yields → prices → nutrition) is
//! broken with a one-year lag: a sector sees the current year's value only
//! for indicators produced by sectors ahead of it, and the previous year's
//! value for everything else. Each year is therefore a single deterministic
//! pass with no fixed-point iteration, and results differ from a
//! simultaneous-equation solution.

pub mod baseline;
pub mod diagnostics;
pub mod engine;
pub mod error;
pub mod intervention;
pub mod metrics;
pub mod precision;
pub mod registry;
pub mod scenario;
pub mod sector;
pub mod sectors;
pub mod state;

// Re-export key types for convenience
pub use baseline::{baseline_initial_state, BASELINE_YEAR, PROJECTION_END};
pub use diagnostics::{DataQualityWarning, Diagnostic, SanityBoundWarning};
pub use engine::{EngineRun, SimulationEngine};
pub use error::{ConfigurationError, SectorError, SimulationError};
pub use intervention::{Adjustment, Intervention, InterventionTarget, Persistence};
pub use metrics::{CompositeWeights, MetricsAggregator, MetricsConfig, MetricsResult};
pub use registry::{Placement, SectorPlan, SectorRegistry};
pub use scenario::{Coefficients, Horizon, ScenarioConfig};
pub use sector::{CoefficientSpec, DeclaredReads, IndicatorSpec, SectorInputs, SectorModel};
pub use state::{History, IndicatorMap, StateSnapshot};
