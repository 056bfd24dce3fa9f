//! Sector registration and static dependency checking.
//!
//! Sectors are registered with a placement relative to one another. Building
//! the registry validates every declaration and produces a [`SectorPlan`]:
//! the fixed execution order plus the indicator schema. Write conflicts,
//! unresolved reads and cycles are all rejected here, before any year is
//! simulated.

use crate::error::ConfigurationError;
use crate::sector::{DeclaredReads, SectorModel};
use crate::sectors;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// Where a sector runs relative to already-known sectors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// No explicit constraint beyond same-year reads
    First,
    /// Runs after the named sector
    After(String),
    /// Runs before the named sector
    Before(String),
}

impl Placement {
    pub fn after(anchor: &str) -> Self {
        Self::After(anchor.to_string())
    }
    
    pub fn before(anchor: &str) -> Self {
        Self::Before(anchor.to_string())
    }
}

/// Owner and plausible range of one schema indicator.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorOwner {
    pub sector: String,
    pub bounds: Option<(f64, f64)>,
}

/// Open set of sector models awaiting validation.
#[derive(Clone, Default)]
pub struct SectorRegistry {
    entries: Vec<(Arc<dyn SectorModel>, Placement)>,
}

impl SectorRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }
    
    /// The seven standard sectors in causal order:
    /// climate, agriculture, nexus, market, policy, socioeconomic, nutrition.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        let mut previous: Option<String> = None;
        for model in sectors::standard_sectors() {
            let placement = match previous.take() {
                Some(anchor) => Placement::After(anchor),
                None => Placement::First,
            };
            previous = Some(model.name().to_string());
            registry.register(model, placement);
        }
        registry
    }
    
    /// Adds a sector. Validation is deferred to [`SectorRegistry::build`].
    pub fn register(&mut self, model: Arc<dyn SectorModel>, placement: Placement) -> &mut Self {
        self.entries.push((model, placement));
        self
    }
    
    /// Builder-style [`SectorRegistry::register`].
    pub fn with_sector(mut self, model: Arc<dyn SectorModel>, placement: Placement) -> Self {
        self.register(model, placement);
        self
    }
    
    /// Registered sector names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.entries.iter().map(|(m, _)| m.name()).collect()
    }
    
    /// Validates all declarations and fixes the execution order.
    ///
    /// Edges come from placements and from same-year reads (producer before
    /// reader). Among sectors free to run, registration order wins, so the
    /// resulting order is deterministic.
    pub fn build(&self) -> Result<SectorPlan, ConfigurationError> {
        // Names
        let mut index: BTreeMap<&str, usize> = BTreeMap::new();
        for (i, (model, _)) in self.entries.iter().enumerate() {
            if index.insert(model.name(), i).is_some() {
                return Err(ConfigurationError::DuplicateSector {
                    name: model.name().to_string(),
                });
            }
        }
        
        // Write ownership
        let mut schema: BTreeMap<String, IndicatorOwner> = BTreeMap::new();
        for (model, _) in &self.entries {
            for spec in model.writes() {
                if let Some(owner) = schema.get(spec.name) {
                    return Err(ConfigurationError::ConflictingWrites {
                        indicator: spec.name.to_string(),
                        first: owner.sector.clone(),
                        second: model.name().to_string(),
                    });
                }
                schema.insert(
                    spec.name.to_string(),
                    IndicatorOwner {
                        sector: model.name().to_string(),
                        bounds: spec.bounds,
                    },
                );
            }
        }
        
        // Placement anchors and reads
        let n = self.entries.len();
        let mut edges: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); n];
        for (i, (model, placement)) in self.entries.iter().enumerate() {
            match placement {
                Placement::First => {}
                Placement::After(anchor) | Placement::Before(anchor) => {
                    let &a = index.get(anchor.as_str()).ok_or_else(|| {
                        ConfigurationError::UnknownPlacementAnchor {
                            sector: model.name().to_string(),
                            anchor: anchor.clone(),
                        }
                    })?;
                    if a == i {
                        return Err(ConfigurationError::CyclicDependency {
                            sectors: vec![model.name().to_string()],
                        });
                    }
                    if matches!(placement, Placement::After(_)) {
                        edges[a].insert(i);
                    } else {
                        edges[i].insert(a);
                    }
                }
            }
            
            for indicator in model.reads_lagged() {
                if !schema.contains_key(indicator) {
                    return Err(ConfigurationError::UnresolvedRead {
                        sector: model.name().to_string(),
                        indicator: indicator.to_string(),
                    });
                }
            }
            
            for indicator in model.reads_current() {
                let owner = schema.get(indicator).ok_or_else(|| {
                    ConfigurationError::UnresolvedRead {
                        sector: model.name().to_string(),
                        indicator: indicator.to_string(),
                    }
                })?;
                let &producer = index.get(owner.sector.as_str()).ok_or_else(|| {
                    ConfigurationError::UnresolvedRead {
                        sector: model.name().to_string(),
                        indicator: indicator.to_string(),
                    }
                })?;
                if producer == i {
                    // Reading your own output in the same year can never be satisfied
                    return Err(ConfigurationError::CyclicDependency {
                        sectors: vec![model.name().to_string()],
                    });
                }
                edges[producer].insert(i);
            }
        }
        
        // Kahn's algorithm, lowest registration index first
        let mut in_degree = vec![0usize; n];
        for targets in &edges {
            for &t in targets {
                in_degree[t] += 1;
            }
        }
        let mut ready: BTreeSet<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(next) = ready.pop_first() {
            order.push(next);
            for &t in &edges[next] {
                in_degree[t] -= 1;
                if in_degree[t] == 0 {
                    ready.insert(t);
                }
            }
        }
        
        if order.len() < n {
            let placed: BTreeSet<usize> = order.iter().copied().collect();
            let sectors = (0..n)
                .filter(|i| !placed.contains(i))
                .map(|i| self.entries[i].0.name().to_string())
                .collect();
            return Err(ConfigurationError::CyclicDependency { sectors });
        }
        
        let sectors: Vec<Arc<dyn SectorModel>> =
            order.iter().map(|&i| Arc::clone(&self.entries[i].0)).collect();
        let coefficients = sectors
            .iter()
            .map(|s| {
                let defaults = s
                    .coefficients()
                    .into_iter()
                    .map(|c| (c.name.to_string(), c.default))
                    .collect();
                (s.name().to_string(), defaults)
            })
            .collect();
        let reads = sectors
            .iter()
            .map(|s| (s.name().to_string(), DeclaredReads::of(s.as_ref())))
            .collect();
        
        let plan = SectorPlan {
            sectors,
            schema,
            coefficients,
            reads,
        };
        debug!(order = ?plan.order(), indicators = plan.schema.len(), "Sector plan built");
        Ok(plan)
    }
}

impl std::fmt::Debug for SectorRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectorRegistry")
            .field("sectors", &self.names())
            .finish()
    }
}

/// A validated, ordered set of sectors and the schema they produce.
#[derive(Clone)]
pub struct SectorPlan {
    sectors: Vec<Arc<dyn SectorModel>>,
    schema: BTreeMap<String, IndicatorOwner>,
    coefficients: BTreeMap<String, BTreeMap<String, f64>>,
    reads: BTreeMap<String, DeclaredReads>,
}

impl SectorPlan {
    /// Sectors in execution order.
    pub fn sectors(&self) -> &[Arc<dyn SectorModel>] {
        &self.sectors
    }
    
    /// Sector names in execution order.
    pub fn order(&self) -> Vec<&str> {
        self.sectors.iter().map(|s| s.name()).collect()
    }
    
    /// Every indicator a snapshot must contain, in name order.
    pub fn indicators(&self) -> impl Iterator<Item = &str> {
        self.schema.keys().map(String::as_str)
    }
    
    /// Owner and bounds of an indicator.
    pub fn owner(&self, indicator: &str) -> Option<&IndicatorOwner> {
        self.schema.get(indicator)
    }
    
    /// Default coefficients per sector.
    pub fn default_coefficients(&self) -> &BTreeMap<String, BTreeMap<String, f64>> {
        &self.coefficients
    }
    
    /// Returns true if `sector` declares coefficient `name`.
    pub fn has_coefficient(&self, sector: &str, name: &str) -> bool {
        self.coefficients
            .get(sector)
            .is_some_and(|c| c.contains_key(name))
    }
    
    /// Reads declared by `sector`.
    pub fn declared_reads(&self, sector: &str) -> Option<&DeclaredReads> {
        self.reads.get(sector)
    }
    
    /// Returns true if some sector reads `indicator` from the previous year.
    pub fn is_read_lagged(&self, indicator: &str) -> bool {
        self.reads.values().any(|r| r.reads_lagged(indicator))
    }
}

impl std::fmt::Debug for SectorPlan {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SectorPlan")
            .field("order", &self.order())
            .field("indicators", &self.schema.len())
            .finish()
    }
}
