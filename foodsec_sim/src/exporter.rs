//! JSON export of runner output for reporting and visualization tools.
//!
//! The export is plain data (`year → indicator → value` tables and metric
//! series); no engine types leak into it.

use crate::comparison::ScenarioComparison;
use crate::error::RunnerError;
use crate::runner::{KeyMetrics, ScenarioOutcome};
use foodsec_core::{Diagnostic, IndicatorMap};
use foodsec_env::Year;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// One scenario run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioExport {
    /// Scenario name
    pub scenario: String,
    
    /// Run identifier (full UUID)
    pub run_id: String,
    
    /// Seed used
    pub seed: u64,
    
    /// `completed`, `completed_with_warnings` or `failed`
    pub status: String,
    
    /// Failure reason, if the run failed
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub failure: Option<String>,
    
    /// Year → indicator → value
    pub history: BTreeMap<Year, IndicatorMap>,
    
    /// Index → year → value
    pub metrics: BTreeMap<String, BTreeMap<Year, f64>>,
    
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub diagnostics: Vec<Diagnostic>,
    
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub key_metrics: Option<KeyMetrics>,
}

impl From<&ScenarioOutcome> for ScenarioExport {
    fn from(outcome: &ScenarioOutcome) -> Self {
        Self {
            scenario: outcome.scenario.clone(),
            run_id: outcome.run_id.as_uuid().to_string(),
            seed: outcome.seed,
            status: outcome.status.label().to_string(),
            failure: outcome.failure().map(ToString::to_string),
            history: outcome.history.to_table(),
            metrics: outcome.metrics.series.clone(),
            diagnostics: outcome.diagnostics.clone(),
            key_metrics: outcome.key_metrics(),
        }
    }
}

/// Several runs plus an optional comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchExport {
    pub scenarios: Vec<ScenarioExport>,
    
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub comparison: Option<ScenarioComparison>,
}

impl BatchExport {
    pub fn new(outcomes: &[ScenarioOutcome]) -> Self {
        Self {
            scenarios: outcomes.iter().map(ScenarioExport::from).collect(),
            comparison: None,
        }
    }
    
    /// Attaches a comparison against `reference`.
    pub fn with_comparison(mut self, comparison: ScenarioComparison) -> Self {
        self.comparison = Some(comparison);
        self
    }
}

/// Shared JSON output for export documents.
pub trait JsonExport: Serialize {
    /// Pretty-printed JSON.
    fn to_json(&self) -> Result<String, RunnerError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
    
    /// Writes pretty-printed JSON to `writer`.
    fn write_to<W: Write>(&self, writer: W) -> Result<(), RunnerError> {
        let mut writer = BufWriter::new(writer);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
    
    /// Writes pretty-printed JSON to a file, replacing it.
    fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), RunnerError> {
        self.write_to(File::create(path)?)
    }
}

impl JsonExport for ScenarioExport {}
impl JsonExport for BatchExport {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runner::ScenarioRunner;
    use crate::scenarios::ScenarioId;
    
    #[test]
    fn test_export_is_plain_nested_mapping() {
        let outcome = ScenarioRunner::new()
            .with_final_year(2027)
            .execute(&ScenarioId::SubsidyExpansion.config());
        let export = ScenarioExport::from(&outcome);
        
        let json: serde_json::Value = serde_json::from_str(&export.to_json().unwrap()).unwrap();
        assert_eq!(json["scenario"], "subsidy_expansion");
        assert_eq!(json["history"]["2027"]["policy_subsidy_level"], 0.5);
        assert_eq!(json["history"].as_object().unwrap().len(), 3);
        assert!(json["metrics"]["food_security_index"]["2025"].is_number());
    }
    
    #[test]
    fn test_batch_written_to_writer_parses_back() {
        let outcomes = vec![ScenarioRunner::new()
            .with_final_year(2026)
            .execute(&ScenarioId::Baseline.config())];
        let export = BatchExport::new(&outcomes);
        
        let mut buffer = Vec::new();
        export.write_to(&mut buffer).unwrap();
        let parsed: BatchExport = serde_json::from_slice(&buffer).unwrap();
        
        assert_eq!(parsed.scenarios.len(), 1);
        assert_eq!(parsed.scenarios[0].history, export.scenarios[0].history);
        assert!(parsed.comparison.is_none());
    }
}
