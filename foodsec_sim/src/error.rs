//! Errors raised around scenario runs (not inside them).
//!
//! A failing simulation is reported through `RunStatus::Failed`, never as
//! one of these.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
    
    #[error("scenario '{0}' appears more than once in the batch")]
    DuplicateScenario(String),
    
    #[error("reference scenario '{0}' is missing or did not complete")]
    ReferenceUnavailable(String),
    
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
