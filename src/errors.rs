// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Errors fall into four groups:
//! - structural: the graph itself is malformed (cycles, dangling edges) or an
//!   internal closure invariant was broken
//! - configuration: job data and the strategy registry / config disagree
//! - lookup: a query was given a label that is not in the graph
//! - evaluation: a strategy could not reach a decision for a job

use thiserror::Error;

use crate::types::JobLabel;

#[derive(Error, Debug)]
pub enum TaskpruneError {
    #[error("Cycle detected in task graph: {}", path.join(" -> "))]
    Cycle { path: Vec<JobLabel> },

    #[error("Job '{job}' depends on unknown job '{dependency}'")]
    DanglingDependency { job: JobLabel, dependency: JobLabel },

    #[error("Duplicate job label: {0}")]
    DuplicateLabel(JobLabel),

    #[error("Incomplete closure: job '{job}' requires '{missing}', which is not in the graph")]
    IncompleteClosure { job: JobLabel, missing: JobLabel },

    #[error("Job '{job}' references unknown optimization strategy '{strategy}'")]
    UnknownStrategy { job: JobLabel, strategy: String },

    #[error("Unknown job label: {0}")]
    UnknownLabel(JobLabel),

    #[error("Optimization strategy failed for job '{job}': {message}")]
    StrategyFailed { job: JobLabel, message: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("{0}")]
    MissingOptimization(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TaskpruneError {
    /// Malformed graph or broken closure invariant. Never recoverable.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            TaskpruneError::Cycle { .. }
                | TaskpruneError::DanglingDependency { .. }
                | TaskpruneError::DuplicateLabel(_)
                | TaskpruneError::IncompleteClosure { .. }
        )
    }

    /// Mismatch between job data and registry / config.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            TaskpruneError::UnknownStrategy { .. }
                | TaskpruneError::ConfigError(_)
                | TaskpruneError::MissingOptimization(_)
        )
    }

    /// A query was handed a label the graph does not know.
    pub fn is_lookup(&self) -> bool {
        matches!(self, TaskpruneError::UnknownLabel(_))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, TaskpruneError>;
