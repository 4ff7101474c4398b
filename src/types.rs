use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Canonical job label type used throughout the crate.
pub type JobLabel = String;

/// Outcome of asking a strategy whether a job must run for a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    Keep,
    Drop,
}

impl Decision {
    pub fn is_keep(self) -> bool {
        matches!(self, Decision::Keep)
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Decision::Keep => f.write_str("keep"),
            Decision::Drop => f.write_str("drop"),
        }
    }
}

/// What to do when a hard-excluded job is a prerequisite of a job that is
/// still eligible.
///
/// - `Error`: fail the optimization with an incomplete-closure error as soon
///   as a kept job needs the excluded one (default).
/// - `Cascade`: exclude every transitive dependent of an excluded job too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExcludedDependencyBehaviour {
    Error,
    Cascade,
}

impl Default for ExcludedDependencyBehaviour {
    fn default() -> Self {
        ExcludedDependencyBehaviour::Error
    }
}

impl FromStr for ExcludedDependencyBehaviour {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "error" => Ok(ExcludedDependencyBehaviour::Error),
            "cascade" => Ok(ExcludedDependencyBehaviour::Cascade),
            other => Err(format!(
                "invalid excluded_dependency: {other} (expected \"error\" or \"cascade\")"
            )),
        }
    }
}
