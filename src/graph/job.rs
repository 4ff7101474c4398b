// src/graph/job.rs

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::types::JobLabel;

/// Reference from a job to a named optimization strategy, plus the
/// strategy-specific arguments (e.g. path patterns for `skip-unless-changed`).
///
/// Accepts either a bare strategy name or a full record:
///
/// ```json
/// "optimization": "never"
/// "optimization": {"strategy": "skip-unless-changed", "args": ["dom/**"]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOptimizationRef")]
pub struct OptimizationRef {
    pub strategy: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<String>,
}

impl OptimizationRef {
    pub fn new(strategy: impl Into<String>) -> Self {
        Self {
            strategy: strategy.into(),
            args: Vec::new(),
        }
    }

    pub fn with_args<I, S>(strategy: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            strategy: strategy.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOptimizationRef {
    Name(String),
    Full {
        strategy: String,
        #[serde(default)]
        args: Vec<String>,
    },
}

impl From<RawOptimizationRef> for OptimizationRef {
    fn from(raw: RawOptimizationRef) -> Self {
        match raw {
            RawOptimizationRef::Name(strategy) => OptimizationRef::new(strategy),
            RawOptimizationRef::Full { strategy, args } => OptimizationRef { strategy, args },
        }
    }
}

/// A single CI work unit in the task graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Unique label. May be omitted in keyed graph files, where the map key
    /// supplies it.
    #[serde(default)]
    pub label: JobLabel,

    /// Job category, e.g. `"build"`, `"test"`, `"hazard"`.
    pub kind: String,

    /// Free-form attributes: platform, project restrictions, tags.
    #[serde(default)]
    pub attributes: BTreeMap<String, Value>,

    /// Labels of the jobs this job requires.
    #[serde(default)]
    pub dependencies: Vec<JobLabel>,

    /// `None` means the job is never optimized and always runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optimization: Option<OptimizationRef>,
}

impl Job {
    pub fn new(label: impl Into<JobLabel>, kind: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            kind: kind.into(),
            attributes: BTreeMap::new(),
            dependencies: Vec::new(),
            optimization: None,
        }
    }

    /// Attribute viewed as a list of strings.
    ///
    /// A single string is treated as a one-element list; non-string list
    /// entries are skipped. Returns `None` when the attribute is absent or
    /// is neither a string nor a list (`null`, booleans, numbers, objects).
    pub fn attribute_list(&self, key: &str) -> Option<Vec<&str>> {
        match self.attributes.get(key)? {
            Value::String(s) => Some(vec![s.as_str()]),
            Value::Array(items) => Some(items.iter().filter_map(Value::as_str).collect()),
            _ => None,
        }
    }

    pub fn has_optimization(&self) -> bool {
        self.optimization.is_some()
    }
}
