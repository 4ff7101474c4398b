// src/optimize/result.rs

use std::fmt;
use std::ops::Deref;

use serde::Serialize;

use crate::graph::TaskGraph;
use crate::push::BackstopReason;
use crate::types::JobLabel;

/// What happened to each job of the full graph. Every list is in the full
/// graph's insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptimizationSummary {
    /// Set when the push was a backstop and no strategy was consulted.
    pub backstop: Option<BackstopReason>,
    /// Removed by project exclusion (including cascaded dependents).
    pub excluded: Vec<JobLabel>,
    /// Kept by their own strategy, or by the backstop.
    pub kept: Vec<JobLabel>,
    /// Eligible but neither kept nor needed by a kept job.
    pub dropped: Vec<JobLabel>,
    /// Dropped by their strategy but re-added as a prerequisite.
    pub added_by_closure: Vec<JobLabel>,
}

impl fmt::Display for OptimizationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(reason) = self.backstop {
            writeln!(f, "backstop push ({reason})")?;
        }
        writeln!(f, "kept: {}", self.kept.len())?;
        writeln!(f, "added by closure: {}", self.added_by_closure.len())?;
        writeln!(f, "dropped: {}", self.dropped.len())?;
        write!(f, "excluded: {}", self.excluded.len())
    }
}

/// A task graph produced by the optimizer, together with its summary.
///
/// Derefs to [`TaskGraph`], so every graph query works on it directly.
#[derive(Debug, Clone)]
pub struct OptimizedTaskGraph {
    graph: TaskGraph,
    summary: OptimizationSummary,
}

impl OptimizedTaskGraph {
    pub(crate) fn new(graph: TaskGraph, summary: OptimizationSummary) -> Self {
        Self { graph, summary }
    }

    pub fn graph(&self) -> &TaskGraph {
        &self.graph
    }

    pub fn summary(&self) -> &OptimizationSummary {
        &self.summary
    }

    pub fn into_graph(self) -> TaskGraph {
        self.graph
    }
}

impl Deref for OptimizedTaskGraph {
    type Target = TaskGraph;

    fn deref(&self) -> &TaskGraph {
        &self.graph
    }
}
