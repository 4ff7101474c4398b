// src/optimize/closure.rs

//! Dependency closure of a keep-set.

use std::collections::{BTreeSet, HashSet};

use crate::errors::{Result, TaskpruneError};
use crate::graph::TaskGraph;
use crate::types::JobLabel;

/// Union `keep` with every transitive dependency of its members.
///
/// One closure walk per kept label suffices because the graph is acyclic and
/// [`TaskGraph::transitive_dependencies_of`] already follows whole chains.
/// A dependency in `excluded` cannot be added back; reaching one fails with
/// [`TaskpruneError::IncompleteClosure`] naming the kept job that needs it.
/// Kept jobs are walked in graph order, so the job reported is the first one
/// in the graph that needs an excluded dependency.
pub fn expand_closure(
    graph: &TaskGraph,
    keep: &HashSet<JobLabel>,
    excluded: &BTreeSet<JobLabel>,
) -> Result<BTreeSet<JobLabel>> {
    let mut closure: BTreeSet<JobLabel> = keep.iter().cloned().collect();

    for label in graph.labels().filter(|l| keep.contains(*l)) {
        for dep in graph.transitive_dependencies_of(label)? {
            if excluded.contains(&dep) {
                return Err(TaskpruneError::IncompleteClosure {
                    job: label.to_string(),
                    missing: dep,
                });
            }
            closure.insert(dep);
        }
    }

    Ok(closure)
}

/// Every member of `labels` plus everything that transitively depends on one
/// of them.
pub fn with_transitive_dependents(
    graph: &TaskGraph,
    labels: &BTreeSet<JobLabel>,
) -> Result<BTreeSet<JobLabel>> {
    let mut out = labels.clone();
    for label in labels {
        out.extend(graph.dependents_of(label, true)?);
    }
    Ok(out)
}
