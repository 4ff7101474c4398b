// src/graph/io.rs

//! JSON (de)serialization of task graphs.
//!
//! Input accepts either a list of job records or an object keyed by label:
//!
//! ```json
//! [{"label": "build-linux", "kind": "build", "dependencies": []}]
//! {"build-linux": {"kind": "build", "dependencies": []}}
//! ```
//!
//! Keyed input keeps the order the keys appear in the file. Output is always
//! a list in topological order.

use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::errors::{Result, TaskpruneError};
use crate::fs::FileSystem;
use crate::graph::job::Job;
use crate::graph::task_graph::TaskGraph;

#[derive(Deserialize)]
#[serde(untagged)]
enum GraphFile {
    List(Vec<Job>),
    Keyed(serde_json::Map<String, serde_json::Value>),
}

/// Parse a JSON graph document and build a validated [`TaskGraph`].
pub fn parse_graph(contents: &str) -> Result<TaskGraph> {
    let jobs = match serde_json::from_str::<GraphFile>(contents)? {
        GraphFile::List(jobs) => jobs,
        GraphFile::Keyed(map) => map
            .into_iter()
            .map(|(key, value)| {
                let mut job: Job = serde_json::from_value(value)?;
                if job.label.is_empty() {
                    job.label = key;
                } else if job.label != key {
                    return Err(TaskpruneError::ConfigError(format!(
                        "graph key '{key}' does not match job label '{}'",
                        job.label
                    )));
                }
                Ok(job)
            })
            .collect::<Result<Vec<_>>>()?,
    };

    if let Some(job) = jobs.iter().find(|j| j.label.is_empty()) {
        return Err(TaskpruneError::ConfigError(format!(
            "job of kind '{}' has an empty label",
            job.kind
        )));
    }

    TaskGraph::build(jobs)
}

/// Load and validate a graph file.
pub fn load_graph(fs: &dyn FileSystem, path: &Path) -> Result<TaskGraph> {
    let contents = fs.read_to_string(path)?;
    let graph = parse_graph(&contents)?;
    debug!(path = %path.display(), jobs = graph.len(), "loaded task graph");
    Ok(graph)
}

/// Serialize a graph as a pretty-printed JSON list in topological order.
pub fn graph_to_json(graph: &TaskGraph) -> Result<String> {
    let jobs = graph.topological_order()?;
    Ok(serde_json::to_string_pretty(&jobs)?)
}

pub fn write_graph(fs: &dyn FileSystem, path: &Path, graph: &TaskGraph) -> Result<()> {
    let json = graph_to_json(graph)?;
    fs.write(path, json.as_bytes())?;
    Ok(())
}
