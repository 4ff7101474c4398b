// src/graph/mod.rs

//! Task graph representation and read-only queries.
//!
//! - [`job`] defines a single CI job and its optimization reference.
//! - [`task_graph`] holds the immutable DAG plus its reverse index.
//! - [`query`] provides filtering, dependents listings and coverage checks.
//! - [`io`] loads and writes graphs as JSON.

pub mod io;
pub mod job;
pub mod query;
pub mod task_graph;

pub use io::{graph_to_json, load_graph, parse_graph, write_graph};
pub use job::{Job, OptimizationRef};
pub use query::{coverage_report, filter_jobs, missing_optimizations, print_dependents, render_dependents};
pub use task_graph::TaskGraph;
