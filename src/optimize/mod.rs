// src/optimize/mod.rs

//! Graph optimization: from the full task graph plus push metadata to the
//! minimal graph that must run.
//!
//! - [`closure`] expands a keep-set to its dependency closure.
//! - [`evaluate`] runs strategies over a batch of jobs.
//! - [`optimizer`] drives the whole pipeline.
//! - [`result`] holds the output graph and its summary.

pub mod closure;
pub(crate) mod evaluate;
pub mod optimizer;
pub mod result;

pub use closure::{expand_closure, with_transitive_dependents};
pub use optimizer::{GraphOptimizer, OptimizerSettings};
pub use result::{OptimizationSummary, OptimizedTaskGraph};
