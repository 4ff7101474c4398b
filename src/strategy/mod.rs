// src/strategy/mod.rs

//! Per-job optimization strategies.
//!
//! A strategy answers one question: does this job need to run for this push?
//! Strategies are pure functions of the job and the [`EvalContext`]; they hold
//! no mutable state, so the optimizer may evaluate independent jobs in any
//! order or in parallel.
//!
//! Built-in strategies:
//! - [`always::AlwaysRun`] (`always`) and [`always::NeverRun`] (`never`)
//! - [`depended_on::SkipUnlessDependedOn`] (`skip-unless-depended-on`)
//! - [`exclusion::ProjectExclusion`] (`project-exclusion`)
//! - [`changed::FileChangeRelevance`] (`skip-unless-changed`)
//!
//! [`registry::StrategyRegistry`] maps names to implementations.

use std::collections::HashSet;
use std::fmt::Debug;

use crate::graph::{Job, TaskGraph};
use crate::push::PushContext;
use crate::types::{Decision, JobLabel};

pub mod always;
pub mod changed;
pub mod depended_on;
pub mod exclusion;
pub mod registry;

pub use always::{AlwaysRun, NeverRun};
pub use changed::FileChangeRelevance;
pub use depended_on::SkipUnlessDependedOn;
pub use exclusion::ProjectExclusion;
pub use registry::StrategyRegistry;

pub const ALWAYS: &str = "always";
pub const NEVER: &str = "never";
pub const SKIP_UNLESS_DEPENDED_ON: &str = "skip-unless-depended-on";
pub const PROJECT_EXCLUSION: &str = "project-exclusion";
pub const SKIP_UNLESS_CHANGED: &str = "skip-unless-changed";

/// When a strategy can be evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyPhase {
    /// Needs only the job and the push.
    Independent,
    /// Needs the keep-set produced by every independent strategy first.
    DependentAware,
}

/// Everything a strategy may look at besides the job itself.
#[derive(Debug, Clone, Copy)]
pub struct EvalContext<'a> {
    pub graph: &'a TaskGraph,
    pub push: &'a PushContext,
    /// Files touched by the push; `None` when unknown.
    pub changed_files: Option<&'a [String]>,
    /// First-pass keep-set; only set for [`StrategyPhase::DependentAware`].
    pub kept: Option<&'a HashSet<JobLabel>>,
}

impl<'a> EvalContext<'a> {
    pub fn new(
        graph: &'a TaskGraph,
        push: &'a PushContext,
        changed_files: Option<&'a [String]>,
    ) -> Self {
        Self {
            graph,
            push,
            changed_files,
            kept: None,
        }
    }

    pub fn with_kept(self, kept: &'a HashSet<JobLabel>) -> Self {
        Self {
            kept: Some(kept),
            ..self
        }
    }
}

/// A named per-job decision policy.
pub trait OptimizationStrategy: Send + Sync + Debug {
    fn phase(&self) -> StrategyPhase {
        StrategyPhase::Independent
    }

    /// Decide whether `job` must run. Errors are reported by the optimizer
    /// together with the job label.
    fn decide(&self, job: &Job, cx: &EvalContext<'_>) -> anyhow::Result<Decision>;
}
