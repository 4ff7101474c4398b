// src/optimize/optimizer.rs

use std::collections::{BTreeSet, HashSet};

use tracing::{debug, info, warn};

use crate::config::model::ConfigFile;
use crate::errors::{Result, TaskpruneError};
use crate::graph::{Job, TaskGraph};
use crate::optimize::closure::{expand_closure, with_transitive_dependents};
use crate::optimize::evaluate::{evaluate_batch, Resolved};
use crate::optimize::result::{OptimizationSummary, OptimizedTaskGraph};
use crate::push::{BackstopPolicy, BackstopState, PushContext};
use crate::strategy::{EvalContext, ProjectExclusion, StrategyPhase, StrategyRegistry, ALWAYS};
use crate::types::{Decision, ExcludedDependencyBehaviour, JobLabel};

/// Knobs for a [`GraphOptimizer`], normally derived from [`ConfigFile`].
#[derive(Debug, Clone)]
pub struct OptimizerSettings {
    pub workers: usize,
    pub excluded_dependency: ExcludedDependencyBehaviour,
    pub backstop: BackstopPolicy,
    pub exclusion: ProjectExclusion,
}

impl Default for OptimizerSettings {
    fn default() -> Self {
        Self::from_config(&ConfigFile::default())
    }
}

impl OptimizerSettings {
    pub fn from_config(cfg: &ConfigFile) -> Self {
        Self {
            workers: cfg.optimizer.workers,
            excluded_dependency: cfg.optimizer.excluded_dependency,
            backstop: cfg.backstop.clone(),
            exclusion: ProjectExclusion::from_config(&cfg.exclusion),
        }
    }
}

/// Turns a full task graph into the graph that must run for one push.
///
/// The optimizer holds only immutable configuration; each [`optimize`] call
/// keeps its working sets local, so one optimizer can serve concurrent pushes.
///
/// [`optimize`]: GraphOptimizer::optimize
#[derive(Debug, Clone)]
pub struct GraphOptimizer {
    registry: StrategyRegistry,
    settings: OptimizerSettings,
}

impl GraphOptimizer {
    /// Validate and construct. The registry must provide `always`, which
    /// backs every job without an optimization reference.
    pub fn new(registry: StrategyRegistry, settings: OptimizerSettings) -> Result<Self> {
        if !registry.contains(ALWAYS) {
            return Err(TaskpruneError::ConfigError(format!(
                "strategy registry has no '{ALWAYS}' strategy"
            )));
        }
        if settings.workers == 0 {
            return Err(TaskpruneError::ConfigError(
                "optimizer needs at least one worker".to_string(),
            ));
        }
        if settings.backstop.push_interval == 0 {
            return Err(TaskpruneError::ConfigError(
                "backstop push interval must be >= 1".to_string(),
            ));
        }
        Ok(Self { registry, settings })
    }

    /// Optimizer with built-in strategies configured from `cfg`.
    pub fn from_config(cfg: &ConfigFile) -> Result<Self> {
        Self::new(StrategyRegistry::from_config(cfg)?, OptimizerSettings::from_config(cfg))
    }

    pub fn registry(&self) -> &StrategyRegistry {
        &self.registry
    }

    pub fn settings(&self) -> &OptimizerSettings {
        &self.settings
    }

    /// Compute the optimized graph for `push`.
    ///
    /// 1. resolve every job's strategy (unknown names fail before anything runs)
    /// 2. apply hard project exclusions
    /// 3. on a backstop push keep every eligible job; otherwise ask each
    ///    eligible job's strategy, dependent-aware strategies last
    /// 4. expand the keep-set to its dependency closure and induce the subgraph
    pub fn optimize(
        &self,
        full: &TaskGraph,
        push: &PushContext,
        backstop: &BackstopState,
        changed_files: Option<&[String]>,
    ) -> Result<OptimizedTaskGraph> {
        let resolved: Vec<Resolved<'_>> = full
            .jobs()
            .map(|job| self.registry.resolve(job).map(|s| (job, s)))
            .collect::<Result<_>>()?;

        let excluded = self.hard_exclusions(full, push)?;
        let eligible: Vec<Resolved<'_>> = resolved
            .into_iter()
            .filter(|(job, _)| !excluded.contains(&job.label))
            .collect();

        let backstop_reason = self.settings.backstop.reason(push, backstop);

        let keep: HashSet<JobLabel> = match backstop_reason {
            Some(reason) => {
                info!(push = %push, %reason, "backstop push; optimization disabled");
                eligible.iter().map(|(job, _)| job.label.clone()).collect()
            }
            None => self.evaluate_strategies(full, push, changed_files, &eligible)?,
        };

        let closure = expand_closure(full, &keep, &excluded)?;
        let graph = full.induce(&closure)?;

        let summary = OptimizationSummary {
            backstop: backstop_reason,
            excluded: in_graph_order(full, |job| excluded.contains(&job.label)),
            kept: in_graph_order(full, |job| keep.contains(&job.label)),
            dropped: in_graph_order(full, |job| {
                !excluded.contains(&job.label) && !closure.contains(&job.label)
            }),
            added_by_closure: in_graph_order(full, |job| {
                closure.contains(&job.label) && !keep.contains(&job.label)
            }),
        };

        info!(
            push = %push,
            full = full.len(),
            optimized = graph.len(),
            excluded = summary.excluded.len(),
            added_by_closure = summary.added_by_closure.len(),
            backstop = summary.backstop.is_some(),
            "optimized task graph"
        );

        Ok(OptimizedTaskGraph::new(graph, summary))
    }

    /// Labels that must never run on this push's project.
    fn hard_exclusions(&self, full: &TaskGraph, push: &PushContext) -> Result<BTreeSet<JobLabel>> {
        let direct: BTreeSet<JobLabel> = full
            .jobs()
            .filter(|job| self.settings.exclusion.excludes(job, &push.project))
            .map(|job| job.label.clone())
            .collect();

        for label in &direct {
            debug!(job = %label, project = %push.project, "job excluded for project");
        }

        match self.settings.excluded_dependency {
            ExcludedDependencyBehaviour::Error => Ok(direct),
            ExcludedDependencyBehaviour::Cascade => {
                let all = with_transitive_dependents(full, &direct)?;
                for label in all.difference(&direct) {
                    warn!(
                        job = %label,
                        project = %push.project,
                        "job excluded because it depends on an excluded job"
                    );
                }
                Ok(all)
            }
        }
    }

    /// Two passes: independent strategies first, then dependent-aware ones
    /// against the first-pass keep-set.
    fn evaluate_strategies(
        &self,
        full: &TaskGraph,
        push: &PushContext,
        changed_files: Option<&[String]>,
        eligible: &[Resolved<'_>],
    ) -> Result<HashSet<JobLabel>> {
        let (independent, dependent_aware): (Vec<_>, Vec<_>) = eligible
            .iter()
            .cloned()
            .partition(|(_, s)| s.phase() == StrategyPhase::Independent);

        let cx = EvalContext::new(full, push, changed_files);
        let first = evaluate_batch(&independent, &cx, self.settings.workers)?;
        let mut keep: HashSet<JobLabel> = kept_labels(&independent, &first);

        if !dependent_aware.is_empty() {
            let first_pass = keep.clone();
            let cx = cx.with_kept(&first_pass);
            let second = evaluate_batch(&dependent_aware, &cx, self.settings.workers)?;
            keep.extend(kept_labels(&dependent_aware, &second));
        }

        Ok(keep)
    }
}

fn kept_labels(batch: &[Resolved<'_>], decisions: &[Decision]) -> HashSet<JobLabel> {
    batch
        .iter()
        .zip(decisions)
        .filter(|(_, decision)| decision.is_keep())
        .map(|((job, _), _)| job.label.clone())
        .collect()
}

fn in_graph_order<F>(graph: &TaskGraph, mut predicate: F) -> Vec<JobLabel>
where
    F: FnMut(&Job) -> bool,
{
    graph
        .jobs()
        .filter(|job| predicate(job))
        .map(|job| job.label.clone())
        .collect()
}
