// src/strategy/depended_on.rs

use anyhow::anyhow;

use crate::graph::Job;
use crate::strategy::{EvalContext, OptimizationStrategy, StrategyPhase};
use crate::types::Decision;

/// Keep a job only if something kept in the first pass (transitively)
/// depends on it.
///
/// Chains of such jobs resolve in one pass because the check looks at all
/// transitive dependents, not just direct ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct SkipUnlessDependedOn;

impl OptimizationStrategy for SkipUnlessDependedOn {
    fn phase(&self) -> StrategyPhase {
        StrategyPhase::DependentAware
    }

    fn decide(&self, job: &Job, cx: &EvalContext<'_>) -> anyhow::Result<Decision> {
        let kept = cx
            .kept
            .ok_or_else(|| anyhow!("first-pass keep-set is not available"))?;

        let dependents = cx.graph.dependents_of(&job.label, true)?;
        if dependents.iter().any(|d| kept.contains(d)) {
            Ok(Decision::Keep)
        } else {
            Ok(Decision::Drop)
        }
    }
}
