// src/strategy/always.rs

use crate::graph::Job;
use crate::strategy::{EvalContext, OptimizationStrategy};
use crate::types::Decision;

/// Always keep. Applied to every job without an optimization reference.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysRun;

impl OptimizationStrategy for AlwaysRun {
    fn decide(&self, _job: &Job, _cx: &EvalContext<'_>) -> anyhow::Result<Decision> {
        Ok(Decision::Keep)
    }
}

/// Always drop; the job only runs when a kept job needs it, or on backstops.
#[derive(Debug, Clone, Copy, Default)]
pub struct NeverRun;

impl OptimizationStrategy for NeverRun {
    fn decide(&self, _job: &Job, _cx: &EvalContext<'_>) -> anyhow::Result<Decision> {
        Ok(Decision::Drop)
    }
}
