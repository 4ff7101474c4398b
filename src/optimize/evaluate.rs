// src/optimize/evaluate.rs

//! Strategy evaluation over a batch of jobs, inline or on scoped threads.

use std::sync::Arc;
use std::thread;

use anyhow::anyhow;
use tracing::{debug, trace};

use crate::errors::{Result, TaskpruneError};
use crate::graph::Job;
use crate::strategy::{EvalContext, OptimizationStrategy};
use crate::types::Decision;

/// A job paired with the strategy it resolved to.
pub(crate) type Resolved<'g> = (&'g Job, Arc<dyn OptimizationStrategy>);

/// Decide every job in `batch`. The result is index-aligned with `batch` and
/// identical whatever the worker count.
pub(crate) fn evaluate_batch(
    batch: &[Resolved<'_>],
    cx: &EvalContext<'_>,
    workers: usize,
) -> Result<Vec<Decision>> {
    if workers <= 1 || batch.len() <= 1 {
        return batch.iter().map(|(job, s)| decide_one(job, s.as_ref(), cx)).collect();
    }

    let chunk_size = batch.len().div_ceil(workers);
    trace!(jobs = batch.len(), workers, chunk_size, "evaluating strategies in parallel");

    let chunk_results: Vec<Result<Vec<Decision>>> = thread::scope(|scope| {
        let handles: Vec<_> = batch
            .chunks(chunk_size)
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .map(|(job, s)| decide_one(job, s.as_ref(), cx))
                        .collect::<Result<Vec<_>>>()
                })
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow!("strategy evaluation thread panicked").into()))
            })
            .collect()
    });

    let mut decisions = Vec::with_capacity(batch.len());
    for chunk in chunk_results {
        decisions.extend(chunk?);
    }
    Ok(decisions)
}

fn decide_one(job: &Job, strategy: &dyn OptimizationStrategy, cx: &EvalContext<'_>) -> Result<Decision> {
    let decision = strategy
        .decide(job, cx)
        .map_err(|e| TaskpruneError::StrategyFailed {
            job: job.label.clone(),
            message: format!("{e:#}"),
        })?;

    debug!(
        job = %job.label,
        strategy = job.optimization.as_ref().map(|o| o.strategy.as_str()).unwrap_or("always"),
        %decision,
        "strategy decision"
    );
    Ok(decision)
}
