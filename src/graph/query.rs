// src/graph/query.rs

//! Read-only helpers over a [`TaskGraph`], used by diagnostics, the CLI and
//! tests.

use std::collections::HashSet;
use std::fmt::Write as _;

use crate::config::model::CoverageSection;
use crate::errors::Result;
use crate::graph::job::Job;
use crate::graph::task_graph::TaskGraph;

/// Jobs matching `predicate`, in the graph's insertion order.
pub fn filter_jobs<'g, F>(graph: &'g TaskGraph, mut predicate: F) -> Vec<&'g Job>
where
    F: FnMut(&Job) -> bool,
{
    graph.jobs().filter(|job| predicate(job)).collect()
}

/// Human-readable tree of everything that (transitively) depends on `label`.
///
/// ```text
/// Dependent tasks of build-A:
///   test-B
///     test-D
///   test-C
///     test-D (see above)
/// ```
///
/// Children are sorted per level. A job whose subtree was already printed is
/// marked `(see above)` instead of being expanded again.
pub fn render_dependents(graph: &TaskGraph, label: &str) -> Result<String> {
    let direct = graph.dependents_of(label, false)?;

    let mut out = String::new();
    let _ = writeln!(out, "Dependent tasks of {label}:");
    if direct.is_empty() {
        let _ = writeln!(out, "  (none)");
        return Ok(out);
    }

    let mut expanded: HashSet<String> = HashSet::new();
    // (label, depth) pairs; pushed in reverse so output stays sorted.
    let mut stack: Vec<(String, usize)> = direct.into_iter().rev().map(|l| (l, 1)).collect();

    while let Some((current, depth)) = stack.pop() {
        let indent = "  ".repeat(depth);
        if !expanded.insert(current.clone()) {
            let _ = writeln!(out, "{indent}{current} (see above)");
            continue;
        }
        let _ = writeln!(out, "{indent}{current}");

        for child in graph.dependents_of(&current, false)?.into_iter().rev() {
            stack.push((child, depth + 1));
        }
    }

    Ok(out)
}

/// Print [`render_dependents`] to stdout.
pub fn print_dependents(graph: &TaskGraph, label: &str) -> Result<()> {
    print!("{}", render_dependents(graph, label)?);
    Ok(())
}

/// Jobs of a must-declare kind that have no optimization reference.
///
/// Jobs whose label contains one of the exempt tags (e.g. code-coverage
/// builds) are skipped.
pub fn missing_optimizations<'g>(graph: &'g TaskGraph, coverage: &CoverageSection) -> Vec<&'g Job> {
    filter_jobs(graph, |job| {
        coverage.must_declare_kinds.iter().any(|k| *k == job.kind)
            && !coverage
                .exempt_label_tags
                .iter()
                .any(|tag| job.label.contains(tag.as_str()))
            && !job.has_optimization()
    })
}

/// Failure message for a non-empty [`missing_optimizations`] result, or
/// `None` when nothing is missing.
pub fn coverage_report(missing: &[&Job]) -> Option<String> {
    if missing.is_empty() {
        return None;
    }

    let s_are = if missing.len() == 1 { " is" } else { "s are" };
    let labels: Vec<&str> = missing.iter().map(|j| j.label.as_str()).collect();
    Some(format!(
        "The following task{s_are} missing an optimization:\n  {}",
        labels.join("\n  ")
    ))
}
