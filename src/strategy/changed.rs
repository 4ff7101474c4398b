// src/strategy/changed.rs

use anyhow::{bail, Context, Result};
use globset::{GlobBuilder, GlobSet, GlobSetBuilder};

use crate::graph::Job;
use crate::strategy::{EvalContext, OptimizationStrategy};
use crate::types::Decision;

/// Keep a job when the push touched any file under its declared paths.
///
/// The job's optimization `args` are the path patterns:
///
/// ```json
/// "optimization": {"strategy": "skip-unless-changed",
///                  "args": ["dom/media", "testing/**/*.py"]}
/// ```
///
/// - A pattern with glob metacharacters is matched as a glob; `*` does not
///   cross `/`, `**` does.
/// - A plain pattern is a directory prefix: `dom/media` matches
///   `dom/media` itself and everything below it.
///
/// When the changed-files list is unknown, the job is kept.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileChangeRelevance;

impl OptimizationStrategy for FileChangeRelevance {
    fn decide(&self, job: &Job, cx: &EvalContext<'_>) -> Result<Decision> {
        let Some(changed) = cx.changed_files else {
            return Ok(Decision::Keep);
        };

        let patterns = job
            .optimization
            .as_ref()
            .map(|o| o.args.as_slice())
            .unwrap_or(&[]);
        if patterns.is_empty() {
            bail!("skip-unless-changed needs at least one path pattern");
        }

        let set = build_path_globset(patterns)?;
        if changed.iter().any(|path| set.is_match(path)) {
            Ok(Decision::Keep)
        } else {
            Ok(Decision::Drop)
        }
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '[', '{'])
}

/// Expand prefixes into globs: `dom/media` -> `dom/media`, `dom/media/**`.
fn effective_patterns(patterns: &[String]) -> Vec<String> {
    let mut out = Vec::with_capacity(patterns.len() * 2);
    for pat in patterns {
        let pat = pat.trim();
        if is_glob(pat) {
            out.push(pat.to_string());
        } else {
            let prefix = pat.trim_end_matches('/');
            out.push(prefix.to_string());
            out.push(format!("{prefix}/**"));
        }
    }
    out
}

/// Build a GlobSet from path patterns.
fn build_path_globset(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pat in effective_patterns(patterns) {
        let glob = GlobBuilder::new(&pat)
            .literal_separator(true)
            .build()
            .with_context(|| format!("invalid path pattern: {pat}"))?;
        builder.add(glob);
    }
    Ok(builder.build()?)
}
