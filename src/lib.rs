// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod graph;
pub mod logging;
pub mod optimize;
pub mod push;
pub mod strategy;
pub mod types;

use std::io::Write;

use anyhow::{Context, Result};
use regex::Regex;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::loader::load_with_fs;
use crate::config::model::ConfigFile;
use crate::errors::TaskpruneError;
use crate::fs::{FileSystem, RealFileSystem};
use crate::graph::{
    coverage_report, filter_jobs, graph_to_json, load_graph, missing_optimizations,
    render_dependents, write_graph, TaskGraph,
};
use crate::optimize::GraphOptimizer;
use crate::push::io::{load_backstop_state, load_changed_files, load_push_context};
use crate::push::{BackstopState, PushContext};

/// High-level entry point used by `main.rs`.
pub async fn run(args: CliArgs) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    run_with_fs(&args, &RealFileSystem, &mut out)
}

/// Everything `run` does, against an arbitrary filesystem and output sink.
///
/// Order of work:
/// - config, then the full graph
/// - `--check-coverage` and `--dependents` on the full graph
/// - with `--params`: optimize; without: keep the full graph
/// - `--filter` lists matching labels of the resulting graph
/// - the resulting graph goes to `--output`, or to `out` when no query flag
///   claimed stdout
pub fn run_with_fs(args: &CliArgs, fs: &dyn FileSystem, out: &mut dyn Write) -> Result<()> {
    let cfg = load_with_fs(fs, &args.config)
        .with_context(|| format!("loading config {:?}", args.config))?;
    let full = load_graph(fs, &args.graph)
        .with_context(|| format!("loading task graph {:?}", args.graph))?;

    // Compile early so a bad pattern fails before any work.
    let filter = args
        .filter
        .as_deref()
        .map(Regex::new)
        .transpose()
        .context("invalid --filter regex")?;

    let push = args
        .params
        .as_deref()
        .map(|path| load_push_context(fs, path))
        .transpose()?;
    let backstop = match args.backstop_state.as_deref() {
        Some(path) => load_backstop_state(fs, path)?,
        None => BackstopState::default(),
    };
    let changed_files = args
        .changed_files
        .as_deref()
        .map(|path| load_changed_files(fs, path))
        .transpose()?;

    if args.dry_run {
        write_dry_run(out, &cfg, &full, push.as_ref(), &backstop, changed_files.as_deref())?;
        debug!("dry-run complete (nothing optimized)");
        return Ok(());
    }

    if args.check_coverage {
        let missing = missing_optimizations(&full, &cfg.coverage);
        if let Some(report) = coverage_report(&missing) {
            return Err(TaskpruneError::MissingOptimization(report).into());
        }
        info!(jobs = full.len(), "every job declares an optimization where required");
    }

    if let Some(label) = args.dependents.as_deref() {
        write!(out, "{}", render_dependents(&full, label)?)?;
    }

    let result: TaskGraph = match push {
        Some(push) => {
            let optimizer = GraphOptimizer::from_config(&cfg)?;
            let optimized = optimizer.optimize(&full, &push, &backstop, changed_files.as_deref())?;
            debug!(summary = %optimized.summary(), "optimization summary");
            optimized.into_graph()
        }
        None => {
            info!("no push parameters given; keeping the full graph");
            full
        }
    };

    if let Some(re) = &filter {
        for job in filter_jobs(&result, |job| re.is_match(&job.label)) {
            writeln!(out, "{}", job.label)?;
        }
    }

    match args.output.as_deref() {
        Some(path) => {
            write_graph(fs, path, &result)?;
            info!(path = %path.display(), jobs = result.len(), "wrote optimized graph");
        }
        None if filter.is_none() && args.dependents.is_none() => {
            writeln!(out, "{}", graph_to_json(&result)?)?;
        }
        None => {}
    }

    Ok(())
}

fn write_dry_run(
    out: &mut dyn Write,
    cfg: &ConfigFile,
    full: &TaskGraph,
    push: Option<&PushContext>,
    backstop: &BackstopState,
    changed_files: Option<&[String]>,
) -> Result<()> {
    writeln!(out, "taskprune dry-run")?;
    writeln!(out, "  optimizer.workers = {}", cfg.optimizer.workers)?;
    writeln!(
        out,
        "  optimizer.excluded_dependency = {:?}",
        cfg.optimizer.excluded_dependency
    )?;
    writeln!(
        out,
        "  backstop = every {} pushes, at least {:?} apart",
        cfg.backstop.push_interval, cfg.backstop.min_interval
    )?;
    writeln!(out)?;

    writeln!(out, "graph: {} jobs", full.len())?;
    let with_optimization = full.jobs().filter(|job| job.has_optimization()).count();
    writeln!(out, "  with optimization: {with_optimization}")?;

    match push {
        Some(push) => {
            writeln!(out, "push: {push}")?;
            let reason = cfg.backstop.reason(push, backstop);
            match reason {
                Some(reason) => writeln!(out, "  backstop: yes ({reason})")?,
                None => writeln!(out, "  backstop: no")?,
            }
        }
        None => writeln!(out, "push: none")?,
    }

    match changed_files {
        Some(files) => writeln!(out, "changed files: {}", files.len())?,
        None => writeln!(out, "changed files: unknown")?,
    }

    Ok(())
}
