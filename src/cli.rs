// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::loader::default_config_path;

/// Command-line arguments for `taskprune`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "taskprune",
    version,
    about = "Prune a CI task graph down to the jobs a push actually needs.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// Default: `Taskprune.toml` in the current working directory. A missing
    /// file means built-in defaults.
    #[arg(long, value_name = "PATH", default_value_os_t = default_config_path())]
    pub config: PathBuf,

    /// Full task graph (JSON).
    #[arg(long, value_name = "PATH")]
    pub graph: PathBuf,

    /// Push parameters (JSON). Without them the full graph is only inspected,
    /// never optimized.
    #[arg(long, value_name = "PATH")]
    pub params: Option<PathBuf>,

    /// Record of the last backstop push (JSON).
    #[arg(long, value_name = "PATH")]
    pub backstop_state: Option<PathBuf>,

    /// Files changed by the push, one per line.
    #[arg(long, value_name = "PATH")]
    pub changed_files: Option<PathBuf>,

    /// Write the resulting graph here instead of stdout.
    #[arg(long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Print labels of resulting jobs matching this regex.
    #[arg(long, value_name = "REGEX")]
    pub filter: Option<String>,

    /// Print the tree of jobs depending on this label in the full graph.
    #[arg(long, value_name = "LABEL")]
    pub dependents: Option<String>,

    /// Fail if a job of a must-declare kind has no optimization.
    #[arg(long)]
    pub check_coverage: bool,

    /// Load and validate every input, print what would be optimized, stop.
    #[arg(long)]
    pub dry_run: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `TASKPRUNE_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

pub fn parse() -> CliArgs {
    CliArgs::parse()
}
