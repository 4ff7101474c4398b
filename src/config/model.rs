// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::push::backstop::BackstopPolicy;
use crate::types::ExcludedDependencyBehaviour;

/// Configuration exactly as read from a TOML file, before validation.
///
/// ```toml
/// [optimizer]
/// workers = 4
/// excluded_dependency = "error"
///
/// [exclusion]
/// excluded_projects_attribute = "excluded_projects"
/// run_on_projects_attribute = "run_on_projects"
///
/// [backstop]
/// push_interval = 20
/// min_interval = "4h"
/// # opt-in project classes; both empty by default
/// integration_projects = ["autoland"]
/// try_projects = ["try"]
///
/// [coverage]
/// must_declare_kinds = ["build", "test"]
/// exempt_label_tags = ["ccov"]
///
/// [strategy_aliases]
/// "skip-unless-backstop" = "never"
/// ```
///
/// All sections are optional and have reasonable defaults.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub optimizer: OptimizerSection,

    #[serde(default)]
    pub exclusion: ExclusionSection,

    #[serde(default)]
    pub backstop: BackstopSection,

    #[serde(default)]
    pub coverage: CoverageSection,

    /// Extra strategy names mapped onto registered ones.
    #[serde(default)]
    pub strategy_aliases: BTreeMap<String, String>,
}

/// Validated configuration.
///
/// Only constructed through `TryFrom<RawConfigFile>` (see `validate.rs`), or
/// [`ConfigFile::default`], which is valid by construction.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub optimizer: OptimizerSection,
    pub exclusion: ExclusionSection,
    /// `[backstop]` with `min_interval` already parsed.
    pub backstop: BackstopPolicy,
    pub coverage: CoverageSection,
    pub strategy_aliases: BTreeMap<String, String>,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(raw: RawConfigFile, backstop: BackstopPolicy) -> Self {
        Self {
            optimizer: raw.optimizer,
            exclusion: raw.exclusion,
            backstop,
            coverage: raw.coverage,
            strategy_aliases: raw.strategy_aliases,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(RawConfigFile::default(), BackstopPolicy::default())
    }
}

/// `[optimizer]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct OptimizerSection {
    /// Number of threads used to evaluate strategies. `1` evaluates inline.
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// `"error"` or `"cascade"`; see [`ExcludedDependencyBehaviour`].
    #[serde(default)]
    pub excluded_dependency: ExcludedDependencyBehaviour,
}

fn default_workers() -> usize {
    1
}

impl Default for OptimizerSection {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            excluded_dependency: ExcludedDependencyBehaviour::default(),
        }
    }
}

/// `[exclusion]` section: which job attributes carry project restrictions.
#[derive(Debug, Clone, Deserialize)]
pub struct ExclusionSection {
    /// Attribute listing projects the job must never run on.
    #[serde(default = "default_excluded_projects_attribute")]
    pub excluded_projects_attribute: String,

    /// Attribute listing the only projects the job may run on. `None`
    /// disables allow-list checks.
    #[serde(default = "default_run_on_projects_attribute")]
    pub run_on_projects_attribute: Option<String>,
}

fn default_excluded_projects_attribute() -> String {
    "excluded_projects".to_string()
}

fn default_run_on_projects_attribute() -> Option<String> {
    Some("run_on_projects".to_string())
}

impl Default for ExclusionSection {
    fn default() -> Self {
        Self {
            excluded_projects_attribute: default_excluded_projects_attribute(),
            run_on_projects_attribute: default_run_on_projects_attribute(),
        }
    }
}

/// `[backstop]` section as written in TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct BackstopSection {
    /// Every Nth push (by pushlog id) is a backstop candidate.
    #[serde(default = "default_push_interval")]
    pub push_interval: u64,

    /// Minimum spacing between backstops, e.g. `"4h"`.
    #[serde(default = "default_min_interval")]
    pub min_interval: String,

    /// Opt-in: projects subject to optimization. When non-empty, pushes to
    /// any other project are always backstops. Empty (the default) means
    /// every project follows the cadence rule.
    #[serde(default)]
    pub integration_projects: Vec<String>,

    /// Opt-in: projects that never get a backstop. Empty by default.
    #[serde(default)]
    pub try_projects: Vec<String>,
}

fn default_push_interval() -> u64 {
    20
}

fn default_min_interval() -> String {
    "4h".to_string()
}

impl Default for BackstopSection {
    fn default() -> Self {
        Self {
            push_interval: default_push_interval(),
            min_interval: default_min_interval(),
            integration_projects: Vec::new(),
            try_projects: Vec::new(),
        }
    }
}

/// `[coverage]` section: which kinds must declare an optimization.
#[derive(Debug, Clone, Deserialize)]
pub struct CoverageSection {
    #[serde(default = "default_must_declare_kinds")]
    pub must_declare_kinds: Vec<String>,

    /// Label substrings that exempt a job from the check.
    #[serde(default = "default_exempt_label_tags")]
    pub exempt_label_tags: Vec<String>,
}

fn default_must_declare_kinds() -> Vec<String> {
    [
        "artifact_build",
        "build-fat-aar",
        "build",
        "generate-profile",
        "hazard",
        "instrumented-build",
        "spidermonkey",
        "static-analysis-autotest",
        "test",
        "valgrind",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_exempt_label_tags() -> Vec<String> {
    vec!["ccov".to_string()]
}

impl Default for CoverageSection {
    fn default() -> Self {
        Self {
            must_declare_kinds: default_must_declare_kinds(),
            exempt_label_tags: default_exempt_label_tags(),
        }
    }
}
