#![allow(dead_code)]

use serde_json::Value;
use taskprune::config::{ConfigFile, RawConfigFile};
use taskprune::graph::{Job, OptimizationRef, TaskGraph};
use taskprune::push::{BackstopState, PushContext};
use taskprune::types::ExcludedDependencyBehaviour;

pub const AUTOLAND: &str = "autoland";
pub const AUTOLAND_REPO: &str = "https://hg.mozilla.org/integration/autoland";
pub const PUSHDATE: i64 = 1593029536;

/// Builder for `Job`.
pub struct JobBuilder {
    job: Job,
}

impl JobBuilder {
    pub fn new(label: &str, kind: &str) -> Self {
        Self {
            job: Job::new(label, kind),
        }
    }

    pub fn after(mut self, dep: &str) -> Self {
        self.job.dependencies.push(dep.to_string());
        self
    }

    pub fn optimization(mut self, strategy: &str) -> Self {
        self.job.optimization = Some(OptimizationRef::new(strategy));
        self
    }

    pub fn optimization_with_args(mut self, strategy: &str, args: &[&str]) -> Self {
        self.job.optimization = Some(OptimizationRef::with_args(strategy, args.iter().copied()));
        self
    }

    pub fn attribute(mut self, key: &str, value: Value) -> Self {
        self.job.attributes.insert(key.to_string(), value);
        self
    }

    pub fn excluded_projects(self, projects: &[&str]) -> Self {
        self.attribute("excluded_projects", Value::from(projects.to_vec()))
    }

    pub fn run_on_projects(self, projects: &[&str]) -> Self {
        self.attribute("run_on_projects", Value::from(projects.to_vec()))
    }

    pub fn build(self) -> Job {
        self.job
    }
}

/// Builder for `TaskGraph`.
#[derive(Default)]
pub struct GraphBuilder {
    jobs: Vec<Job>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_job(mut self, job: JobBuilder) -> Self {
        self.jobs.push(job.build());
        self
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    pub fn build(self) -> TaskGraph {
        TaskGraph::build(self.jobs).expect("Failed to build valid graph from builder")
    }
}

/// Builder for `ConfigFile` to simplify test setup.
#[derive(Default)]
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.config.optimizer.workers = workers;
        self
    }

    pub fn excluded_dependency(mut self, behaviour: ExcludedDependencyBehaviour) -> Self {
        self.config.optimizer.excluded_dependency = behaviour;
        self
    }

    pub fn push_interval(mut self, interval: u64) -> Self {
        self.config.backstop.push_interval = interval;
        self
    }

    pub fn min_interval(mut self, duration: &str) -> Self {
        self.config.backstop.min_interval = duration.to_string();
        self
    }

    pub fn integration_projects(mut self, projects: &[&str]) -> Self {
        self.config.backstop.integration_projects =
            projects.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn try_projects(mut self, projects: &[&str]) -> Self {
        self.config.backstop.try_projects = projects.iter().map(|p| p.to_string()).collect();
        self
    }

    pub fn strategy_alias(mut self, alias: &str, target: &str) -> Self {
        self.config
            .strategy_aliases
            .insert(alias.to_string(), target.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

/// An autoland push with the given pushlog id at [`PUSHDATE`].
pub fn autoland_push(pushlog_id: u64) -> PushContext {
    PushContext::new(AUTOLAND, AUTOLAND_REPO, PUSHDATE, pushlog_id)
}

pub fn push_on(project: &str, pushlog_id: u64, push_date: i64) -> PushContext {
    PushContext::new(project, format!("https://hg.mozilla.org/{project}"), push_date, pushlog_id)
}

/// Last backstop at `last_pushlog_id`, `hours_ago` hours before [`PUSHDATE`].
pub fn backstop_state(last_pushlog_id: u64, hours_ago: i64) -> BackstopState {
    BackstopState::new(last_pushlog_id, PUSHDATE - hours_ago * 3600)
}
