// src/strategy/exclusion.rs

use crate::config::model::ExclusionSection;
use crate::graph::Job;
use crate::strategy::{EvalContext, OptimizationStrategy};
use crate::types::Decision;

/// Allow-list entry matching every project.
pub const ALL_PROJECTS: &str = "all";

/// Hard project-compatibility filter.
///
/// A job is excluded for a project when either
/// - the project appears in the job's excluded-projects attribute, or
/// - the job has a run-on-projects attribute that lists neither the project
///   nor `"all"` (an empty list runs nowhere).
///
/// The optimizer applies this before backstop detection and never re-adds an
/// excluded job. It is also registered as a regular strategy.
#[derive(Debug, Clone)]
pub struct ProjectExclusion {
    excluded_projects_attribute: String,
    run_on_projects_attribute: Option<String>,
}

impl Default for ProjectExclusion {
    fn default() -> Self {
        Self::from_config(&ExclusionSection::default())
    }
}

impl ProjectExclusion {
    pub fn from_config(section: &ExclusionSection) -> Self {
        Self {
            excluded_projects_attribute: section.excluded_projects_attribute.clone(),
            run_on_projects_attribute: section.run_on_projects_attribute.clone(),
        }
    }

    /// Whether `job` must never run on `project`.
    pub fn excludes(&self, job: &Job, project: &str) -> bool {
        if let Some(excluded) = job.attribute_list(&self.excluded_projects_attribute) {
            if excluded.contains(&project) {
                return true;
            }
        }

        if let Some(attr) = &self.run_on_projects_attribute {
            if let Some(allowed) = job.attribute_list(attr) {
                return !allowed.iter().any(|p| *p == project || *p == ALL_PROJECTS);
            }
        }

        false
    }
}

impl OptimizationStrategy for ProjectExclusion {
    fn decide(&self, job: &Job, cx: &EvalContext<'_>) -> anyhow::Result<Decision> {
        if self.excludes(job, &cx.push.project) {
            Ok(Decision::Drop)
        } else {
            Ok(Decision::Keep)
        }
    }
}
