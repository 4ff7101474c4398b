// src/push/backstop.rs

//! Backstop detection: deciding whether a push must run the full,
//! unoptimized graph.
//!
//! Detection is a pure function of the push context, the last recorded
//! backstop and the configured cadence. It knows nothing about jobs.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::push::context::PushContext;

/// The most recent backstop push, as recorded by whoever ran it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackstopState {
    /// Recorded for diagnostics; the cadence rule only looks at the date.
    #[serde(default)]
    pub last_backstop_pushlog_id: Option<u64>,

    /// Epoch seconds.
    #[serde(default, rename = "last_backstop_pushdate", alias = "last_backstop_push_date")]
    pub last_backstop_push_date: Option<i64>,
}

impl BackstopState {
    pub fn new(last_backstop_pushlog_id: u64, last_backstop_push_date: i64) -> Self {
        Self {
            last_backstop_pushlog_id: Some(last_backstop_pushlog_id),
            last_backstop_push_date: Some(last_backstop_push_date),
        }
    }
}

/// Backstop cadence, resolved from the `[backstop]` config section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackstopPolicy {
    /// Only pushes whose pushlog id is a multiple of this are candidates.
    pub push_interval: u64,
    /// Required spacing after the previous backstop's push date.
    pub min_interval: Duration,
    /// Opt-in; empty means no project is forced to a backstop.
    pub integration_projects: Vec<String>,
    /// Opt-in; empty means no project is exempt from backstops.
    pub try_projects: Vec<String>,
}

impl Default for BackstopPolicy {
    fn default() -> Self {
        Self {
            push_interval: 20,
            min_interval: Duration::from_secs(4 * 60 * 60),
            integration_projects: Vec::new(),
            try_projects: Vec::new(),
        }
    }
}

/// Why a push was classified as a backstop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackstopReason {
    /// Project is not optimized at all; everything always runs.
    NonIntegrationProject,
    /// Push interval and minimum spacing both satisfied.
    Cadence,
}

impl fmt::Display for BackstopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackstopReason::NonIntegrationProject => f.write_str("non-integration project"),
            BackstopReason::Cadence => f.write_str("backstop cadence"),
        }
    }
}

impl BackstopPolicy {
    /// Classify a push. `None` means optimization applies.
    ///
    /// A push is a backstop when its pushlog id is a multiple of
    /// `push_interval` and its push date is strictly later than the last
    /// backstop's date plus `min_interval` (no recorded date satisfies the
    /// second half).
    ///
    /// Two project classes apply first when configured:
    /// - projects in `try_projects` are never backstops;
    /// - with a non-empty `integration_projects`, any project outside it
    ///   always is.
    pub fn reason(&self, context: &PushContext, state: &BackstopState) -> Option<BackstopReason> {
        let project = context.project.as_str();

        if self.try_projects.iter().any(|p| p == project) {
            return None;
        }

        if !self.integration_projects.is_empty()
            && !self.integration_projects.iter().any(|p| p == project)
        {
            return Some(BackstopReason::NonIntegrationProject);
        }

        if self.push_interval == 0 || context.pushlog_id % self.push_interval != 0 {
            return None;
        }

        let spaced = match state.last_backstop_push_date {
            None => true,
            Some(last_date) => {
                let min_secs = i64::try_from(self.min_interval.as_secs()).unwrap_or(i64::MAX);
                context.push_date > last_date.saturating_add(min_secs)
            }
        };

        spaced.then_some(BackstopReason::Cadence)
    }
}

/// Whether `context` is a backstop push under `policy`.
pub fn is_backstop(context: &PushContext, state: &BackstopState, policy: &BackstopPolicy) -> bool {
    let reason = policy.reason(context, state);
    debug!(
        push = %context,
        ?state,
        backstop = reason.is_some(),
        ?reason,
        "backstop check"
    );
    reason.is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUSHDATE: i64 = 1593029536;

    fn ctx(project: &str, pushlog_id: u64, push_date: i64) -> PushContext {
        PushContext::new(project, "https://hg.mozilla.org/integration/autoland", push_date, pushlog_id)
    }

    fn policy() -> BackstopPolicy {
        BackstopPolicy {
            push_interval: 10,
            min_interval: Duration::from_secs(60 * 60),
            ..BackstopPolicy::default()
        }
    }

    fn with_project_classes() -> BackstopPolicy {
        BackstopPolicy {
            integration_projects: vec!["autoland".to_string()],
            try_projects: vec!["try".to_string()],
            ..policy()
        }
    }

    #[test]
    fn non_multiple_push_is_not_a_backstop() {
        let state = BackstopState::new(10, PUSHDATE - 10 * 3600);
        assert!(!is_backstop(&ctx("autoland", 2, PUSHDATE), &state, &policy()));
        assert!(!is_backstop(&ctx("autoland", 21, PUSHDATE), &state, &policy()));
    }

    #[test]
    fn multiple_push_after_spacing_is_a_backstop() {
        let state = BackstopState::new(10, PUSHDATE - 2 * 3600);
        assert_eq!(
            policy().reason(&ctx("autoland", 20, PUSHDATE), &state),
            Some(BackstopReason::Cadence)
        );
    }

    #[test]
    fn spacing_must_be_strictly_exceeded() {
        let last = PUSHDATE - 3600;
        let state = BackstopState::new(10, last);
        assert!(!is_backstop(&ctx("autoland", 20, PUSHDATE), &state, &policy()));
        assert!(is_backstop(&ctx("autoland", 20, PUSHDATE + 1), &state, &policy()));
    }

    #[test]
    fn no_recorded_backstop_only_needs_the_interval() {
        let state = BackstopState::default();
        assert!(is_backstop(&ctx("autoland", 30, PUSHDATE), &state, &policy()));
        assert!(!is_backstop(&ctx("autoland", 31, PUSHDATE), &state, &policy()));
    }

    #[test]
    fn default_policy_applies_the_same_rule_to_every_project() {
        let state = BackstopState::new(20, PUSHDATE - 48 * 3600);
        let policy = BackstopPolicy::default();
        for project in ["autoland", "try", "mozilla-central"] {
            assert!(is_backstop(&ctx(project, 40, PUSHDATE), &state, &policy), "{project}#40");
            assert!(!is_backstop(&ctx(project, 3, PUSHDATE), &state, &policy), "{project}#3");
        }
    }

    #[test]
    fn project_classes_override_cadence_when_configured() {
        let state = BackstopState::default();
        let classes = with_project_classes();
        assert!(!is_backstop(&ctx("try", 20, PUSHDATE), &state, &classes));
        assert_eq!(
            classes.reason(&ctx("mozilla-central", 3, PUSHDATE), &state),
            Some(BackstopReason::NonIntegrationProject)
        );
        assert_eq!(
            classes.reason(&ctx("autoland", 20, PUSHDATE), &state),
            Some(BackstopReason::Cadence)
        );
    }
}
