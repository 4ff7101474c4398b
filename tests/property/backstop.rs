// tests/property/backstop.rs

use proptest::prelude::*;
use taskprune::config::ConfigFile;
use taskprune::optimize::GraphOptimizer;
use taskprune::push::{is_backstop, BackstopPolicy, BackstopState, PushContext};
use taskprune_test_utils::builders::{GraphBuilder, JobBuilder};

const HOUR: i64 = 3600;

fn project() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("autoland"), Just("try"), Just("mozilla-central")]
}

proptest! {
    #[test]
    fn backstop_keeps_every_eligible_job(
        pushlog_id in 1u64..200,
        last in 0u64..200,
        hours_since in 0i64..12,
        project in project(),
    ) {
        let graph = GraphBuilder::new()
            .with_job(JobBuilder::new("build", "build").optimization("never"))
            .with_job(JobBuilder::new("signing", "build-signing").after("build").optimization("skip-unless-depended-on"))
            .with_job(JobBuilder::new("test", "test").after("build").optimization("never"))
            .with_job(JobBuilder::new("fuzzing", "build").excluded_projects(&[project]))
            .build();

        let push_date = 1593029536;
        let push = PushContext::new(project, "repo", push_date, pushlog_id);
        let state = BackstopState::new(last, push_date - hours_since * HOUR);
        let policy = BackstopPolicy::default();

        let optimizer = GraphOptimizer::from_config(&ConfigFile::default()).unwrap();
        let optimized = optimizer.optimize(&graph, &push, &state, None).unwrap();

        if is_backstop(&push, &state, &policy) {
            prop_assert_eq!(optimized.len(), 3);
            prop_assert!(optimized.summary().backstop.is_some());
        } else {
            prop_assert_eq!(optimized.len(), 0);
        }
        prop_assert!(!optimized.contains("fuzzing"));
    }

    #[test]
    fn configured_try_project_never_backstops(pushlog_id in 0u64..1000, hours_since in 0i64..1000) {
        let push = PushContext::new("try", "repo", 1593029536, pushlog_id);
        let state = BackstopState::new(0, 1593029536 - hours_since * HOUR);
        let policy = BackstopPolicy {
            try_projects: vec!["try".to_string()],
            ..BackstopPolicy::default()
        };
        prop_assert!(!is_backstop(&push, &state, &policy));
    }

    #[test]
    fn cadence_requires_interval_multiple(pushlog_id in 1u64..1000) {
        let push = PushContext::new("autoland", "repo", 1593029536, pushlog_id);
        let backstop = is_backstop(&push, &BackstopState::default(), &BackstopPolicy::default());
        prop_assert_eq!(backstop, pushlog_id % 20 == 0);
    }
}
