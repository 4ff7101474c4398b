// tests/property/closure.rs

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use taskprune::config::ConfigFile;
use taskprune::graph::TaskGraph;
use taskprune::optimize::GraphOptimizer;
use taskprune::push::{BackstopState, PushContext};
use taskprune_test_utils::builders::{GraphBuilder, JobBuilder};

const STRATEGIES: [&str; 3] = ["always", "never", "skip-unless-depended-on"];

// Acyclic by construction: job N may only depend on jobs 0..N-1. Some jobs
// carry an `excluded_projects` restriction for "autoland".
fn dag_strategy(max_jobs: usize) -> impl Strategy<Value = TaskGraph> {
    (1..=max_jobs).prop_flat_map(|num_jobs| {
        let deps = proptest::collection::vec(
            proptest::collection::vec(any::<usize>(), 0..3),
            num_jobs,
        );
        let strategies = proptest::collection::vec(0..STRATEGIES.len(), num_jobs);
        let excluded = proptest::collection::vec(prop::bool::weighted(0.15), num_jobs);

        (deps, strategies, excluded).prop_map(move |(raw_deps, strategies, excluded)| {
            let mut builder = GraphBuilder::new();
            for i in 0..num_jobs {
                let mut job = JobBuilder::new(&format!("job-{i}"), "test")
                    .optimization(STRATEGIES[strategies[i]]);

                let valid: BTreeSet<usize> = if i > 0 {
                    raw_deps[i].iter().map(|d| d % i).collect()
                } else {
                    BTreeSet::new()
                };
                for dep in valid {
                    job = job.after(&format!("job-{dep}"));
                }
                if excluded[i] {
                    job = job.excluded_projects(&["autoland"]);
                }
                builder = builder.with_job(job);
            }
            builder.build()
        })
    })
}

fn push(pushlog_id: u64) -> PushContext {
    PushContext::new("autoland", "https://hg.mozilla.org/integration/autoland", 1593029536, pushlog_id)
}

fn cascading_optimizer() -> GraphOptimizer {
    let cfg = taskprune_test_utils::builders::ConfigFileBuilder::new()
        .excluded_dependency(taskprune::types::ExcludedDependencyBehaviour::Cascade)
        .build();
    GraphOptimizer::from_config(&cfg).unwrap()
}

proptest! {
    #[test]
    fn optimized_graph_is_dependency_closed(graph in dag_strategy(12), pushlog_id in 1u64..100) {
        let optimized = cascading_optimizer()
            .optimize(&graph, &push(pushlog_id), &BackstopState::default(), None)
            .unwrap();

        for job in optimized.jobs() {
            for dep in &job.dependencies {
                prop_assert!(optimized.contains(dep), "{} kept without {}", job.label, dep);
            }
        }
    }

    #[test]
    fn excluded_jobs_never_survive(graph in dag_strategy(12), pushlog_id in 1u64..100) {
        let optimized = cascading_optimizer()
            .optimize(&graph, &push(pushlog_id), &BackstopState::default(), None)
            .unwrap();

        for job in optimized.jobs() {
            let excluded = job.attribute_list("excluded_projects").unwrap_or_default();
            prop_assert!(!excluded.contains(&"autoland"), "{} ran on autoland", job.label);
        }
    }

    #[test]
    fn error_mode_either_fails_or_matches_cascade(graph in dag_strategy(12)) {
        let strict = GraphOptimizer::from_config(&ConfigFile::default()).unwrap();
        match strict.optimize(&graph, &push(3), &BackstopState::default(), None) {
            Ok(optimized) => {
                let cascaded = cascading_optimizer()
                    .optimize(&graph, &push(3), &BackstopState::default(), None)
                    .unwrap();
                let a: HashSet<&str> = optimized.labels().collect();
                let b: HashSet<&str> = cascaded.labels().collect();
                prop_assert_eq!(a, b);
            }
            Err(e) => prop_assert!(e.is_structural()),
        }
    }

    #[test]
    fn induce_is_idempotent(graph in dag_strategy(12), pick in proptest::collection::vec(any::<bool>(), 12)) {
        let mut seed: BTreeSet<String> = BTreeSet::new();
        for (job, take) in graph.jobs().zip(pick.iter()) {
            if *take {
                seed.insert(job.label.clone());
                seed.extend(graph.transitive_dependencies_of(&job.label).unwrap());
            }
        }

        let once = graph.induce(&seed).unwrap();
        let twice = once.induce(once.labels()).unwrap();
        prop_assert_eq!(once, twice);
    }
}
