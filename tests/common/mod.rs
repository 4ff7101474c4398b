#![allow(dead_code)]

use serde_json::json;
use taskprune::graph::TaskGraph;
use taskprune_test_utils::builders::{GraphBuilder, JobBuilder};

/// A small graph shaped like a real decision-task output.
///
/// ```text
/// toolchain-clang ──> build-linux64/opt ──> build-signing-linux64/opt
///                           │
///                           ├──> test-linux64/opt-mochitest-media
///                           └──> test-linux64/opt-xpcshell
/// build-linux64-fuzzing/opt        (never on autoland)
/// build-linux64-ccov/opt           (mozilla-central only)
/// source-test-mozlint-eslint       (no optimization, not a must-declare kind)
/// ```
pub fn sample_graph() -> TaskGraph {
    GraphBuilder::new()
        .with_job(JobBuilder::new("toolchain-clang", "toolchain").optimization("skip-unless-depended-on"))
        .with_job(
            JobBuilder::new("build-linux64/opt", "build")
                .after("toolchain-clang")
                .optimization("skip-unless-depended-on"),
        )
        .with_job(
            JobBuilder::new("build-signing-linux64/opt", "build-signing")
                .after("build-linux64/opt")
                .optimization("skip-unless-depended-on"),
        )
        .with_job(
            JobBuilder::new("test-linux64/opt-mochitest-media", "test")
                .after("build-linux64/opt")
                .optimization_with_args("skip-unless-changed", &["dom/media"]),
        )
        .with_job(
            JobBuilder::new("test-linux64/opt-xpcshell", "test")
                .after("build-linux64/opt")
                .optimization_with_args("skip-unless-changed", &["netwerk", "**/xpcshell.toml"]),
        )
        .with_job(
            JobBuilder::new("build-linux64-fuzzing/opt", "build")
                .after("toolchain-clang")
                .optimization("always")
                .excluded_projects(&["autoland", "try"]),
        )
        .with_job(
            JobBuilder::new("build-linux64-ccov/opt", "build")
                .after("toolchain-clang")
                .run_on_projects(&["mozilla-central"])
                .attribute("ccov", json!(true)),
        )
        .with_job(JobBuilder::new("source-test-mozlint-eslint", "source-test"))
        .build()
}

pub fn labels(graph: &TaskGraph) -> Vec<&str> {
    graph.labels().collect()
}

pub fn files(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}
