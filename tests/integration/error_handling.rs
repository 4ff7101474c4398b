// tests/integration/error_handling.rs

use std::io::Write;

use tempfile::NamedTempFile;
use taskprune::config::{load_and_validate, ConfigFile};
use taskprune::errors::TaskpruneError;
use taskprune::graph::parse_graph;
use taskprune::optimize::GraphOptimizer;
use taskprune::push::BackstopState;
use taskprune_test_utils::builders::{autoland_push, ConfigFileBuilder, GraphBuilder, JobBuilder};

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn test_bad_min_interval_returns_config_error() {
    let file = config_file(
        r#"
[backstop]
min_interval = "four hours"
"#,
    );

    match load_and_validate(file.path()) {
        Err(TaskpruneError::ConfigError(msg)) => {
            assert!(msg.contains("min_interval"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_unknown_excluded_dependency_mode_is_a_toml_error() {
    let file = config_file(
        r#"
[optimizer]
excluded_dependency = "ignore"
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(matches!(err, TaskpruneError::TomlError(_)), "got {err:?}");
}

#[test]
fn test_project_cannot_be_both_try_and_integration() {
    let file = config_file(
        r#"
[backstop]
integration_projects = ["autoland", "try"]
try_projects = ["try"]
"#,
    );

    let err = load_and_validate(file.path()).unwrap_err();
    assert!(err.is_configuration());
    assert!(err.to_string().contains("try"));
}

#[test]
fn test_alias_to_unknown_strategy_fails_optimizer_construction() {
    let cfg = ConfigFileBuilder::new()
        .strategy_alias("skip-unless-schedules", "bugbug-reduced")
        .build();

    match GraphOptimizer::from_config(&cfg) {
        Err(TaskpruneError::ConfigError(msg)) => {
            assert!(msg.contains("bugbug-reduced"));
        }
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_graph_cycle_returns_structured_error() {
    let result = parse_graph(
        r#"[
            {"label": "A", "kind": "build", "dependencies": ["B"]},
            {"label": "B", "kind": "build", "dependencies": ["A"]}
        ]"#,
    );

    match result {
        Err(TaskpruneError::Cycle { path }) => {
            assert!(path.contains(&"A".to_string()));
            assert!(path.contains(&"B".to_string()));
        }
        Err(e) => panic!("Expected Cycle error, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_dangling_dependency_names_both_jobs() {
    let result = parse_graph(
        r#"{"test-A": {"kind": "test", "dependencies": ["build-missing"]}}"#,
    );

    match result {
        Err(TaskpruneError::DanglingDependency { job, dependency }) => {
            assert_eq!(job, "test-A");
            assert_eq!(dependency, "build-missing");
        }
        Err(e) => panic!("Expected DanglingDependency, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_unknown_strategy_is_not_replaced_by_a_default() {
    let graph = GraphBuilder::new()
        .with_job(JobBuilder::new("build-A", "build").optimization("index-search"))
        .with_job(JobBuilder::new("test-B", "test").after("build-A"))
        .build();

    let optimizer = GraphOptimizer::from_config(&ConfigFile::default()).unwrap();
    let err = optimizer
        .optimize(&graph, &autoland_push(2), &BackstopState::default(), None)
        .unwrap_err();

    assert!(err.is_configuration());
    assert!(matches!(
        err,
        TaskpruneError::UnknownStrategy { ref job, ref strategy }
            if job == "build-A" && strategy == "index-search"
    ));
}

#[test]
fn test_lookup_of_unknown_label_is_recoverable() {
    let graph = GraphBuilder::new()
        .with_job(JobBuilder::new("build-A", "build"))
        .build();

    let err = graph.dependents_of("build-Z", true).unwrap_err();
    assert!(err.is_lookup());
    assert!(!err.is_structural());
}
