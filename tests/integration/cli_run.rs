// tests/integration/cli_run.rs

use clap::Parser;
use taskprune::cli::CliArgs;
use taskprune::errors::TaskpruneError;
use taskprune::fs::mock::MockFileSystem;
use taskprune::graph::{graph_to_json, parse_graph};
use taskprune::run_with_fs;
use taskprune_test_utils::init_tracing;

use crate::common::sample_graph;

const PARAMS: &str = r#"{
    "project": "autoland",
    "head_repository": "https://hg.mozilla.org/integration/autoland",
    "pushdate": 1593029536,
    "pushlog_id": "2"
}"#;

fn workspace() -> MockFileSystem {
    let fs = MockFileSystem::new();
    fs.add_file("full.json", graph_to_json(&sample_graph()).unwrap());
    fs.add_file("parameters.json", PARAMS);
    fs.add_file("changed.txt", "dom/media/webcodecs/VideoFrame.cpp\n");
    fs
}

fn run(fs: &MockFileSystem, argv: &[&str]) -> anyhow::Result<String> {
    init_tracing();
    let mut full_argv = vec!["taskprune", "--graph", "full.json"];
    full_argv.extend_from_slice(argv);
    let args = CliArgs::try_parse_from(full_argv).unwrap();

    let mut out = Vec::new();
    run_with_fs(&args, fs, &mut out)?;
    Ok(String::from_utf8(out).unwrap())
}

#[test]
fn test_optimized_graph_is_written_to_output() {
    let fs = workspace();
    let stdout = run(
        &fs,
        &[
            "--params",
            "parameters.json",
            "--changed-files",
            "changed.txt",
            "--output",
            "optimized.json",
        ],
    )
    .unwrap();
    assert!(stdout.is_empty());

    let optimized = parse_graph(&fs.contents("optimized.json").unwrap()).unwrap();
    assert_eq!(optimized.len(), 4);
    assert!(optimized.contains("test-linux64/opt-mochitest-media"));
    assert!(!optimized.contains("test-linux64/opt-xpcshell"));
}

#[test]
fn test_without_params_the_full_graph_is_printed() {
    let fs = workspace();
    let stdout = run(&fs, &[]).unwrap();
    let graph = parse_graph(&stdout).unwrap();
    assert_eq!(graph.len(), sample_graph().len());
}

#[test]
fn test_filter_lists_matching_labels() {
    let fs = workspace();
    let stdout = run(
        &fs,
        &[
            "--params",
            "parameters.json",
            "--changed-files",
            "changed.txt",
            "--filter",
            "^test-",
        ],
    )
    .unwrap();
    assert_eq!(stdout, "test-linux64/opt-mochitest-media\n");
}

#[test]
fn test_invalid_filter_fails_before_optimizing() {
    let fs = workspace();
    let err = run(&fs, &["--filter", "(unclosed"]).unwrap_err();
    assert!(format!("{err:#}").contains("--filter"));
}

#[test]
fn test_dependents_tree_is_printed() {
    let fs = workspace();
    let stdout = run(&fs, &["--dependents", "build-linux64/opt"]).unwrap();
    assert_eq!(
        stdout,
        "\
Dependent tasks of build-linux64/opt:
  build-signing-linux64/opt
  test-linux64/opt-mochitest-media
  test-linux64/opt-xpcshell
"
    );
}

#[test]
fn test_check_coverage_reports_missing_optimizations() {
    let fs = workspace();
    fs.add_file(
        "Taskprune.toml",
        r#"
[coverage]
must_declare_kinds = ["build", "source-test"]
"#,
    );

    let err = run(&fs, &["--check-coverage"]).unwrap_err();
    match err.downcast_ref::<TaskpruneError>() {
        Some(TaskpruneError::MissingOptimization(report)) => {
            assert!(report.starts_with("The following task is missing an optimization:"));
            assert!(report.contains("source-test-mozlint-eslint"));
            assert!(!report.contains("ccov"));
        }
        other => panic!("Expected MissingOptimization, got: {:?}", other),
    }
}

#[test]
fn test_dry_run_reports_backstop_status_without_output() {
    let fs = workspace();
    let stdout = run(
        &fs,
        &["--params", "parameters.json", "--output", "optimized.json", "--dry-run"],
    )
    .unwrap();

    assert!(stdout.starts_with("taskprune dry-run\n"));
    assert!(stdout.contains("graph: 8 jobs"));
    assert!(stdout.contains("push: autoland#2"));
    assert!(stdout.contains("backstop: no"));
    assert!(stdout.contains("changed files: unknown"));
    assert!(fs.contents("optimized.json").is_none());
}
