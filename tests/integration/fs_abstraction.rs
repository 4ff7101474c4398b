// tests/integration/fs_abstraction.rs

use std::path::Path;

use taskprune::fs::mock::MockFileSystem;
use taskprune::fs::{FileSystem, RealFileSystem};
use taskprune::graph::{load_graph, write_graph};
use taskprune::push::io::{load_backstop_state, load_changed_files, load_push_context};

use crate::common::{labels, sample_graph};

#[test]
fn test_written_graph_loads_back_in_topological_order() {
    let fs = MockFileSystem::new();
    let graph = sample_graph();

    write_graph(&fs, Path::new("out/optimized.json"), &graph).unwrap();
    let loaded = load_graph(&fs, Path::new("out/optimized.json")).unwrap();

    assert_eq!(loaded.len(), graph.len());
    let order = labels(&loaded);
    let pos = |l: &str| order.iter().position(|x| *x == l).unwrap();
    assert!(pos("toolchain-clang") < pos("build-linux64/opt"));
    assert!(pos("build-linux64/opt") < pos("build-signing-linux64/opt"));
}

#[test]
fn test_push_inputs_load_from_decision_parameters() {
    let fs = MockFileSystem::new();
    fs.add_file(
        "parameters.json",
        r#"{
            "project": "autoland",
            "head_repository": "https://hg.mozilla.org/integration/autoland",
            "pushdate": 1593029536,
            "pushlog_id": "40",
            "level": "3",
            "optimize_strategies": null
        }"#,
    );
    fs.add_file(
        "backstop.json",
        r#"{"last_backstop_pushlog_id": 20, "last_backstop_pushdate": 1593000000}"#,
    );
    fs.add_file("changed.txt", "# files\ndom/media/A.cpp\n\nwidget\\gtk\\nsWindow.cpp\n");

    let push = load_push_context(&fs, Path::new("parameters.json")).unwrap();
    assert_eq!(push.pushlog_id, 40);
    assert_eq!(push.project, "autoland");

    let state = load_backstop_state(&fs, Path::new("backstop.json")).unwrap();
    assert_eq!(state.last_backstop_pushlog_id, Some(20));

    let changed = load_changed_files(&fs, Path::new("changed.txt")).unwrap();
    assert_eq!(changed, vec!["dom/media/A.cpp", "widget/gtk/nsWindow.cpp"]);
}

#[test]
fn test_real_filesystem_creates_parent_directories() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("graph.json");

    write_graph(&RealFileSystem, &path, &sample_graph()).unwrap();

    assert!(RealFileSystem.exists(&path));
    let loaded = load_graph(&RealFileSystem, &path).unwrap();
    assert_eq!(loaded.len(), sample_graph().len());
}
