//! Pattern init and show specs
//!
//! Verify registering patterns and reading them back.

use crate::prelude::*;

#[test]
fn init_reports_draft_pattern() {
    let temp = Project::empty();

    temp.pp()
        .args(&["init", "p1", "--title", "Circuit breaker"])
        .passes()
        .stdout_eq("Initialized pattern p1 (draft at draft)\n");
}

#[test]
fn init_writes_versioned_state_file() {
    let temp = Project::empty();
    temp.pp()
        .args(&[
            "init",
            "p1",
            "--title",
            "Circuit breaker",
            "--summary",
            "Stop calling a failing dependency",
            "--source",
            "patterns/p1.md",
        ])
        .passes();

    let state = temp.state();
    assert_eq!(state["version"], "1.0.0");
    let pattern = &state["patterns"]["p1"];
    assert_eq!(pattern["currentStep"], "draft");
    assert_eq!(pattern["status"], "draft");
    assert_eq!(pattern["steps"]["draft"]["status"], "completed");
    assert_eq!(pattern["steps"]["finalized"]["status"], "pending");
    assert_eq!(pattern["metadata"]["title"], "Circuit breaker");
    assert_eq!(pattern["metadata"]["sourcePaths"][0], "patterns/p1.md");
}

#[test]
fn init_json_output_is_the_record() {
    let temp = Project::empty();

    let run = temp
        .pp()
        .args(&["init", "p1", "--title", "t", "--output", "json"])
        .passes();

    let json = run.json();
    assert_eq!(json["id"], "p1");
    assert_eq!(json["steps"].as_object().unwrap().len(), 6);
    assert!(json["errors"].as_array().unwrap().is_empty());
}

#[test]
fn init_duplicate_fails_with_hint() {
    let temp = Project::empty();
    temp.init("p1");

    temp.pp()
        .args(&["init", "p1", "--title", "again"])
        .fails()
        .stderr_has("pattern already exists: p1")
        .stderr_has("pp show p1");
}

#[test]
fn show_renders_steps() {
    let temp = Project::empty();
    temp.init("p1");

    temp.pp()
        .args(&["show", "p1"])
        .passes()
        .stdout_has("Pattern: p1")
        .stdout_has("Status: draft")
        .stdout_has("Current step: draft")
        .stdout_has("published");
}

#[test]
fn show_unknown_pattern_fails() {
    let temp = Project::empty();

    temp.pp()
        .args(&["show", "ghost"])
        .fails()
        .stderr_has("pattern not found: ghost")
        .stderr_has("pp list");
}
