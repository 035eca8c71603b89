//! Error reporting specs
//!
//! Verify argument validation and state file failures surface cleanly.

use crate::prelude::*;

#[test]
fn unknown_step_is_rejected_by_parser() {
    let temp = Project::empty();
    temp.init("p1");

    temp.pp()
        .args(&["transition", "p1", "shipped"])
        .fails()
        .stderr_has("unknown workflow step");
}

#[test]
fn init_requires_title() {
    let temp = Project::empty();

    temp.pp()
        .args(&["init", "p1"])
        .fails()
        .stderr_has("--title");
}

#[test]
fn corrupt_state_file_is_reported() {
    let temp = Project::empty();
    temp.file(".pp/pipeline-state.json", "{ this is not json");

    temp.pp()
        .args(&["list"])
        .fails()
        .stderr_has("json error")
        .stderr_has("valid JSON");
}

#[test]
fn newer_state_file_version_is_rejected() {
    let temp = Project::empty();
    temp.file(
        ".pp/pipeline-state.json",
        r#"{
  "version": "2.0.0",
  "lastUpdated": "2026-01-01T00:00:00Z",
  "patterns": {},
  "global": { "currentStep": null, "stepHistory": [] }
}"#,
    );

    temp.pp()
        .args(&["list"])
        .fails()
        .stderr_has("unsupported state file version 2.0.0");
}

#[test]
fn rejected_command_leaves_state_untouched() {
    let temp = Project::empty();
    temp.init("p1");
    let before = temp.read(".pp/pipeline-state.json");

    temp.pp().args(&["complete", "p1", "tested"]).fails();

    similar_asserts::assert_eq!(before, temp.read(".pp/pipeline-state.json"));
}
