//! Step lifecycle specs
//!
//! Verify transitions, start/complete/fail and checkpoints end to end.

use crate::prelude::*;

const STEPS: [&str; 6] = [
    "draft",
    "ingested",
    "tested",
    "validated",
    "published",
    "finalized",
];

#[test]
fn walkthrough_from_draft_to_failed_test() {
    let temp = Project::empty();
    temp.init("p1");

    temp.step("transition", "p1", "ingested")
        .stdout_eq("Pattern p1 moved to ingested (in-progress at ingested)\n");
    temp.step("start", "p1", "ingested")
        .stdout_eq("Started ingested of p1 (in-progress at ingested)\n");
    temp.step("complete", "p1", "ingested")
        .stdout_eq("Completed ingested of p1 (ready at tested)\n");
    temp.pp()
        .args(&["fail", "p1", "tested", "network timeout"])
        .passes()
        .stdout_eq("Recorded failure of tested for p1 (ready at tested)\n");

    let pattern = &temp.state()["patterns"]["p1"];
    assert_eq!(pattern["steps"]["ingested"]["status"], "completed");
    assert_eq!(pattern["steps"]["tested"]["status"], "failed");
    assert_eq!(pattern["errors"][0]["step"], "tested");
    assert_eq!(pattern["errors"][0]["code"], "step_failed");
    assert_eq!(pattern["errors"][0]["message"], "network timeout");
}

#[test]
fn transition_cannot_skip_steps() {
    let temp = Project::empty();
    temp.init("p1");

    temp.pp()
        .args(&["transition", "p1", "tested"])
        .fails()
        .stderr_has("draft -> tested")
        .stderr_has("pp transition p1 ingested");

    assert_eq!(temp.state()["patterns"]["p1"]["currentStep"], "draft");
}

#[test]
fn can_transition_exit_code_reflects_verdict() {
    let temp = Project::empty();
    temp.init("p1");

    temp.pp()
        .args(&["can-transition", "p1", "ingested"])
        .passes()
        .stdout_eq("Transition of p1 to ingested: allowed\n");
    temp.pp()
        .args(&["can-transition", "p1", "validated"])
        .fails()
        .stdout_eq("Transition of p1 to validated: not allowed\n");
    temp.pp()
        .args(&["can-transition", "ghost", "ingested"])
        .fails();
}

#[test]
fn completing_every_step_completes_pattern() {
    let temp = Project::empty();
    temp.init("p1");
    temp.step("transition", "p1", "ingested");

    for step in &STEPS[1..] {
        temp.step("start", "p1", step);
        temp.step("complete", "p1", step);
    }

    let pattern = &temp.state()["patterns"]["p1"];
    assert_eq!(pattern["status"], "completed");
    assert_eq!(pattern["currentStep"], "finalized");
    for step in STEPS {
        assert_eq!(pattern["steps"][step]["status"], "completed", "{step}");
    }
    temp.pp()
        .args(&["can-transition", "p1", "draft"])
        .fails();
}

#[test]
fn step_commands_only_touch_current_step() {
    let temp = Project::empty();
    temp.init("p1");

    temp.pp()
        .args(&["start", "p1", "validated"])
        .fails()
        .stderr_has("not the current step (draft)");
}

#[test]
fn fail_accepts_code_and_details() {
    let temp = Project::empty();
    temp.init("p1");
    temp.step("transition", "p1", "ingested");

    temp.pp()
        .args(&[
            "fail",
            "p1",
            "ingested",
            "schema mismatch",
            "--code",
            "validation_error",
            "--details",
            r#"{"field":"title"}"#,
        ])
        .passes();

    let error = &temp.state()["patterns"]["p1"]["errors"][0];
    assert_eq!(error["code"], "validation_error");
    assert_eq!(error["details"]["field"], "title");
}

#[test]
fn checkpoints_append_in_order() {
    let temp = Project::empty();
    temp.init("p1");
    temp.step("transition", "p1", "ingested");

    temp.pp()
        .args(&["checkpoint", "p1", "ingested", "fetched source"])
        .passes()
        .stdout_has("Checkpoint 'fetched source' recorded on ingested of p1");
    temp.pp()
        .args(&[
            "checkpoint",
            "p1",
            "ingested",
            "ran linter",
            "--data",
            r#"{"warnings":2}"#,
        ])
        .passes();
    temp.pp()
        .args(&[
            "checkpoint",
            "p1",
            "ingested",
            "parse front matter",
            "--error",
            "missing title",
        ])
        .passes();

    let checkpoints = temp.state()["patterns"]["p1"]["steps"]["ingested"]["checkpoints"].clone();
    let checkpoints = checkpoints.as_array().unwrap();
    assert_eq!(checkpoints.len(), 3);
    assert_eq!(checkpoints[0]["operation"], "fetched source");
    assert_eq!(checkpoints[1]["data"]["warnings"], 2);
    assert_eq!(checkpoints[2]["error"], "missing title");
}

#[test]
fn checkpoint_rejects_invalid_json() {
    let temp = Project::empty();
    temp.init("p1");

    temp.pp()
        .args(&["checkpoint", "p1", "draft", "op", "--data", "{not json"])
        .fails()
        .stderr_has("--data is not valid JSON");
}

#[test]
fn global_history_tracks_status_changes() {
    let temp = Project::empty();
    temp.init("p1");
    temp.step("transition", "p1", "ingested");

    let global = temp.state()["global"].clone();
    assert_eq!(global["currentStep"], "ingested");
    assert_eq!(global["stepHistory"][0], "p1:ingested");
}

#[test]
fn completed_pattern_is_frozen() {
    let temp = Project::empty();
    temp.init("p1");
    temp.step("transition", "p1", "ingested");
    for step in &STEPS[1..] {
        temp.step("start", "p1", step);
        temp.step("complete", "p1", step);
    }

    temp.pp()
        .args(&["start", "p1", "finalized"])
        .fails()
        .stderr_has("pattern p1 is completed and accepts no further step changes")
        .stderr_has("pp show p1");
    temp.pp()
        .args(&["fail", "p1", "finalized", "late report"])
        .fails()
        .stderr_has("accepts no further step changes");
    temp.pp()
        .args(&["checkpoint", "p1", "finalized", "late note"])
        .fails();

    let pattern = &temp.state()["patterns"]["p1"];
    assert_eq!(pattern["status"], "completed");
    assert_eq!(pattern["steps"]["finalized"]["status"], "completed");
    assert!(pattern["errors"].as_array().map_or(true, |e| e.is_empty()));
}
