//! Retry and escalation specs
//!
//! Verify the retry cap from config and what escalation does to a pattern.

use crate::prelude::*;

fn failed_at_tested(temp: &Project) {
    temp.init("p1");
    temp.step("transition", "p1", "ingested");
    temp.step("start", "p1", "ingested");
    temp.step("complete", "p1", "ingested");
    temp.pp()
        .args(&["fail", "p1", "tested", "network timeout"])
        .passes();
}

#[test]
fn retry_stops_after_configured_attempts() {
    let temp = Project::empty();
    temp.file(".pp/config.toml", "max_attempts = 2\n");
    failed_at_tested(&temp);

    temp.step("retry", "p1", "tested")
        .stdout_has("attempt 1/2");
    temp.pp()
        .args(&["fail", "p1", "tested", "network timeout"])
        .passes();
    temp.step("retry", "p1", "tested")
        .stdout_has("attempt 2/2");
    temp.pp()
        .args(&["fail", "p1", "tested", "network timeout"])
        .passes();

    temp.pp()
        .args(&["retry", "p1", "tested"])
        .fails()
        .stderr_has("exhausted its retries (2/2)")
        .stderr_has("pp escalate p1 tested");

    let tested = &temp.state()["patterns"]["p1"]["steps"]["tested"];
    assert_eq!(tested["status"], "failed");
    assert_eq!(tested["attempts"], 2);
}

#[test]
fn retry_requires_failed_step() {
    let temp = Project::empty();
    temp.init("p1");
    temp.step("transition", "p1", "ingested");

    temp.pp()
        .args(&["retry", "p1", "ingested"])
        .fails()
        .stderr_has("not failed");
}

#[test]
fn escalate_with_retries_left_blocks_pattern() {
    let temp = Project::empty();
    failed_at_tested(&temp);

    temp.step("escalate", "p1", "tested")
        .stdout_eq("Escalated tested of p1 (blocked at tested)\n");
    temp.pp()
        .args(&["list", "--status", "blocked"])
        .passes()
        .stdout_has("p1");
}

#[test]
fn escalate_after_exhaustion_fails_pattern() {
    let temp = Project::empty();
    temp.file(".pp/config.toml", "max_attempts = 1\n");
    failed_at_tested(&temp);
    temp.step("retry", "p1", "tested");
    temp.pp()
        .args(&["fail", "p1", "tested", "network timeout"])
        .passes();

    temp.step("escalate", "p1", "tested")
        .stdout_eq("Escalated tested of p1 (failed at tested)\n");
}

#[test]
fn blocked_pattern_recovers_through_retry_and_complete() {
    let temp = Project::empty();
    failed_at_tested(&temp);
    temp.step("escalate", "p1", "tested");

    temp.step("retry", "p1", "tested");
    temp.step("complete", "p1", "tested")
        .stdout_eq("Completed tested of p1 (ready at validated)\n");
}
