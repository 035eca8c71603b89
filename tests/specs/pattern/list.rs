//! Pattern list specs
//!
//! Verify listing and status filtering.

use crate::prelude::*;

#[test]
fn list_empty() {
    let temp = Project::empty();

    temp.pp().args(&["list"]).passes().stdout_eq("No patterns\n");
}

#[test]
fn list_shows_every_pattern() {
    let temp = Project::empty();
    temp.init("alpha");
    temp.init("beta");

    temp.pp()
        .args(&["list"])
        .passes()
        .stdout_has("ID")
        .stdout_has("alpha")
        .stdout_has("beta");
}

#[test]
fn list_filters_by_status() {
    let temp = Project::empty();
    temp.init("alpha");
    temp.init("beta");
    temp.step("transition", "beta", "ingested");

    let run = temp
        .pp()
        .args(&["list", "--status", "in-progress", "--output", "json"])
        .passes();
    let ids: Vec<_> = run
        .json()
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["beta"]);

    temp.pp()
        .args(&["list", "--status", "draft"])
        .passes()
        .stdout_has("alpha");
}

#[test]
fn list_rejects_unknown_status() {
    let temp = Project::empty();

    temp.pp().args(&["list", "--status", "paused"]).fails();
}
