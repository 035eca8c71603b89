//! Configuration specs
//!
//! Verify where the state file lives and how overrides stack.

use crate::prelude::*;

#[test]
fn default_state_file_under_pp_dir() {
    let temp = Project::empty();
    temp.init("p1");

    assert!(temp.path().join(".pp/pipeline-state.json").is_file());
}

#[test]
fn config_file_moves_state_file() {
    let temp = Project::empty();
    temp.file(".pp/config.toml", "state_file = \"state/custom.json\"\n");
    temp.init("p1");

    assert!(temp.path().join("state/custom.json").is_file());
    assert!(!temp.path().join(".pp/pipeline-state.json").exists());
}

#[test]
fn env_overrides_config_and_flag_overrides_env() {
    let temp = Project::empty();
    temp.file(".pp/config.toml", "state_file = \"from-config.json\"\n");

    temp.pp()
        .env("PP_STATE_FILE", "from-env.json")
        .args(&["init", "p1", "--title", "t"])
        .passes();
    assert!(temp.path().join("from-env.json").is_file());

    temp.pp()
        .env("PP_STATE_FILE", "from-env.json")
        .args(&["--state-file", "from-flag.json", "init", "p2", "--title", "t"])
        .passes();
    assert!(temp.path().join("from-flag.json").is_file());
    assert!(!temp.path().join("from-config.json").exists());
}

#[test]
fn project_flag_targets_another_directory() {
    let temp = Project::empty();
    let elsewhere = Project::empty();
    let root = temp.path().to_str().unwrap();

    elsewhere
        .pp()
        .args(&["--project", root, "init", "p1", "--title", "t"])
        .passes();

    assert!(temp.path().join(".pp/pipeline-state.json").is_file());
    elsewhere.pp().args(&["list"]).passes().stdout_eq("No patterns\n");
}

#[test]
fn nested_directory_finds_project_root() {
    let temp = Project::empty();
    temp.init("p1");
    std::fs::create_dir_all(temp.path().join("docs/patterns")).unwrap();

    let mut cmd = assert_cmd::Command::cargo_bin("pp").unwrap();
    cmd.current_dir(temp.path().join("docs/patterns"))
        .env_remove("PP_STATE_FILE")
        .args(["show", "p1"])
        .assert()
        .success()
        .stdout(predicates::str::contains("Pattern: p1"));
}

#[test]
fn logs_go_to_stderr() {
    let temp = Project::empty();

    let run = temp
        .pp()
        .env("PP_LOG", "debug")
        .args(&["init", "p1", "--title", "t", "--output", "json"])
        .passes()
        .stderr_has("pattern initialized");
    assert_eq!(run.json()["id"], "p1");
}

#[test]
fn invalid_config_is_reported() {
    let temp = Project::empty();
    temp.file(".pp/config.toml", "max_attempts = 0\n");

    temp.pp()
        .args(&["list"])
        .fails()
        .stderr_has("max_attempts must be at least 1");
}
