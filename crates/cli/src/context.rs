// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Project resolution and state machine wiring

use anyhow::{Context as _, Result};
use pp_core::{PipelineConfig, SystemClock};
use pp_engine::StateMachine;
use pp_storage::{JsonFileStore, TracedStore};
use std::path::{Path, PathBuf};

/// Environment variable overriding the configured state file
pub const STATE_FILE_ENV: &str = "PP_STATE_FILE";

pub type Machine = StateMachine<TracedStore<JsonFileStore<SystemClock>>, SystemClock>;

pub struct Context {
    pub machine: Machine,
}

impl Context {
    pub fn load(project: Option<PathBuf>, state_file: Option<PathBuf>) -> Result<Self> {
        let project_root = match project {
            Some(root) => root,
            None => {
                let cwd = std::env::current_dir().context("cannot read current directory")?;
                find_project_root(&cwd)
            }
        };

        let config = resolve_config(
            PipelineConfig::load(&project_root)?,
            std::env::var_os(STATE_FILE_ENV).map(PathBuf::from),
            state_file,
        );
        let path = config.state_path(&project_root);
        tracing::debug!(path = %path.display(), max_attempts = config.max_attempts, "opening state file");

        let store = JsonFileStore::open(&path, SystemClock)?.with_lock_timeout(config.lock_timeout);
        let machine = StateMachine::new(TracedStore::new(store), SystemClock, &config);
        Ok(Self { machine })
    }
}

/// Apply state file overrides: the flag wins over the environment, which
/// wins over the config file
pub fn resolve_config(
    config: PipelineConfig,
    env_state_file: Option<PathBuf>,
    flag_state_file: Option<PathBuf>,
) -> PipelineConfig {
    match flag_state_file.or(env_state_file) {
        Some(path) => config.with_state_file(path),
        None => config,
    }
}

/// Walk up from `start` to the nearest directory containing `.pp`,
/// falling back to `start` itself
pub fn find_project_root(start: &Path) -> PathBuf {
    let mut current = start.to_path_buf();
    loop {
        if current.join(pp_core::config::CONFIG_DIR).is_dir() {
            return current;
        }
        if !current.pop() {
            return start.to_path_buf();
        }
    }
}

#[cfg(test)]
#[path = "context_tests.rs"]
mod tests;
