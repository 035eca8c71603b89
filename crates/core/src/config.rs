// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pipeline configuration
//!
//! Read from `.pp/config.toml` under the project root. Every field is
//! optional in the file; missing fields take the defaults below.

use crate::validate::DEFAULT_MAX_ATTEMPTS;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Directory holding config and state, relative to the project root
pub const CONFIG_DIR: &str = ".pp";
pub const CONFIG_FILE: &str = "config.toml";
pub const DEFAULT_STATE_FILE: &str = "pipeline-state.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("max_attempts must be at least 1")]
    ZeroAttempts,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Retries allowed per step before escalation
    pub max_attempts: u32,
    /// State document location; relative paths resolve against the project root
    pub state_file: PathBuf,
    /// How long a writer waits for the state file lock
    #[serde(with = "humantime_serde")]
    pub lock_timeout: Duration,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            state_file: Path::new(CONFIG_DIR).join(DEFAULT_STATE_FILE),
            lock_timeout: Duration::from_secs(10),
        }
    }
}

impl PipelineConfig {
    /// Parse a TOML document
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let config: PipelineConfig = toml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if config.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(config)
    }

    /// Load `.pp/config.toml` under `project_root`, or defaults if absent
    pub fn load(project_root: &Path) -> Result<Self, ConfigError> {
        let path = project_root.join(CONFIG_DIR).join(CONFIG_FILE);
        match std::fs::read_to_string(&path) {
            Ok(content) => Self::parse(&content, &path),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read { path, source }),
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    pub fn with_state_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.state_file = path.into();
        self
    }

    pub fn with_lock_timeout(mut self, timeout: Duration) -> Self {
        self.lock_timeout = timeout;
        self
    }

    /// Absolute state file path for a project
    pub fn state_path(&self, project_root: &Path) -> PathBuf {
        if self.state_file.is_absolute() {
            self.state_file.clone()
        } else {
            project_root.join(&self.state_file)
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
