// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The persisted pipeline state document

use crate::pattern::PatternState;
use crate::step::WorkflowStep;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Layout version written to new documents
pub const STATE_FILE_VERSION: &str = "1.0.0";

/// Pipeline-wide bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalState {
    /// Step most recently moved to by any pattern
    pub current_step: Option<WorkflowStep>,
    /// `<pattern id>:<step>` for every status update, oldest first
    #[serde(default)]
    pub step_history: Vec<String>,
}

impl GlobalState {
    pub fn record(&mut self, pattern_id: &str, step: WorkflowStep) {
        self.current_step = Some(step);
        self.step_history.push(format!("{pattern_id}:{step}"));
    }
}

/// Root object of the state file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineStateFile {
    pub version: String,
    pub last_updated: DateTime<Utc>,
    #[serde(default)]
    pub patterns: BTreeMap<String, PatternState>,
    #[serde(default)]
    pub global: GlobalState,
}

impl PipelineStateFile {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            version: STATE_FILE_VERSION.to_string(),
            last_updated: now,
            patterns: BTreeMap::new(),
            global: GlobalState::default(),
        }
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
