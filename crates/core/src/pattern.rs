// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pattern state records
//!
//! A pattern is one content item moving through the pipeline. Its
//! [`PatternState`] is the aggregate persisted per id; the checkpoint and
//! error lists inside it are audit trails and are only ever appended to.

use crate::step::{StepStatus, WorkflowStep};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Pattern-level status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WorkflowStatus {
    Draft,
    InProgress,
    /// Previous step done, next step not started yet
    Ready,
    Blocked,
    Completed,
    Failed,
}

impl WorkflowStatus {
    pub const ALL: [WorkflowStatus; 6] = [
        WorkflowStatus::Draft,
        WorkflowStatus::InProgress,
        WorkflowStatus::Ready,
        WorkflowStatus::Blocked,
        WorkflowStatus::Completed,
        WorkflowStatus::Failed,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStatus::Draft => "draft",
            WorkflowStatus::InProgress => "in-progress",
            WorkflowStatus::Ready => "ready",
            WorkflowStatus::Blocked => "blocked",
            WorkflowStatus::Completed => "completed",
            WorkflowStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for WorkflowStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WorkflowStatus {
    type Err = crate::step::ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkflowStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| crate::step::ParseNameError {
                kind: "workflow status",
                value: s.to_string(),
            })
    }
}

/// Audit entry recorded while a step runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepCheckpoint {
    pub operation: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl StepCheckpoint {
    pub fn new(operation: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self {
            operation: operation.into(),
            timestamp,
            data: None,
            error: None,
        }
    }

    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }
}

/// Progress of one step within a pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepState {
    pub status: StepStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    /// Milliseconds between `started_at` and `completed_at`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    /// Number of retries; the first start does not count
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub checkpoints: Vec<StepCheckpoint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

impl StepState {
    pub fn with_status(status: StepStatus) -> Self {
        Self {
            status,
            started_at: None,
            completed_at: None,
            duration: None,
            attempts: 0,
            checkpoints: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Error recorded against a pattern when one of its steps fails
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternError {
    pub step: WorkflowStep,
    pub code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Failure report supplied by the caller of `fail_step`
#[derive(Debug, Clone, PartialEq)]
pub struct StepFailure {
    pub code: String,
    pub message: String,
    pub details: Option<serde_json::Value>,
}

impl StepFailure {
    pub const DEFAULT_CODE: &'static str = "step_failed";

    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: Self::DEFAULT_CODE.to_string(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Stamp the failure against a step
    pub fn into_error(self, step: WorkflowStep, timestamp: DateTime<Utc>) -> PatternError {
        PatternError {
            step,
            code: self.code,
            message: self.message,
            timestamp,
            details: self.details,
        }
    }
}

impl From<&str> for StepFailure {
    fn from(message: &str) -> Self {
        Self::new(message)
    }
}

impl From<String> for StepFailure {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

/// Descriptive fields attached at initialization
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMetadata {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source_paths: Vec<PathBuf>,
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl PatternMetadata {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }

    pub fn with_source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source_paths.push(path.into());
        self
    }
}

/// Aggregate state of one pattern
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternState {
    pub id: String,
    pub status: WorkflowStatus,
    pub current_step: WorkflowStep,
    pub steps: BTreeMap<WorkflowStep, StepState>,
    pub metadata: PatternMetadata,
    #[serde(default)]
    pub errors: Vec<PatternError>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PatternState {
    /// Seed a new pattern: draft already completed, everything after pending
    pub fn new(id: impl Into<String>, metadata: PatternMetadata, now: DateTime<Utc>) -> Self {
        let steps = WorkflowStep::ALL
            .into_iter()
            .map(|step| {
                let status = if step == WorkflowStep::Draft {
                    StepStatus::Completed
                } else {
                    StepStatus::Pending
                };
                let mut state = StepState::with_status(status);
                if step == WorkflowStep::Draft {
                    state.completed_at = Some(now);
                }
                (step, state)
            })
            .collect();

        Self {
            id: id.into(),
            status: WorkflowStatus::Draft,
            current_step: WorkflowStep::Draft,
            steps,
            metadata,
            errors: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn step(&self, step: WorkflowStep) -> Option<&StepState> {
        self.steps.get(&step)
    }

    pub fn step_mut(&mut self, step: WorkflowStep) -> Option<&mut StepState> {
        self.steps.get_mut(&step)
    }

    /// Whether the pattern reached a terminal status
    pub fn is_terminal(&self) -> bool {
        matches!(
            self.status,
            WorkflowStatus::Completed | WorkflowStatus::Failed
        )
    }
}

#[cfg(test)]
#[path = "pattern_tests.rs"]
mod tests;
