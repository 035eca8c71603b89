// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Workflow step definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One stage of the fixed pipeline sequence
///
/// Declaration order is the pipeline order; `Ord` follows it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStep {
    Draft,
    Ingested,
    Tested,
    Validated,
    Published,
    Finalized,
}

impl WorkflowStep {
    /// All steps in pipeline order
    pub const ALL: [WorkflowStep; 6] = [
        WorkflowStep::Draft,
        WorkflowStep::Ingested,
        WorkflowStep::Tested,
        WorkflowStep::Validated,
        WorkflowStep::Published,
        WorkflowStep::Finalized,
    ];

    /// The step that follows this one, if any
    pub fn next(self) -> Option<WorkflowStep> {
        match self {
            WorkflowStep::Draft => Some(WorkflowStep::Ingested),
            WorkflowStep::Ingested => Some(WorkflowStep::Tested),
            WorkflowStep::Tested => Some(WorkflowStep::Validated),
            WorkflowStep::Validated => Some(WorkflowStep::Published),
            WorkflowStep::Published => Some(WorkflowStep::Finalized),
            WorkflowStep::Finalized => None,
        }
    }

    pub fn is_final(self) -> bool {
        self == WorkflowStep::Finalized
    }

    pub fn as_str(self) -> &'static str {
        match self {
            WorkflowStep::Draft => "draft",
            WorkflowStep::Ingested => "ingested",
            WorkflowStep::Tested => "tested",
            WorkflowStep::Validated => "validated",
            WorkflowStep::Published => "published",
            WorkflowStep::Finalized => "finalized",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown step or status name
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value}")]
pub struct ParseNameError {
    pub kind: &'static str,
    pub value: String,
}

impl FromStr for WorkflowStep {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WorkflowStep::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| ParseNameError {
                kind: "workflow step",
                value: s.to_string(),
            })
    }
}

/// Status of a single step within a pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StepStatus {
    /// Not reached yet
    Pending,
    /// Caller reported the work has started
    Running,
    Completed,
    Failed,
    Skipped,
}

impl StepStatus {
    /// Whether this status counts as "done" for the steps behind the current one
    pub fn is_settled(self) -> bool {
        matches!(self, StepStatus::Completed | StepStatus::Skipped)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StepStatus::Pending => "pending",
            StepStatus::Running => "running",
            StepStatus::Completed => "completed",
            StepStatus::Failed => "failed",
            StepStatus::Skipped => "skipped",
        }
    }
}

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
#[path = "step_tests.rs"]
mod tests;
