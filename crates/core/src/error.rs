// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types shared by the validators, stores and state machine

use crate::pattern::WorkflowStatus;
use crate::step::{StepStatus, WorkflowStep};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors surfaced by pipeline state operations
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pattern not found: {id}")]
    NotFound { id: String },

    #[error("pattern already exists: {id}")]
    DuplicatePattern { id: String },

    #[error("invalid state for pattern {id}: {reason}")]
    InvalidState { id: String, reason: String },

    #[error("invalid transition for pattern {id}: {from} -> {to} (allowed: {})", allowed_name(.allowed))]
    InvalidTransition {
        id: String,
        from: WorkflowStep,
        to: WorkflowStep,
        allowed: Option<WorkflowStep>,
    },

    #[error("step {step} of pattern {id} is {status}, not failed")]
    NotFailed {
        id: String,
        step: WorkflowStep,
        status: StepStatus,
    },

    #[error("step {step} of pattern {id} exhausted its retries ({attempts}/{max_attempts})")]
    RetryExhausted {
        id: String,
        step: WorkflowStep,
        attempts: u32,
        max_attempts: u32,
    },

    #[error("step {step} of pattern {id} is not the current step ({current})")]
    StepNotCurrent {
        id: String,
        step: WorkflowStep,
        current: WorkflowStep,
    },

    #[error("pattern {id} is {status} and accepts no further step changes")]
    PatternFinished { id: String, status: WorkflowStatus },

    #[error("persistence error: {0}")]
    Persistence(#[from] PersistenceError),
}

fn allowed_name(allowed: &Option<WorkflowStep>) -> &'static str {
    allowed.map_or("none", WorkflowStep::as_str)
}

impl PipelineError {
    pub fn not_found(id: &str) -> Self {
        PipelineError::NotFound { id: id.to_string() }
    }

    pub fn invalid_state(id: &str, reason: impl Into<String>) -> Self {
        PipelineError::InvalidState {
            id: id.to_string(),
            reason: reason.into(),
        }
    }
}

/// Errors reading or writing the backing store
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported state file version {found} (expected {expected})")]
    UnsupportedVersion { found: String, expected: String },

    #[error("timed out after {waited:?} waiting for lock on {}", .path.display())]
    LockTimeout { path: PathBuf, waited: Duration },
}
