// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Mutations applied to a stored pattern record
//!
//! Every store funnels its writes through [`Mutation::apply`] so the backing
//! stores only differ in how they lock and persist the record.

use chrono::{DateTime, Utc};
use pp_core::{
    can_retry_step, validate_pattern_is_live, validate_pattern_state, validate_step_is_current,
    PatternError, PatternState, PipelineError, StepCheckpoint, StepState, StepStatus,
    WorkflowStatus, WorkflowStep,
};

/// Precondition checked against the record inside the store's write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Guard {
    /// The pattern is neither completed nor failed
    Live,
    /// The pattern is live and this is its current step
    Current(WorkflowStep),
}

impl Guard {
    pub fn check(self, state: &PatternState) -> Result<(), PipelineError> {
        validate_pattern_is_live(state)?;
        match self {
            Guard::Live => Ok(()),
            Guard::Current(step) => validate_step_is_current(state, step),
        }
    }
}

/// A single read-modify-write against one pattern
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    StepRunning {
        step: WorkflowStep,
    },
    /// Bump attempts and restart a failed step
    StepRetried {
        step: WorkflowStep,
        max_attempts: u32,
    },
    StepCompleted {
        step: WorkflowStep,
    },
    StepFailed {
        step: WorkflowStep,
        error: PatternError,
    },
    Checkpoint {
        step: WorkflowStep,
        checkpoint: StepCheckpoint,
    },
    Status {
        step: WorkflowStep,
        status: WorkflowStatus,
    },
    /// Complete `step` unless it already is, then move the pattern to `next`
    StepAdvanced {
        step: WorkflowStep,
        next: WorkflowStep,
        status: WorkflowStatus,
    },
    /// Block the pattern while retries remain on a failed step, fail it after
    Escalated {
        step: WorkflowStep,
        max_attempts: u32,
    },
    /// Apply `mutation` only if `guard` holds; the result must validate
    Guarded {
        guard: Guard,
        mutation: Box<Mutation>,
    },
}

impl Mutation {
    pub fn guarded(self, guard: Guard) -> Self {
        Mutation::Guarded {
            guard,
            mutation: Box::new(self),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Mutation::StepRunning { .. } => "step_running",
            Mutation::StepRetried { .. } => "step_retried",
            Mutation::StepCompleted { .. } => "step_completed",
            Mutation::StepFailed { .. } => "step_failed",
            Mutation::Checkpoint { .. } => "checkpoint",
            Mutation::Status { .. } => "status",
            Mutation::StepAdvanced { .. } => "step_advanced",
            Mutation::Escalated { .. } => "escalated",
            Mutation::Guarded { mutation, .. } => mutation.name(),
        }
    }

    pub fn step(&self) -> WorkflowStep {
        match self {
            Mutation::StepRunning { step }
            | Mutation::StepRetried { step, .. }
            | Mutation::StepCompleted { step }
            | Mutation::StepFailed { step, .. }
            | Mutation::Checkpoint { step, .. }
            | Mutation::Status { step, .. }
            | Mutation::StepAdvanced { step, .. }
            | Mutation::Escalated { step, .. } => *step,
            Mutation::Guarded { mutation, .. } => mutation.step(),
        }
    }

    /// Step to record in the global history, for pattern-level moves
    pub fn history_step(&self) -> Option<WorkflowStep> {
        match self {
            Mutation::Status { step, .. } | Mutation::Escalated { step, .. } => Some(*step),
            Mutation::StepAdvanced { next, .. } => Some(*next),
            Mutation::Guarded { mutation, .. } => mutation.history_step(),
            _ => None,
        }
    }

    /// Apply to `state`, bumping `updated_at`
    ///
    /// On error `state` may be partially modified; callers apply to a copy.
    pub fn apply(&self, state: &mut PatternState, now: DateTime<Utc>) -> Result<(), PipelineError> {
        match self {
            Mutation::StepRunning { step } => {
                mark_running(step_entry(state, *step)?, now);
            }

            Mutation::StepRetried { step, max_attempts } => {
                let id = state.id.clone();
                let entry = step_entry(state, *step)?;
                can_retry_step(&id, *step, entry, *max_attempts)?;
                entry.attempts += 1;
                mark_running(entry, now);
            }

            Mutation::StepCompleted { step } => {
                mark_completed(step_entry(state, *step)?, now);
            }

            Mutation::StepFailed { step, error } => {
                let entry = step_entry(state, *step)?;
                entry.status = StepStatus::Failed;
                entry.errors.push(error.message.clone());
                state.errors.push(error.clone());
            }

            Mutation::Checkpoint { step, checkpoint } => {
                step_entry(state, *step)?
                    .checkpoints
                    .push(checkpoint.clone());
            }

            Mutation::Status { step, status } => {
                state.current_step = *step;
                state.status = *status;
            }

            Mutation::StepAdvanced { step, next, status } => {
                let entry = step_entry(state, *step)?;
                if entry.status != StepStatus::Completed {
                    mark_completed(entry, now);
                }
                state.current_step = *next;
                state.status = *status;
            }

            Mutation::Escalated { step, max_attempts } => {
                let id = state.id.clone();
                let entry = step_entry(state, *step)?;
                let status = match can_retry_step(&id, *step, entry, *max_attempts) {
                    Ok(()) => WorkflowStatus::Blocked,
                    Err(PipelineError::RetryExhausted { .. }) => WorkflowStatus::Failed,
                    Err(e) => return Err(e),
                };
                state.status = status;
            }

            Mutation::Guarded { guard, mutation } => {
                guard.check(state)?;
                mutation.apply(state, now)?;
                validate_pattern_state(state)?;
            }
        }

        state.updated_at = now;
        Ok(())
    }
}

fn step_entry(
    state: &mut PatternState,
    step: WorkflowStep,
) -> Result<&mut StepState, PipelineError> {
    let id = state.id.clone();
    state
        .step_mut(step)
        .ok_or_else(|| PipelineError::invalid_state(&id, format!("missing step entry: {step}")))
}

fn mark_completed(entry: &mut StepState, now: DateTime<Utc>) {
    entry.status = StepStatus::Completed;
    entry.completed_at = Some(now);
    entry.duration = entry
        .started_at
        .map(|started| u64::try_from((now - started).num_milliseconds()).unwrap_or(0));
}

fn mark_running(entry: &mut StepState, now: DateTime<Utc>) {
    entry.status = StepStatus::Running;
    entry.started_at.get_or_insert(now);
}

#[cfg(test)]
#[path = "mutation_tests.rs"]
mod tests;
