// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pure validators for pattern state and step transitions

use crate::error::PipelineError;
use crate::pattern::{PatternState, StepState, WorkflowStatus};
use crate::step::{StepStatus, WorkflowStep};

/// Default cap on retries per step
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// The successor of `step`, or `None` for the final step
pub fn next_step(step: WorkflowStep) -> Option<WorkflowStep> {
    step.next()
}

pub fn is_final_step(step: WorkflowStep) -> bool {
    step.is_final()
}

/// Check the structural invariants of a stored pattern record
pub fn validate_pattern_state(state: &PatternState) -> Result<(), PipelineError> {
    let id = state.id.as_str();

    for step in WorkflowStep::ALL {
        if !state.steps.contains_key(&step) {
            return Err(PipelineError::invalid_state(
                id,
                format!("missing step entry: {step}"),
            ));
        }
    }

    if state.status == WorkflowStatus::Draft && state.current_step != WorkflowStep::Draft {
        return Err(PipelineError::invalid_state(
            id,
            format!(
                "draft status with current step {}",
                state.current_step
            ),
        ));
    }

    for (step, step_state) in &state.steps {
        if *step < state.current_step && !step_state.status.is_settled() {
            return Err(PipelineError::invalid_state(
                id,
                format!(
                    "step {step} is {} but precedes current step {}",
                    step_state.status, state.current_step
                ),
            ));
        }
        if *step > state.current_step
            && !matches!(step_state.status, StepStatus::Pending | StepStatus::Skipped)
        {
            return Err(PipelineError::invalid_state(
                id,
                format!(
                    "step {step} is {} but follows current step {}",
                    step_state.status, state.current_step
                ),
            ));
        }
        if step_state.attempts as usize > step_state.errors.len() {
            return Err(PipelineError::invalid_state(
                id,
                format!(
                    "step {step} has {} attempts but only {} failures",
                    step_state.attempts,
                    step_state.errors.len()
                ),
            ));
        }
    }

    if state.status == WorkflowStatus::Completed {
        let finalized = state
            .steps
            .get(&WorkflowStep::Finalized)
            .map(|s| s.status);
        if finalized != Some(StepStatus::Completed) {
            return Err(PipelineError::invalid_state(
                id,
                "completed status but finalized step is not completed",
            ));
        }
    }

    Ok(())
}

/// Allow only a move to the direct successor of `from`
pub fn validate_transition(
    pattern_id: &str,
    from: WorkflowStep,
    to: WorkflowStep,
) -> Result<(), PipelineError> {
    let allowed = next_step(from);
    if allowed == Some(to) {
        Ok(())
    } else {
        Err(PipelineError::InvalidTransition {
            id: pattern_id.to_string(),
            from,
            to,
            allowed,
        })
    }
}

/// Step lifecycle operations only act on the pattern's current step
pub fn validate_step_is_current(
    state: &PatternState,
    step: WorkflowStep,
) -> Result<(), PipelineError> {
    if state.current_step == step {
        Ok(())
    } else {
        Err(PipelineError::StepNotCurrent {
            id: state.id.clone(),
            step,
            current: state.current_step,
        })
    }
}

/// Completed and failed patterns are frozen
pub fn validate_pattern_is_live(state: &PatternState) -> Result<(), PipelineError> {
    if state.is_terminal() {
        Err(PipelineError::PatternFinished {
            id: state.id.clone(),
            status: state.status,
        })
    } else {
        Ok(())
    }
}

/// A step may be retried while it is failed and under the attempt cap
pub fn can_retry_step(
    pattern_id: &str,
    step: WorkflowStep,
    step_state: &StepState,
    max_attempts: u32,
) -> Result<(), PipelineError> {
    if step_state.status != StepStatus::Failed {
        return Err(PipelineError::NotFailed {
            id: pattern_id.to_string(),
            step,
            status: step_state.status,
        });
    }
    if step_state.attempts >= max_attempts {
        return Err(PipelineError::RetryExhausted {
            id: pattern_id.to_string(),
            step,
            attempts: step_state.attempts,
            max_attempts,
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "validate_tests.rs"]
mod tests;
