// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Pattern pipeline state machine
//!
//! Callers report step lifecycle events here as they do the actual work.
//! Each operation loads the record, validates it, and hands a single guarded
//! mutation to the store, which re-checks the guard under its lock. Completed
//! and failed patterns are frozen. Nothing is retried automatically.

use pp_core::{
    can_retry_step, validate_pattern_is_live, validate_pattern_state, validate_transition, Clock,
    PatternMetadata, PatternState, PipelineConfig, PipelineError, StepCheckpoint, StepFailure,
    WorkflowStatus, WorkflowStep,
};
use pp_storage::{Guard, Mutation, StateStore};
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Orchestrates validators and a state store
pub struct StateMachine<S, C> {
    store: S,
    clock: C,
    max_attempts: u32,
}

impl<S: StateStore, C: Clock> StateMachine<S, C> {
    pub fn new(store: S, clock: C, config: &PipelineConfig) -> Self {
        Self {
            store,
            clock,
            max_attempts: config.max_attempts,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Load a record and check its invariants
    fn load(&self, id: &str) -> Result<PatternState, PipelineError> {
        let state = self.store.get_pattern_state(id)?;
        if let Err(e) = validate_pattern_state(&state) {
            warn!(id, error = %e, "stored state failed validation");
            return Err(e);
        }
        Ok(state)
    }

    /// Load a live record whose current step must be `step`
    fn load_current(&self, id: &str, step: WorkflowStep) -> Result<PatternState, PipelineError> {
        let state = self.load(id)?;
        Guard::Current(step).check(&state).inspect_err(|e| {
            warn!(id, %step, error = %e, "rejected step operation");
        })?;
        Ok(state)
    }

    pub fn initialize_pattern(
        &self,
        id: &str,
        metadata: PatternMetadata,
    ) -> Result<PatternState, PipelineError> {
        let state = self.store.initialize_pattern(id, metadata)?;
        info!(id, "pattern initialized");
        Ok(state)
    }

    /// Whether `transition_to_step(id, to)` would pass validation
    pub fn can_transition(&self, id: &str, to: WorkflowStep) -> bool {
        self.load(id)
            .and_then(|state| {
                validate_pattern_is_live(&state)?;
                validate_transition(id, state.current_step, to)
            })
            .is_ok()
    }

    /// Move the pattern to the next step, closing out the current one
    pub fn transition_to_step(
        &self,
        id: &str,
        to: WorkflowStep,
    ) -> Result<PatternState, PipelineError> {
        let state = self.load(id)?;
        let from = state.current_step;
        validate_pattern_is_live(&state)
            .and_then(|()| validate_transition(id, from, to))
            .inspect_err(|e| {
                warn!(id, error = %e, "rejected transition");
            })?;

        let advance = Mutation::StepAdvanced {
            step: from,
            next: to,
            status: WorkflowStatus::InProgress,
        };
        let state = self.store.apply(id, advance.guarded(Guard::Current(from)))?;
        info!(id, %from, %to, "transitioned");
        Ok(state)
    }

    pub fn start_step(&self, id: &str, step: WorkflowStep) -> Result<PatternState, PipelineError> {
        self.load_current(id, step)?;
        let state = self.apply_current(id, step, Mutation::StepRunning { step })?;
        info!(id, %step, "step started");
        Ok(state)
    }

    /// Complete a step; the pattern becomes `ready` at the next step or
    /// `completed` after the final one
    pub fn complete_step(
        &self,
        id: &str,
        step: WorkflowStep,
    ) -> Result<PatternState, PipelineError> {
        self.load_current(id, step)?;
        let (next, status) = match step.next() {
            Some(next) => (next, WorkflowStatus::Ready),
            None => (step, WorkflowStatus::Completed),
        };

        let state = self.apply_current(id, step, Mutation::StepAdvanced { step, next, status })?;
        info!(id, %step, status = %state.status, "step completed");
        Ok(state)
    }

    /// Record a failure; pattern status is left for the caller to resolve
    pub fn fail_step(
        &self,
        id: &str,
        step: WorkflowStep,
        failure: impl Into<StepFailure>,
    ) -> Result<PatternState, PipelineError> {
        self.load_current(id, step)?;
        let error = failure.into().into_error(step, self.clock.now());
        warn!(id, %step, code = %error.code, message = %error.message, "step failed");
        self.apply_current(id, step, Mutation::StepFailed { step, error })
    }

    /// Restart a failed step, bounded by the configured attempt cap
    pub fn retry_step(&self, id: &str, step: WorkflowStep) -> Result<PatternState, PipelineError> {
        let state = self.load_current(id, step)?;
        if let Some(step_state) = state.step(step) {
            can_retry_step(id, step, step_state, self.max_attempts).inspect_err(|e| {
                warn!(id, %step, error = %e, "retry refused");
            })?;
        }

        let retried = Mutation::StepRetried {
            step,
            max_attempts: self.max_attempts,
        };
        let state = self.apply_current(id, step, retried)?;
        let attempts = state.step(step).map_or(0, |s| s.attempts);
        info!(id, %step, attempts, max_attempts = self.max_attempts, "step retried");
        Ok(state)
    }

    pub fn add_checkpoint(
        &self,
        id: &str,
        step: WorkflowStep,
        operation: &str,
        data: Option<serde_json::Value>,
    ) -> Result<PatternState, PipelineError> {
        let mut checkpoint = StepCheckpoint::new(operation, self.clock.now());
        checkpoint.data = data;
        self.record_checkpoint(id, step, checkpoint)
    }

    /// Checkpoint that records an error encountered mid-step
    pub fn add_checkpoint_error(
        &self,
        id: &str,
        step: WorkflowStep,
        operation: &str,
        error: &str,
    ) -> Result<PatternState, PipelineError> {
        let checkpoint = StepCheckpoint::new(operation, self.clock.now()).with_error(error);
        self.record_checkpoint(id, step, checkpoint)
    }

    fn record_checkpoint(
        &self,
        id: &str,
        step: WorkflowStep,
        checkpoint: StepCheckpoint,
    ) -> Result<PatternState, PipelineError> {
        let state = self.load(id)?;
        Guard::Live.check(&state).inspect_err(|e| {
            warn!(id, %step, error = %e, "rejected checkpoint");
        })?;

        let operation = checkpoint.operation.clone();
        let mutation = Mutation::Checkpoint { step, checkpoint }.guarded(Guard::Live);
        let state = self.store.apply(id, mutation)?;
        tracing::debug!(id, %step, operation, "checkpoint recorded");
        Ok(state)
    }

    /// Hand a failed step to an operator
    ///
    /// The pattern becomes `failed` once retries are exhausted, `blocked`
    /// while retries remain.
    pub fn escalate(&self, id: &str, step: WorkflowStep) -> Result<PatternState, PipelineError> {
        self.load_current(id, step)?;
        let escalated = Mutation::Escalated {
            step,
            max_attempts: self.max_attempts,
        };
        let state = self.apply_current(id, step, escalated)?;
        warn!(id, %step, status = %state.status, "pattern escalated");
        Ok(state)
    }

    /// Apply a mutation that is only valid while `step` is current
    ///
    /// The store re-checks the guard under its lock, so a record that moved
    /// on since `load_current` is rejected rather than overwritten.
    fn apply_current(
        &self,
        id: &str,
        step: WorkflowStep,
        mutation: Mutation,
    ) -> Result<PatternState, PipelineError> {
        self.store
            .apply(id, mutation.guarded(Guard::Current(step)))
            .inspect_err(|e| warn!(id, %step, error = %e, "store rejected step operation"))
    }

    pub fn get_pattern_state(&self, id: &str) -> Result<PatternState, PipelineError> {
        self.store.get_pattern_state(id)
    }

    pub fn get_all_patterns(&self) -> Result<BTreeMap<String, PatternState>, PipelineError> {
        self.store.get_all_patterns()
    }

    pub fn get_patterns_by_status(
        &self,
        status: WorkflowStatus,
    ) -> Result<Vec<PatternState>, PipelineError> {
        self.store.get_patterns_by_status(status)
    }
}

#[cfg(test)]
#[path = "machine_tests.rs"]
mod tests;
