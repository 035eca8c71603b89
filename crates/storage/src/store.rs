// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! State store trait

use crate::mutation::Mutation;
use pp_core::{
    PatternError, PatternMetadata, PatternState, PipelineError, PipelineStateFile,
    StepCheckpoint, WorkflowStatus, WorkflowStep,
};
use std::collections::BTreeMap;

/// Durable owner of the pipeline state document
///
/// Each call is atomic with respect to the record it touches. Writes to one
/// pattern id are serialized; implementations decide how finely they lock.
pub trait StateStore: Send + Sync {
    /// Create a fresh record; fails if `id` exists
    fn initialize_pattern(
        &self,
        id: &str,
        metadata: PatternMetadata,
    ) -> Result<PatternState, PipelineError>;

    fn get_pattern_state(&self, id: &str) -> Result<PatternState, PipelineError>;

    /// Apply one mutation as a single read-modify-write and return the new record
    fn apply(&self, id: &str, mutation: Mutation) -> Result<PatternState, PipelineError>;

    fn get_all_patterns(&self) -> Result<BTreeMap<String, PatternState>, PipelineError>;

    /// The whole document, including global bookkeeping
    fn snapshot(&self) -> Result<PipelineStateFile, PipelineError>;

    fn get_patterns_by_status(
        &self,
        status: WorkflowStatus,
    ) -> Result<Vec<PatternState>, PipelineError> {
        Ok(self
            .get_all_patterns()?
            .into_values()
            .filter(|p| p.status == status)
            .collect())
    }

    fn mark_step_running(
        &self,
        id: &str,
        step: WorkflowStep,
    ) -> Result<PatternState, PipelineError> {
        self.apply(id, Mutation::StepRunning { step })
    }

    /// Increment attempts and restart, re-checking retry eligibility under the lock
    fn mark_step_retried(
        &self,
        id: &str,
        step: WorkflowStep,
        max_attempts: u32,
    ) -> Result<PatternState, PipelineError> {
        self.apply(id, Mutation::StepRetried { step, max_attempts })
    }

    fn mark_step_completed(
        &self,
        id: &str,
        step: WorkflowStep,
    ) -> Result<PatternState, PipelineError> {
        self.apply(id, Mutation::StepCompleted { step })
    }

    fn mark_step_failed(
        &self,
        id: &str,
        step: WorkflowStep,
        error: PatternError,
    ) -> Result<PatternState, PipelineError> {
        self.apply(id, Mutation::StepFailed { step, error })
    }

    fn add_checkpoint(
        &self,
        id: &str,
        step: WorkflowStep,
        checkpoint: StepCheckpoint,
    ) -> Result<PatternState, PipelineError> {
        self.apply(id, Mutation::Checkpoint { step, checkpoint })
    }

    fn update_pattern_status(
        &self,
        id: &str,
        step: WorkflowStep,
        status: WorkflowStatus,
    ) -> Result<PatternState, PipelineError> {
        self.apply(id, Mutation::Status { step, status })
    }
}

impl<S: StateStore + ?Sized> StateStore for std::sync::Arc<S> {
    fn initialize_pattern(
        &self,
        id: &str,
        metadata: PatternMetadata,
    ) -> Result<PatternState, PipelineError> {
        (**self).initialize_pattern(id, metadata)
    }

    fn get_pattern_state(&self, id: &str) -> Result<PatternState, PipelineError> {
        (**self).get_pattern_state(id)
    }

    fn apply(&self, id: &str, mutation: Mutation) -> Result<PatternState, PipelineError> {
        (**self).apply(id, mutation)
    }

    fn get_all_patterns(&self) -> Result<BTreeMap<String, PatternState>, PipelineError> {
        (**self).get_all_patterns()
    }

    fn snapshot(&self) -> Result<PipelineStateFile, PipelineError> {
        (**self).snapshot()
    }

    fn get_patterns_by_status(
        &self,
        status: WorkflowStatus,
    ) -> Result<Vec<PatternState>, PipelineError> {
        (**self).get_patterns_by_status(status)
    }
}
