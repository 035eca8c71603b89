// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Traced store wrapper for consistent observability

use crate::mutation::Mutation;
use crate::store::StateStore;
use pp_core::{PatternMetadata, PatternState, PipelineError, PipelineStateFile, WorkflowStatus};
use std::collections::BTreeMap;

/// Wrapper that adds tracing to any StateStore
#[derive(Clone)]
pub struct TracedStore<S> {
    inner: S,
}

impl<S> TracedStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: StateStore> StateStore for TracedStore<S> {
    fn initialize_pattern(
        &self,
        id: &str,
        metadata: PatternMetadata,
    ) -> Result<PatternState, PipelineError> {
        let span = tracing::info_span!("store.initialize", id);
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.initialize_pattern(id, metadata);
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => tracing::info!(elapsed_ms = elapsed.as_millis() as u64, "pattern created"),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "initialize failed"
            ),
        }

        result
    }

    fn get_pattern_state(&self, id: &str) -> Result<PatternState, PipelineError> {
        let span = tracing::debug_span!("store.get", id);
        let _guard = span.enter();

        let result = self.inner.get_pattern_state(id);
        if let Err(e) = &result {
            tracing::debug!(error = %e, "lookup failed");
        }
        result
    }

    fn apply(&self, id: &str, mutation: Mutation) -> Result<PatternState, PipelineError> {
        let span = tracing::info_span!(
            "store.apply",
            id,
            op = mutation.name(),
            step = %mutation.step()
        );
        let _guard = span.enter();

        let start = std::time::Instant::now();
        let result = self.inner.apply(id, mutation);
        let elapsed = start.elapsed();

        match &result {
            Ok(state) => tracing::info!(
                elapsed_ms = elapsed.as_millis() as u64,
                status = %state.status,
                current_step = %state.current_step,
                "applied"
            ),
            Err(e) => tracing::error!(
                elapsed_ms = elapsed.as_millis() as u64,
                error = %e,
                "apply failed"
            ),
        }

        result
    }

    fn get_all_patterns(&self) -> Result<BTreeMap<String, PatternState>, PipelineError> {
        let result = self.inner.get_all_patterns();
        match &result {
            Ok(patterns) => tracing::debug!(count = patterns.len(), "listed patterns"),
            Err(e) => tracing::error!(error = %e, "list failed"),
        }
        result
    }

    fn snapshot(&self) -> Result<PipelineStateFile, PipelineError> {
        let result = self.inner.snapshot();
        if let Err(e) = &result {
            tracing::error!(error = %e, "snapshot failed");
        }
        result
    }

    fn get_patterns_by_status(
        &self,
        status: WorkflowStatus,
    ) -> Result<Vec<PatternState>, PipelineError> {
        let result = self.inner.get_patterns_by_status(status);
        if let Ok(patterns) = &result {
            tracing::debug!(%status, count = patterns.len(), "filtered patterns");
        }
        result
    }
}

#[cfg(test)]
#[path = "traced_tests.rs"]
mod tests;
