// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! User-facing error display with context and suggestions

use pp_core::{PersistenceError, PipelineError};
use std::fmt;

/// Error with context and recovery suggestions for display on stderr
#[derive(Debug)]
pub struct PpError {
    /// What went wrong
    pub message: String,
    /// Why it might have happened
    pub context: Vec<String>,
    /// How to fix it
    pub suggestions: Vec<String>,
    source: Option<PipelineError>,
}

impl PpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: Vec::new(),
            suggestions: Vec::new(),
            source: None,
        }
    }

    pub fn with_context(mut self, ctx: impl Into<String>) -> Self {
        self.context.push(ctx.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestions.push(suggestion.into());
        self
    }
}

impl fmt::Display for PpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "error: {}", self.message)?;

        if !self.context.is_empty() {
            writeln!(f)?;
            for ctx in &self.context {
                writeln!(f, "  -> {}", ctx)?;
            }
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            writeln!(f, "suggestions:")?;
            for (i, suggestion) in self.suggestions.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for PpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

impl From<PipelineError> for PpError {
    fn from(err: PipelineError) -> Self {
        let base = PpError::new(err.to_string());
        let hinted = match &err {
            PipelineError::NotFound { .. } => base
                .with_suggestion("List known patterns: pp list")
                .with_suggestion("Check --state-file points at the right document"),
            PipelineError::DuplicatePattern { id } => base
                .with_context("Pattern ids are unique within a state file")
                .with_suggestion(format!("Inspect the existing record: pp show {id}")),
            PipelineError::InvalidState { id, .. } => base
                .with_context("The stored record violates the step ordering rules")
                .with_context("It may have been edited by hand or by an older tool")
                .with_suggestion(format!("Inspect the record: pp show {id} --output json")),
            PipelineError::InvalidTransition { id, allowed, .. } => {
                let base = base.with_context("Steps advance one at a time, in order");
                match allowed {
                    Some(next) => {
                        base.with_suggestion(format!("Transition to the next step: pp transition {id} {next}"))
                    }
                    None => base.with_context("The pattern is at its final step"),
                }
            }
            PipelineError::NotFailed { .. } => {
                base.with_context("Only a failed step can be retried or escalated")
            }
            PipelineError::RetryExhausted { id, step, .. } => base
                .with_context("The step has used every retry the config allows")
                .with_suggestion(format!("Hand it to an operator: pp escalate {id} {step}"))
                .with_suggestion("Raise max_attempts in .pp/config.toml"),
            PipelineError::StepNotCurrent { id, current, .. } => base
                .with_context(format!("Step operations apply to the current step ({current})"))
                .with_suggestion(format!("Inspect the pattern: pp show {id}")),
            PipelineError::PatternFinished { id, .. } => base
                .with_context("Completed and failed patterns are kept as a final record")
                .with_suggestion(format!("Inspect the record: pp show {id}")),
            PipelineError::Persistence(PersistenceError::LockTimeout { .. }) => base
                .with_context("Another pp process is holding the state file lock")
                .with_suggestion("Retry once the other process finishes")
                .with_suggestion("Increase lock_timeout in .pp/config.toml"),
            PipelineError::Persistence(PersistenceError::UnsupportedVersion { .. }) => {
                base.with_context("The state file was written by an incompatible version")
            }
            PipelineError::Persistence(_) => {
                base.with_suggestion("Check the state file is readable and valid JSON")
            }
        };
        Self {
            source: Some(err),
            ..hinted
        }
    }
}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
