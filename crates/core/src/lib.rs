// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pp-core: data model and validators for the pattern pipeline
//!
//! This crate provides:
//! - The fixed workflow step sequence and status vocabulary
//! - Pattern state records and the persisted document layout
//! - Pure validators for transitions, retries and state consistency
//! - Configuration and a clock abstraction

pub mod clock;
pub mod config;
pub mod document;
pub mod error;
pub mod pattern;
pub mod step;
pub mod validate;

pub use clock::{Clock, FakeClock, SystemClock};
pub use config::{ConfigError, PipelineConfig};
pub use document::{GlobalState, PipelineStateFile, STATE_FILE_VERSION};
pub use error::{PersistenceError, PipelineError};
pub use pattern::{
    PatternError, PatternMetadata, PatternState, StepCheckpoint, StepFailure, StepState,
    WorkflowStatus,
};
pub use step::{ParseNameError, StepStatus, WorkflowStep};
pub use validate::{
    can_retry_step, is_final_step, next_step, validate_pattern_is_live, validate_pattern_state,
    validate_step_is_current, validate_transition, DEFAULT_MAX_ATTEMPTS,
};
