// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Step lifecycle commands

use crate::context::Context;
use crate::error::PpError;
use crate::output::{self, Changed, OutputFormat};
use anyhow::Context as _;
use clap::Args;
use pp_core::{PatternState, PipelineError, StepFailure, WorkflowStep};
use serde::Serialize;
use std::fmt;
use std::process::ExitCode;

#[derive(Args)]
pub struct StepArgs {
    /// Pattern id
    pub id: String,
    /// Workflow step (draft, ingested, tested, validated, published, finalized)
    pub step: WorkflowStep,
}

#[derive(Args)]
pub struct FailArgs {
    /// Pattern id
    pub id: String,
    /// Workflow step
    pub step: WorkflowStep,
    /// What went wrong
    pub message: String,

    /// Machine-readable error code
    #[arg(long, default_value = StepFailure::DEFAULT_CODE)]
    pub code: String,

    /// Extra error details as JSON
    #[arg(long)]
    pub details: Option<String>,
}

#[derive(Args)]
pub struct CheckpointArgs {
    /// Pattern id
    pub id: String,
    /// Workflow step
    pub step: WorkflowStep,
    /// Operation that was performed
    pub operation: String,

    /// Checkpoint payload as JSON
    #[arg(short, long)]
    pub data: Option<String>,

    /// Record the checkpoint as an error with this message
    #[arg(long, conflicts_with = "data")]
    pub error: Option<String>,
}

fn parse_json(raw: Option<&str>, flag: &str) -> anyhow::Result<Option<serde_json::Value>> {
    raw.map(|s| serde_json::from_str(s).with_context(|| format!("--{flag} is not valid JSON")))
        .transpose()
}

fn report(
    result: Result<PatternState, PipelineError>,
    message: impl FnOnce(&PatternState) -> String,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let state = result.map_err(PpError::from)?;
    output::print(
        &Changed {
            message: message(&state),
            pattern: &state,
        },
        format,
    )
}

pub fn transition(ctx: &Context, args: StepArgs, format: OutputFormat) -> anyhow::Result<()> {
    report(
        ctx.machine.transition_to_step(&args.id, args.step),
        |s| format!("Pattern {} moved to {}", s.id, s.current_step),
        format,
    )
}

#[derive(Serialize)]
struct TransitionCheck {
    id: String,
    step: WorkflowStep,
    allowed: bool,
}

impl fmt::Display for TransitionCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.allowed { "allowed" } else { "not allowed" };
        write!(f, "Transition of {} to {}: {}", self.id, self.step, verdict)
    }
}

/// Exits non-zero when the transition would be rejected
pub fn can_transition(
    ctx: &Context,
    args: StepArgs,
    format: OutputFormat,
) -> anyhow::Result<ExitCode> {
    let allowed = ctx.machine.can_transition(&args.id, args.step);
    output::print(
        &TransitionCheck {
            id: args.id,
            step: args.step,
            allowed,
        },
        format,
    )?;
    Ok(if allowed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

pub fn start(ctx: &Context, args: StepArgs, format: OutputFormat) -> anyhow::Result<()> {
    report(
        ctx.machine.start_step(&args.id, args.step),
        |s| format!("Started {} of {}", args.step, s.id),
        format,
    )
}

pub fn complete(ctx: &Context, args: StepArgs, format: OutputFormat) -> anyhow::Result<()> {
    report(
        ctx.machine.complete_step(&args.id, args.step),
        |s| format!("Completed {} of {}", args.step, s.id),
        format,
    )
}

pub fn fail(ctx: &Context, args: FailArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut failure = StepFailure::new(args.message).with_code(args.code);
    if let Some(details) = parse_json(args.details.as_deref(), "details")? {
        failure = failure.with_details(details);
    }
    report(
        ctx.machine.fail_step(&args.id, args.step, failure),
        |s| format!("Recorded failure of {} for {}", args.step, s.id),
        format,
    )
}

pub fn retry(ctx: &Context, args: StepArgs, format: OutputFormat) -> anyhow::Result<()> {
    let max = ctx.machine.max_attempts();
    report(
        ctx.machine.retry_step(&args.id, args.step),
        |s| {
            let attempts = s.step(args.step).map_or(0, |st| st.attempts);
            format!("Retrying {} of {} (attempt {attempts}/{max})", args.step, s.id)
        },
        format,
    )
}

pub fn escalate(ctx: &Context, args: StepArgs, format: OutputFormat) -> anyhow::Result<()> {
    report(
        ctx.machine.escalate(&args.id, args.step),
        |s| format!("Escalated {} of {}", args.step, s.id),
        format,
    )
}

pub fn checkpoint(ctx: &Context, args: CheckpointArgs, format: OutputFormat) -> anyhow::Result<()> {
    let result = match args.error {
        Some(error) => {
            ctx.machine
                .add_checkpoint_error(&args.id, args.step, &args.operation, &error)
        }
        None => {
            let data = parse_json(args.data.as_deref(), "data")?;
            ctx.machine
                .add_checkpoint(&args.id, args.step, &args.operation, data)
        }
    };
    report(
        result,
        |s| format!("Checkpoint '{}' recorded on {} of {}", args.operation, args.step, s.id),
        format,
    )
}
