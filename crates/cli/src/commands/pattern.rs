// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `pp init`, `pp show` and `pp list`

use crate::context::Context;
use crate::error::PpError;
use crate::output::{self, Changed, OutputFormat, PatternDetail, PatternTable};
use clap::Args;
use pp_core::{PatternMetadata, WorkflowStatus};
use std::path::PathBuf;

#[derive(Args)]
pub struct InitArgs {
    /// Pattern id
    pub id: String,

    /// Human-readable title
    #[arg(long)]
    pub title: String,

    /// One-line summary
    #[arg(long)]
    pub summary: Option<String>,

    /// Source files the pattern was drafted from (repeatable)
    #[arg(long = "source")]
    pub sources: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ShowArgs {
    /// Pattern id
    pub id: String,
}

#[derive(Args)]
pub struct ListArgs {
    /// Only list patterns with this status
    #[arg(long)]
    pub status: Option<WorkflowStatus>,
}

pub fn init(ctx: &Context, args: InitArgs, format: OutputFormat) -> anyhow::Result<()> {
    let mut metadata = PatternMetadata::new(&args.id, args.title);
    metadata.summary = args.summary;
    metadata.source_paths = args.sources;

    let state = ctx
        .machine
        .initialize_pattern(&args.id, metadata)
        .map_err(PpError::from)?;
    output::print(
        &Changed {
            message: format!("Initialized pattern {}", state.id),
            pattern: &state,
        },
        format,
    )
}

pub fn show(ctx: &Context, args: ShowArgs, format: OutputFormat) -> anyhow::Result<()> {
    let state = ctx
        .machine
        .get_pattern_state(&args.id)
        .map_err(PpError::from)?;
    output::print(&PatternDetail(&state), format)
}

pub fn list(ctx: &Context, args: ListArgs, format: OutputFormat) -> anyhow::Result<()> {
    let patterns = match args.status {
        Some(status) => ctx.machine.get_patterns_by_status(status),
        None => ctx
            .machine
            .get_all_patterns()
            .map(|all| all.into_values().collect()),
    }
    .map_err(PpError::from)?;
    output::print(&PatternTable(&patterns), format)
}
