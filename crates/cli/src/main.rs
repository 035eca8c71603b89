// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! pp - Pattern pipeline CLI

mod commands;
mod context;
mod error;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand};
use commands::{pattern, step};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::context::Context;
use crate::error::PpError;
use crate::output::OutputFormat;

#[derive(Parser)]
#[command(
    name = "pp",
    version,
    about = "Pattern pipeline - track patterns through the processing workflow"
)]
struct Cli {
    /// Project root directory (defaults to the nearest directory containing .pp)
    #[arg(long, global = true)]
    project: Option<PathBuf>,

    /// State file path, overriding config and PP_STATE_FILE
    #[arg(long, global = true)]
    state_file: Option<PathBuf>,

    /// Output format
    #[arg(short = 'o', long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    output: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register a new pattern at the draft step
    Init(pattern::InitArgs),
    /// Show one pattern
    Show(pattern::ShowArgs),
    /// List patterns, optionally filtered by status
    List(pattern::ListArgs),
    /// Move a pattern to the next step
    Transition(step::StepArgs),
    /// Check whether a transition would be accepted
    CanTransition(step::StepArgs),
    /// Mark the current step running
    Start(step::StepArgs),
    /// Mark the current step completed
    Complete(step::StepArgs),
    /// Record a failure of the current step
    Fail(step::FailArgs),
    /// Retry the failed current step
    Retry(step::StepArgs),
    /// Block or fail a pattern whose current step failed
    Escalate(step::StepArgs),
    /// Append a checkpoint to a step
    Checkpoint(step::CheckpointArgs),
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            match e.downcast_ref::<PpError>() {
                Some(pp) => eprint!("{}", pp),
                None => eprintln!("error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("PP_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<ExitCode> {
    let ctx = Context::load(cli.project, cli.state_file)?;
    let format = cli.output;

    match cli.command {
        Commands::Init(args) => pattern::init(&ctx, args, format)?,
        Commands::Show(args) => pattern::show(&ctx, args, format)?,
        Commands::List(args) => pattern::list(&ctx, args, format)?,
        Commands::Transition(args) => step::transition(&ctx, args, format)?,
        Commands::CanTransition(args) => return step::can_transition(&ctx, args, format),
        Commands::Start(args) => step::start(&ctx, args, format)?,
        Commands::Complete(args) => step::complete(&ctx, args, format)?,
        Commands::Fail(args) => step::fail(&ctx, args, format)?,
        Commands::Retry(args) => step::retry(&ctx, args, format)?,
        Commands::Escalate(args) => step::escalate(&ctx, args, format)?,
        Commands::Checkpoint(args) => step::checkpoint(&ctx, args, format)?,
    }

    Ok(ExitCode::SUCCESS)
}
