// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Output formatting for CLI commands

use clap::ValueEnum;
use pp_core::PatternState;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print output in the specified format
pub fn print<T: Serialize + fmt::Display>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => println!("{}", value),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

/// Full detail view of one pattern
#[derive(Serialize)]
#[serde(transparent)]
pub struct PatternDetail<'a>(pub &'a PatternState);

impl fmt::Display for PatternDetail<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = self.0;
        writeln!(f, "Pattern: {}", p.id)?;
        writeln!(f, "  Title: {}", p.metadata.title)?;
        if let Some(summary) = &p.metadata.summary {
            writeln!(f, "  Summary: {}", summary)?;
        }
        writeln!(f, "  Status: {}", p.status)?;
        writeln!(f, "  Current step: {}", p.current_step)?;
        writeln!(f, "  Updated: {}", p.updated_at.to_rfc3339())?;

        writeln!(f)?;
        writeln!(f, "Steps:")?;
        for (step, state) in &p.steps {
            write!(
                f,
                "  {:<10} {:<10} attempts={} checkpoints={}",
                step.as_str(),
                state.status.as_str(),
                state.attempts,
                state.checkpoints.len()
            )?;
            if let Some(ms) = state.duration {
                write!(f, " duration={}ms", ms)?;
            }
            writeln!(f)?;
        }

        if !p.errors.is_empty() {
            writeln!(f)?;
            writeln!(f, "Errors:")?;
            for e in &p.errors {
                writeln!(f, "  [{}] {}: {}", e.step, e.code, e.message)?;
            }
        }
        Ok(())
    }
}

/// One line per pattern
#[derive(Serialize)]
#[serde(transparent)]
pub struct PatternTable<'a>(pub &'a [PatternState]);

impl fmt::Display for PatternTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "No patterns");
        }
        write!(f, "{:<24} {:<12} {:<10} TITLE", "ID", "STATUS", "STEP")?;
        for p in self.0 {
            write!(
                f,
                "\n{:<24} {:<12} {:<10} {}",
                p.id,
                p.status.as_str(),
                p.current_step.as_str(),
                p.metadata.title
            )?;
        }
        Ok(())
    }
}

/// Short confirmation after a mutating command
#[derive(Serialize)]
#[serde(transparent)]
pub struct Changed<'a> {
    #[serde(skip)]
    pub message: String,
    pub pattern: &'a PatternState,
}

impl fmt::Display for Changed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} at {})",
            self.message,
            self.pattern.status.as_str(),
            self.pattern.current_step.as_str()
        )
    }
}

#[cfg(test)]
#[path = "output_tests.rs"]
mod tests;
