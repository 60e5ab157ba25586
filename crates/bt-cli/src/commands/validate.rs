//! Validate command for checking a catch-up window.

use std::io::Write;

use anyhow::Result;
use bt_core::validate_time_window_at;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use super::util::{WindowArgs, format_duration, format_time};
use crate::Config;

#[derive(Debug, Args)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub window: WindowArgs,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct ValidationReport {
    valid: bool,
    violations: Vec<String>,
}

/// Prints the window's violations. Returns whether the window is valid.
pub fn run<W: Write>(
    writer: &mut W,
    args: &ValidateArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<bool> {
    let window = args.window.resolve(config.default_preset, now)?;
    let violations = validate_time_window_at(&window, now);
    let valid = violations.is_empty();

    if args.json {
        let report = ValidationReport { valid, violations };
        writeln!(writer, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(valid);
    }

    writeln!(
        writer,
        "Window: {} to {} UTC",
        format_time(window.start_time),
        format_time(window.end_time)
    )?;
    if valid {
        writeln!(writer, "Window is valid ({})", format_duration(window.span_ms()))?;
    } else {
        writeln!(writer, "Window is invalid:")?;
        for violation in &violations {
            writeln!(writer, "- {violation}")?;
        }
    }

    Ok(valid)
}
