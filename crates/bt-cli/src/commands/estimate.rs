//! Estimate command for assigning times to a catch-up event list.
//!
//! Reads a JSON array of events, runs the estimator (or the reorder adapter
//! when positions are pinned), and prints a table or the JSON result.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use bt_core::{
    EventDescriptor, TimeEstimationResult, TimeWindow, estimate_event_times, recalculate_times,
};
use chrono::{DateTime, Utc};
use clap::Args;

use super::util::{WindowArgs, format_duration, format_time, load_events};
use crate::Config;

#[derive(Debug, Args)]
pub struct EstimateArgs {
    /// JSON file containing the event list.
    #[arg(long)]
    pub events: PathBuf,

    #[command(flatten)]
    pub window: WindowArgs,

    /// Hold the event at this 0-based position in place. Repeatable.
    #[arg(long = "pin")]
    pub pins: Vec<usize>,

    /// Output as JSON.
    #[arg(long)]
    pub json: bool,
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &EstimateArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    let window = args.window.resolve(config.default_preset, now)?;
    let events = load_events(&args.events)?;

    let result = if args.pins.is_empty() {
        estimate_event_times(&events, &window, &config.estimation)
    } else {
        recalculate_times(&events, &window, &args.pins, &config.estimation)
    };

    if args.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&result)?)?;
    } else {
        write_table(writer, &window, &result)?;
    }
    Ok(())
}

fn status(event: &EventDescriptor) -> &'static str {
    if event.is_existing {
        "logged"
    } else if event.is_pinned {
        "pinned"
    } else {
        "estimated"
    }
}

fn write_table<W: Write>(
    writer: &mut W,
    window: &TimeWindow,
    result: &TimeEstimationResult,
) -> Result<()> {
    writeln!(
        writer,
        "Window: {} to {} UTC ({})",
        format_time(window.start_time),
        format_time(window.end_time),
        format_duration(window.span_ms())
    )?;
    writeln!(
        writer,
        "Typical time: {}, slack: {}",
        format_duration(result.total_duration_ms),
        format_duration(result.gap_time_ms)
    )?;
    if result.is_overflowed {
        writeln!(
            writer,
            "Overflow: typical durations exceed the window, events were compressed"
        )?;
    }

    if result.events.is_empty() {
        writeln!(writer, "No events.")?;
        return Ok(());
    }

    writeln!(writer)?;
    for (index, event) in result.events.iter().enumerate() {
        let time = event
            .estimated_time
            .map_or_else(|| "-".to_string(), format_time);
        writeln!(
            writer,
            "{index:>2}  {time:<16}  {:<7}  {}",
            event.kind.as_str(),
            status(event)
        )?;
    }
    Ok(())
}
