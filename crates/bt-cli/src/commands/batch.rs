//! Batch command for building a catch-up submission.
//!
//! Loads the event list into a session, validates the window, estimates times,
//! and prints the JSON payload for the batch-create endpoint.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use bt_core::{CatchUpSession, EventDescriptor};
use chrono::{DateTime, Utc};
use clap::Args;

use super::util::{WindowArgs, load_events};
use crate::Config;

#[derive(Debug, Args)]
pub struct BatchArgs {
    /// JSON file containing the event list.
    #[arg(long)]
    pub events: PathBuf,

    #[command(flatten)]
    pub window: WindowArgs,
}

pub fn run<W: Write>(
    writer: &mut W,
    args: &BatchArgs,
    config: &Config,
    now: DateTime<Utc>,
) -> Result<()> {
    let window = args.window.resolve(config.default_preset, now)?;
    let events = load_events(&args.events)?;

    let (existing, drafts): (Vec<EventDescriptor>, Vec<EventDescriptor>) =
        events.into_iter().partition(|event| event.is_existing);

    let mut session = CatchUpSession::new(window, config.estimation).with_existing(existing);
    for draft in drafts {
        session.add(draft);
    }

    if session.result().is_overflowed {
        tracing::warn!("typical durations exceed the window; times were compressed");
    }

    let submission = session
        .submission_at(now)
        .context("cannot build batch submission")?;
    writeln!(writer, "{}", serde_json::to_string_pretty(&submission)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 15, 13, 0, 0).unwrap()
    }

    fn args(dir: &std::path::Path, json: &str, start: &str) -> BatchArgs {
        let path = dir.join("events.json");
        std::fs::write(&path, json).unwrap();
        BatchArgs {
            events: path,
            window: WindowArgs {
                start: Some(start.to_string()),
                end: Some("2025-01-15T13:00:00Z".to_string()),
                ..Default::default()
            },
        }
    }

    #[test]
    fn submission_skips_existing_events() {
        let temp = tempfile::tempdir().unwrap();
        let args = args(
            temp.path(),
            r#"[
                {"id": "a", "kind": "diaper", "payload": {"type": "dirty"}},
                {"id": "old", "kind": "feeding", "is_existing": true,
                 "existing_reference_id": "feed-1", "estimated_time": "2025-01-15T10:00:00Z"},
                {"id": "b", "kind": "diaper"}
            ]"#,
            "2025-01-15T12:30:00Z",
        );

        let mut output = Vec::new();
        run(&mut output, &args, &Config::default(), now()).unwrap();

        let submission: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(
            submission["entries"],
            serde_json::json!([
                {"id": "a", "kind": "diaper", "time": "2025-01-15T12:30:00Z", "payload": {"type": "dirty"}},
                {"id": "b", "kind": "diaper", "time": "2025-01-15T12:45:00Z"}
            ])
        );
    }

    #[test]
    fn invalid_window_is_rejected() {
        let temp = tempfile::tempdir().unwrap();
        let args = args(
            temp.path(),
            r#"[{"id": "a", "kind": "nap"}]"#,
            "2025-01-14T09:00:00Z",
        );

        let mut output = Vec::new();
        let err = run(&mut output, &args, &Config::default(), now()).unwrap_err();

        assert_eq!(err.to_string(), "cannot build batch submission");
        assert!(format!("{err:#}").contains("Time window cannot exceed 24 hours"));
        assert!(output.is_empty());
    }
}
