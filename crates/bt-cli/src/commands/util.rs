//! Shared utilities for CLI commands.

use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context;
use bt_core::{EventDescriptor, TimeWindow, WindowPreset};
use chrono::{DateTime, Duration, Utc};
use clap::Args;
use regex::Regex;

/// Pre-compiled regex for relative time parsing.
static RELATIVE_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)\s+(minute|hour|day)s?\s+ago$").unwrap());

/// Nothing a catch-up window accepts reaches further back than a few days.
const MAX_RELATIVE_MINUTES: i64 = 7 * 24 * 60;

/// Parse a datetime string as ISO 8601, `now`, or relative time.
///
/// Supports:
/// - ISO 8601: "2026-01-15T10:30:00Z"
/// - Relative: "2 hours ago", "30 minutes ago", "1 day ago"
pub fn parse_datetime(s: &str, now: DateTime<Utc>) -> anyhow::Result<DateTime<Utc>> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("now") {
        return Ok(now);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    let Some(caps) = RELATIVE_TIME_RE.captures(s) else {
        anyhow::bail!(
            "Invalid datetime: {s}. Use ISO 8601 (e.g., 2026-01-15T10:30:00Z), 'now', or relative (e.g., '2 hours ago')"
        );
    };

    let n: i64 = caps[1]
        .parse()
        .context("failed to parse number in relative time")?;

    let minutes_per_unit = match &caps[2] {
        "minute" => 1,
        "hour" => 60,
        "day" => 60 * 24,
        unit => anyhow::bail!("Unknown time unit: {unit}"),
    };

    if n > MAX_RELATIVE_MINUTES / minutes_per_unit {
        anyhow::bail!("Relative time value too large: {n} {}", &caps[2]);
    }

    Ok(now - Duration::minutes(n * minutes_per_unit))
}

/// Window selection shared by commands.
#[derive(Debug, Clone, Default, Args)]
pub struct WindowArgs {
    /// Preset window ending now (1h, 2h, 4h, 8h, 12h, 24h).
    #[arg(long, conflicts_with_all = ["start", "end", "since"])]
    pub preset: Option<WindowPreset>,

    /// Window start (ISO 8601, 'now', or e.g. '3 hours ago').
    #[arg(long, requires = "end", conflicts_with = "since")]
    pub start: Option<String>,

    /// Window end (ISO 8601, 'now', or e.g. '10 minutes ago').
    #[arg(long, requires = "start", conflicts_with = "since")]
    pub end: Option<String>,

    /// Window from the last logged event until now.
    #[arg(long)]
    pub since: Option<String>,
}

impl WindowArgs {
    /// Resolves the selected window, falling back to `default_preset`.
    pub fn resolve(
        &self,
        default_preset: WindowPreset,
        now: DateTime<Utc>,
    ) -> anyhow::Result<TimeWindow> {
        if let Some(since) = &self.since {
            let last_logged = parse_datetime(since, now).context("invalid --since")?;
            return Ok(TimeWindow::since(last_logged, now));
        }

        match (&self.start, &self.end) {
            (Some(start), Some(end)) => Ok(TimeWindow::new(
                parse_datetime(start, now).context("invalid --start")?,
                parse_datetime(end, now).context("invalid --end")?,
            )),
            (None, None) => Ok(self
                .preset
                .unwrap_or(default_preset)
                .window_ending_at(now)),
            _ => anyhow::bail!("--start and --end must be given together"),
        }
    }
}

/// Reads a JSON array of event descriptors.
pub fn load_events(path: &Path) -> anyhow::Result<Vec<EventDescriptor>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let events: Vec<EventDescriptor> = serde_json::from_str(&content)
        .with_context(|| format!("failed to parse events from {}", path.display()))?;
    tracing::debug!(path = %path.display(), count = events.len(), "loaded events");
    Ok(events)
}

/// Formats milliseconds as duration string.
/// Returns "Xh Ym" if >= 1 hour, "Xm" if < 1 hour.
pub fn format_duration(ms: i64) -> String {
    let total_minutes = ms.max(0) / 60_000;
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours >= 1 {
        format!("{hours}h {minutes}m")
    } else {
        format!("{minutes}m")
    }
}

/// Formats an instant for tables.
pub fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M").to_string()
}
