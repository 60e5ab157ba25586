//! Time window validation and preset windows.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::TimeWindow;

/// How far past the current time a window may end (clock skew, input rounding).
pub const FUTURE_TOLERANCE: Duration = Duration::minutes(5);

/// Longest window a catch-up session may cover. Inclusive.
pub const MAX_WINDOW_SPAN: Duration = Duration::hours(24);

pub const START_AFTER_END: &str = "Start time must be before end time";
pub const END_IN_FUTURE: &str = "End time cannot be in the future";
pub const SPAN_TOO_LONG: &str = "Time window cannot exceed 24 hours";

/// Validates a window against the current clock.
///
/// Returns every violated rule; an empty list means the window is valid.
pub fn validate_time_window(window: &TimeWindow) -> Vec<String> {
    validate_time_window_at(window, Utc::now())
}

/// Validates a window as of `now`.
pub fn validate_time_window_at(window: &TimeWindow, now: DateTime<Utc>) -> Vec<String> {
    let mut violations = Vec::new();

    if window.start_time >= window.end_time {
        violations.push(START_AFTER_END.to_string());
    }

    if window.end_time > now + FUTURE_TOLERANCE {
        violations.push(END_IN_FUTURE.to_string());
    }

    if window.end_time - window.start_time > MAX_WINDOW_SPAN {
        violations.push(SPAN_TOO_LONG.to_string());
    }

    violations
}

/// Preset windows offered by the catch-up wizard, each ending "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WindowPreset {
    LastHour,
    Last2Hours,
    #[default]
    Last4Hours,
    Last8Hours,
    Last12Hours,
    Last24Hours,
}

impl WindowPreset {
    pub const ALL: [Self; 6] = [
        Self::LastHour,
        Self::Last2Hours,
        Self::Last4Hours,
        Self::Last8Hours,
        Self::Last12Hours,
        Self::Last24Hours,
    ];

    /// Short form used in configuration and on the command line.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LastHour => "1h",
            Self::Last2Hours => "2h",
            Self::Last4Hours => "4h",
            Self::Last8Hours => "8h",
            Self::Last12Hours => "12h",
            Self::Last24Hours => "24h",
        }
    }

    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::LastHour => "Last hour",
            Self::Last2Hours => "Last 2 hours",
            Self::Last4Hours => "Last 4 hours",
            Self::Last8Hours => "Last 8 hours",
            Self::Last12Hours => "Last 12 hours",
            Self::Last24Hours => "Last 24 hours",
        }
    }

    pub const fn span(&self) -> Duration {
        match self {
            Self::LastHour => Duration::hours(1),
            Self::Last2Hours => Duration::hours(2),
            Self::Last4Hours => Duration::hours(4),
            Self::Last8Hours => Duration::hours(8),
            Self::Last12Hours => Duration::hours(12),
            Self::Last24Hours => Duration::hours(24),
        }
    }

    /// The preset's window ending at `now`.
    pub fn window_ending_at(&self, now: DateTime<Utc>) -> TimeWindow {
        TimeWindow::new(now - self.span(), now)
    }
}

impl fmt::Display for WindowPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Error type for unknown preset strings.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown window preset: {0} (expected one of 1h, 2h, 4h, 8h, 12h, 24h)")]
pub struct UnknownPreset(String);

impl FromStr for WindowPreset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.as_str() == s)
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}

impl Serialize for WindowPreset {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for WindowPreset {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
