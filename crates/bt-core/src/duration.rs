//! Typical durations per event kind.
//!
//! Durations only budget spacing between estimated events; they never record
//! how long something actually took.

use serde::{Deserialize, Serialize};

use crate::event_kind::EventKind;

const MS_PER_MINUTE: i64 = 60_000;

/// Configuration for time estimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeEstimationConfig {
    /// Typical feeding length. Default: 20 minutes.
    pub feeding_duration_minutes: u32,

    /// Typical diaper change length. Default: 5 minutes.
    pub diaper_duration_minutes: u32,

    /// Typical nap length. Default: 60 minutes.
    pub nap_duration_minutes: u32,

    /// Smallest spacing between two consecutively placed events.
    /// Default: 2 minutes.
    pub min_gap_minutes: u32,
}

impl TimeEstimationConfig {
    pub const DEFAULT: Self = Self {
        feeding_duration_minutes: 20,
        diaper_duration_minutes: 5,
        nap_duration_minutes: 60,
        min_gap_minutes: 2,
    };

    /// Returns a copy with every `Some` override applied.
    #[must_use]
    pub fn merged(&self, overrides: &ConfigOverrides) -> Self {
        Self {
            feeding_duration_minutes: overrides
                .feeding_duration_minutes
                .unwrap_or(self.feeding_duration_minutes),
            diaper_duration_minutes: overrides
                .diaper_duration_minutes
                .unwrap_or(self.diaper_duration_minutes),
            nap_duration_minutes: overrides
                .nap_duration_minutes
                .unwrap_or(self.nap_duration_minutes),
            min_gap_minutes: overrides.min_gap_minutes.unwrap_or(self.min_gap_minutes),
        }
    }

    /// Typical duration of `kind` in minutes.
    pub const fn minutes_for(&self, kind: EventKind) -> u32 {
        match kind {
            EventKind::Feeding => self.feeding_duration_minutes,
            EventKind::Diaper => self.diaper_duration_minutes,
            EventKind::Nap => self.nap_duration_minutes,
        }
    }

    /// Minimum gap between placements in milliseconds.
    pub fn min_gap_ms(&self) -> i64 {
        i64::from(self.min_gap_minutes) * MS_PER_MINUTE
    }
}

impl Default for TimeEstimationConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Partial configuration supplied by a caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigOverrides {
    pub feeding_duration_minutes: Option<u32>,
    pub diaper_duration_minutes: Option<u32>,
    pub nap_duration_minutes: Option<u32>,
    pub min_gap_minutes: Option<u32>,
}

/// Typical duration of `kind` in milliseconds.
pub fn duration_ms(kind: EventKind, config: &TimeEstimationConfig) -> i64 {
    i64::from(config.minutes_for(kind)) * MS_PER_MINUTE
}
