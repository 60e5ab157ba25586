//! Proportional time estimation.
//!
//! Assigns plausible timestamps to catch-up events by spreading their typical
//! durations across a time window.
//!
//! # Algorithm Summary
//!
//! 1. Budget the typical durations of new, unpinned events
//! 2. Flag overflow when the budget exceeds the window, and compress every
//!    duration proportionally so the events still fit
//! 3. Split the remaining slack evenly between placed events
//! 4. Walk the list in order with a cursor starting at the window start,
//!    placing each unpinned new event and advancing by duration plus slack
//!
//! Existing and pinned events keep their times and do not move the cursor.

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::duration::{TimeEstimationConfig, duration_ms};
use crate::types::{EventDescriptor, TimeWindow};

/// Result of a time estimation pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeEstimationResult {
    /// All input events, in input order, with fresh times on placed events.
    pub events: Vec<EventDescriptor>,

    /// Typical durations did not fit and were compressed.
    pub is_overflowed: bool,

    /// Summed typical durations of new, unpinned events.
    pub total_duration_ms: i64,

    /// Window time left over after the duration budget.
    pub gap_time_ms: i64,

    /// Slack added after each placed event.
    pub gap_per_event_ms: i64,
}

/// Sequential placement state for one estimation pass.
struct Walk {
    cursor: DateTime<Utc>,
    end: DateTime<Utc>,
    min_gap: Duration,
    last_placed: Option<DateTime<Utc>>,
}

impl Walk {
    fn new(window: &TimeWindow, min_gap_ms: i64) -> Self {
        Self {
            cursor: window.start_time,
            // Reversed windows collapse onto the start.
            end: window.end_time.max(window.start_time),
            min_gap: Duration::milliseconds(min_gap_ms),
            last_placed: None,
        }
    }

    /// Places one event and advances the cursor past it.
    ///
    /// The first placement sits at the cursor; later ones keep `min_gap` from
    /// the previous placement.
    fn place(&mut self, duration_ms: i64, gap_ms: i64) -> DateTime<Utc> {
        let earliest = self
            .last_placed
            .map_or(self.cursor, |prev| self.cursor.max(prev + self.min_gap));
        let placed = earliest.min(self.end);

        self.last_placed = Some(placed);
        self.cursor = (placed + Duration::milliseconds(duration_ms + gap_ms)).min(self.end);
        placed
    }
}

/// Shrinks `typical_ms` so that durations summing to `total_ms` fill `window_ms`.
fn compressed_duration_ms(typical_ms: i64, total_ms: i64, window_ms: i64) -> i64 {
    if total_ms <= 0 {
        return 0;
    }
    let scaled = i128::from(typical_ms) * i128::from(window_ms) / i128::from(total_ms);
    i64::try_from(scaled).unwrap_or(window_ms)
}

/// Estimate times for every new, unpinned event in `events`.
///
/// Never fails. Window validity is the caller's concern; a window with a
/// non-positive span places every event at its start.
pub fn estimate_event_times(
    events: &[EventDescriptor],
    window: &TimeWindow,
    config: &TimeEstimationConfig,
) -> TimeEstimationResult {
    let window_duration_ms = window.span_ms();

    if !events.iter().any(EventDescriptor::is_new) {
        tracing::debug!(
            existing = events.len(),
            "no new events to estimate; returning input unchanged"
        );
        return TimeEstimationResult {
            events: events.to_vec(),
            is_overflowed: false,
            total_duration_ms: 0,
            gap_time_ms: window_duration_ms,
            gap_per_event_ms: 0,
        };
    }

    let (placeable_count, total_duration_ms) = events
        .iter()
        .filter(|event| event.is_placeable())
        .fold((0_i64, 0_i64), |(count, total), event| {
            (count + 1, total + duration_ms(event.kind, config))
        });

    let is_overflowed = total_duration_ms > window_duration_ms;
    let gap_time_ms = (window_duration_ms - total_duration_ms).max(0);
    let gap_per_event_ms = if placeable_count == 0 {
        0
    } else {
        gap_time_ms / placeable_count
    };

    let mut walk = Walk::new(window, config.min_gap_ms());
    let estimated = events
        .iter()
        .map(|event| {
            if !event.is_placeable() {
                return event.clone();
            }

            let typical_ms = duration_ms(event.kind, config);
            let slot_ms = if is_overflowed {
                compressed_duration_ms(typical_ms, total_duration_ms, window_duration_ms)
            } else {
                typical_ms
            };
            let placed = walk.place(slot_ms, gap_per_event_ms);
            tracing::trace!(id = %event.id, kind = %event.kind, %placed, slot_ms, "placed event");

            EventDescriptor {
                estimated_time: Some(placed),
                ..event.clone()
            }
        })
        .collect();

    tracing::debug!(
        events = events.len(),
        placed = placeable_count,
        total_duration_ms,
        window_duration_ms,
        gap_per_event_ms,
        is_overflowed,
        "estimated event times"
    );

    TimeEstimationResult {
        events: estimated,
        is_overflowed,
        total_duration_ms,
        gap_time_ms,
        gap_per_event_ms,
    }
}
