//! Recalculation after reordering.
//!
//! After a drag, touch, or arrow-button move, the caller freezes the slots it
//! wants to keep and lets the estimator refresh the rest.

use crate::duration::TimeEstimationConfig;
use crate::estimation::{TimeEstimationResult, estimate_event_times};
use crate::types::{EventDescriptor, TimeWindow};

/// Re-estimate `events`, treating every index in `pinned_indices` as pinned.
///
/// Pins are applied to a derived copy; `events` is left untouched. Events that
/// are already pinned stay pinned, and indices past the end are ignored.
pub fn recalculate_times(
    events: &[EventDescriptor],
    window: &TimeWindow,
    pinned_indices: &[usize],
    config: &TimeEstimationConfig,
) -> TimeEstimationResult {
    for index in pinned_indices.iter().filter(|&&index| index >= events.len()) {
        tracing::trace!(index, len = events.len(), "ignoring out-of-range pin index");
    }

    let working: Vec<EventDescriptor> = events
        .iter()
        .enumerate()
        .map(|(index, event)| EventDescriptor {
            is_pinned: event.is_pinned || pinned_indices.contains(&index),
            ..event.clone()
        })
        .collect();

    estimate_event_times(&working, window, config)
}
