//! Catch-up sessions.
//!
//! A session owns the event list for one catch-up window: read-only events
//! loaded from storage plus the drafts being logged. Every edit re-runs the
//! estimator, so the list always carries fresh times.

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::duration::TimeEstimationConfig;
use crate::estimation::{TimeEstimationResult, estimate_event_times};
use crate::event_kind::EventKind;
use crate::types::{EventDescriptor, EventId, TimeWindow};
use crate::window::validate_time_window_at;

/// Errors from editing or submitting a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("no event with id {0}")]
    UnknownEvent(EventId),

    #[error("event {0} was already logged and cannot be changed")]
    ReadOnly(EventId),

    #[error("index {index} is out of range for {len} events")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid time window: {}", .0.join("; "))]
    InvalidWindow(Vec<String>),

    #[error("no new events to submit")]
    NothingToSubmit,

    #[error("event {0} has no time")]
    MissingTime(EventId),
}

/// One event in a batch submission.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchEntry {
    pub id: EventId,
    pub kind: EventKind,
    pub time: DateTime<Utc>,
    #[serde(skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

/// Finalized drafts, ready for the batch-create endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchSubmission {
    pub window: TimeWindow,
    pub entries: Vec<BatchEntry>,
}

/// Event list and estimates for one catch-up window.
#[derive(Debug, Clone)]
pub struct CatchUpSession {
    window: TimeWindow,
    config: TimeEstimationConfig,
    state: TimeEstimationResult,
}

impl CatchUpSession {
    pub fn new(window: TimeWindow, config: TimeEstimationConfig) -> Self {
        let state = estimate_event_times(&[], &window, &config);
        Self {
            window,
            config,
            state,
        }
    }

    /// Merges previously stored events into the session as read-only anchors.
    ///
    /// Existing events are ordered by time and placed ahead of the drafts.
    #[must_use]
    pub fn with_existing(self, existing: impl IntoIterator<Item = EventDescriptor>) -> Self {
        let mut anchors: Vec<EventDescriptor> = existing
            .into_iter()
            .map(|mut event| {
                event.is_existing = true;
                event.is_pinned = false;
                event
            })
            .collect();
        anchors.sort_by_key(|event| event.estimated_time);

        let mut session = self;
        let drafts = session.state.events.drain(..).filter(EventDescriptor::is_new);
        anchors.extend(drafts);
        session.reestimate(anchors);
        session
    }

    pub const fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub const fn config(&self) -> &TimeEstimationConfig {
        &self.config
    }

    /// Current events, in display order, with estimated times.
    pub fn events(&self) -> &[EventDescriptor] {
        &self.state.events
    }

    /// Latest estimation result, including overflow and gap statistics.
    pub const fn result(&self) -> &TimeEstimationResult {
        &self.state
    }

    pub fn drafts(&self) -> impl Iterator<Item = &EventDescriptor> {
        self.state.events.iter().filter(|event| event.is_new())
    }

    /// Appends a new draft of `kind` and returns its id.
    pub fn add_event(&mut self, kind: EventKind, payload: serde_json::Value) -> EventId {
        self.add(EventDescriptor::new(kind).with_payload(payload))
    }

    /// Appends a prepared draft. Existing-event markers are dropped.
    pub fn add(&mut self, mut event: EventDescriptor) -> EventId {
        event.is_existing = false;
        event.existing_reference_id = None;
        let id = event.id.clone();
        tracing::debug!(%id, kind = %event.kind, "adding catch-up event");

        let mut events = self.state.events.clone();
        events.push(event);
        self.reestimate(events);
        id
    }

    /// Removes a draft. Existing events cannot be removed.
    pub fn remove_event(&mut self, id: &EventId) -> Result<EventDescriptor, SessionError> {
        let index = self.draft_index(id)?;
        let mut events = self.state.events.clone();
        let removed = events.remove(index);
        tracing::debug!(%id, "removed catch-up event");

        self.reestimate(events);
        Ok(removed)
    }

    /// Fixes a draft at an explicit time.
    pub fn pin_event(&mut self, id: &EventId, time: DateTime<Utc>) -> Result<(), SessionError> {
        let index = self.draft_index(id)?;
        let mut events = self.state.events.clone();
        events[index] = events[index].clone().pinned_at(time);

        self.reestimate(events);
        Ok(())
    }

    /// Returns a draft to estimated placement.
    pub fn unpin_event(&mut self, id: &EventId) -> Result<(), SessionError> {
        let index = self.draft_index(id)?;
        let mut events = self.state.events.clone();
        events[index].is_pinned = false;

        self.reestimate(events);
        Ok(())
    }

    /// Moves the draft at `from` to position `to`.
    ///
    /// Every unpinned draft is placed afresh, so times follow the new list order.
    /// User pins are kept.
    pub fn move_event(&mut self, from: usize, to: usize) -> Result<(), SessionError> {
        let len = self.state.events.len();
        for index in [from, to] {
            if index >= len {
                return Err(SessionError::IndexOutOfRange { index, len });
            }
        }
        let moved = &self.state.events[from];
        if moved.is_existing {
            return Err(SessionError::ReadOnly(moved.id.clone()));
        }
        if from == to {
            return Ok(());
        }

        let mut events = self.state.events.clone();
        let event = events.remove(from);
        events.insert(to, event);

        tracing::debug!(from, to, "reordered catch-up event");

        self.reestimate(events);
        Ok(())
    }

    /// Arrow-button move towards the start. A no-op at the top.
    pub fn move_up(&mut self, index: usize) -> Result<(), SessionError> {
        if index == 0 {
            return self.check_index(index);
        }
        self.move_event(index, index - 1)
    }

    /// Arrow-button move towards the end. A no-op at the bottom.
    pub fn move_down(&mut self, index: usize) -> Result<(), SessionError> {
        self.check_index(index)?;
        if index + 1 == self.state.events.len() {
            return Ok(());
        }
        self.move_event(index, index + 1)
    }

    /// Replaces the window and re-estimates every draft.
    pub fn set_window(&mut self, window: TimeWindow) {
        tracing::debug!(start = %window.start_time, end = %window.end_time, "catch-up window changed");
        self.window = window;
        self.refresh();
    }

    /// Window violations as of now.
    pub fn violations(&self) -> Vec<String> {
        self.violations_at(Utc::now())
    }

    pub fn violations_at(&self, now: DateTime<Utc>) -> Vec<String> {
        validate_time_window_at(&self.window, now)
    }

    /// Re-runs estimation over the whole list.
    pub fn refresh(&mut self) -> &TimeEstimationResult {
        let events = self.state.events.clone();
        self.reestimate(events);
        &self.state
    }

    /// Builds the batch payload for all drafts, in list order.
    ///
    /// Existing events are never resubmitted.
    pub fn submission_at(&self, now: DateTime<Utc>) -> Result<BatchSubmission, SessionError> {
        let violations = self.violations_at(now);
        if !violations.is_empty() {
            return Err(SessionError::InvalidWindow(violations));
        }

        let entries = self
            .drafts()
            .map(|event| {
                let time = event
                    .estimated_time
                    .ok_or_else(|| SessionError::MissingTime(event.id.clone()))?;
                Ok(BatchEntry {
                    id: event.id.clone(),
                    kind: event.kind,
                    time,
                    payload: event.payload.clone(),
                })
            })
            .collect::<Result<Vec<_>, SessionError>>()?;

        if entries.is_empty() {
            return Err(SessionError::NothingToSubmit);
        }

        tracing::debug!(entries = entries.len(), "built batch submission");
        Ok(BatchSubmission {
            window: self.window,
            entries,
        })
    }

    fn check_index(&self, index: usize) -> Result<(), SessionError> {
        let len = self.state.events.len();
        if index >= len {
            return Err(SessionError::IndexOutOfRange { index, len });
        }
        Ok(())
    }

    fn draft_index(&self, id: &EventId) -> Result<usize, SessionError> {
        let index = self
            .state
            .events
            .iter()
            .position(|event| &event.id == id)
            .ok_or_else(|| SessionError::UnknownEvent(id.clone()))?;
        if self.state.events[index].is_existing {
            return Err(SessionError::ReadOnly(id.clone()));
        }
        Ok(index)
    }

    fn reestimate(&mut self, events: Vec<EventDescriptor>) {
        self.state = estimate_event_times(&events, &self.window, &self.config);
    }
}
