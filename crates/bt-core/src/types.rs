//! Core type definitions with validation.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::event_kind::EventKind;
use crate::window::MAX_WINDOW_SPAN;

/// Validation errors for core types.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The provided value was empty.
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },
}

/// Generates a validated string ID newtype with common trait implementations.
macro_rules! define_string_id {
    (
        $(#[$meta:meta])*
        $name:ident, $field_name:literal
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Creates a new ID after validation.
            pub fn new(id: impl Into<String>) -> Result<Self, ValidationError> {
                let id = id.into();
                if id.is_empty() {
                    return Err(ValidationError::Empty { field: $field_name });
                }
                Ok(Self(id))
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl TryFrom<String> for $name {
            type Error = ValidationError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::new(value)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_string_id!(
    /// A client-local event identifier.
    ///
    /// Stable across recalculation and reordering. Drafts get a fresh UUID;
    /// existing events usually reuse their stored record's identifier.
    EventId, "event ID"
);

define_string_id!(
    /// A back-reference to a stored record.
    ///
    /// Only set on existing events. The engine carries it through and never
    /// interprets it.
    ReferenceId, "reference ID"
);

impl EventId {
    /// Generates a new random identifier for a draft event.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

/// The period a catch-up session covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl TimeWindow {
    pub const fn new(start_time: DateTime<Utc>, end_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            end_time,
        }
    }

    /// Window from the last logged event up to `now`.
    ///
    /// The start is clamped so the window never spans more than 24 hours.
    pub fn since(last_logged: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let earliest = now - MAX_WINDOW_SPAN;
        Self::new(last_logged.max(earliest), now)
    }

    /// Span in milliseconds, clamped at zero for reversed bounds.
    pub fn span_ms(&self) -> i64 {
        (self.end_time - self.start_time).num_milliseconds().max(0)
    }

    /// Whether `time` lies within `[start_time, end_time]`.
    pub fn contains(&self, time: DateTime<Utc>) -> bool {
        self.start_time <= time && time <= self.end_time
    }
}

/// A single event in a catch-up session.
///
/// This is the estimator's only input/output unit. New drafts start without
/// an `estimated_time`; existing events are read-only anchors loaded from
/// storage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventDescriptor {
    /// Client-local identifier.
    #[serde(default = "EventId::generate")]
    pub id: EventId,

    /// What happened.
    pub kind: EventKind,

    /// Assigned or user-chosen time. `None` until estimated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<DateTime<Utc>>,

    /// When set, the estimator leaves `estimated_time` alone.
    #[serde(default)]
    pub is_pinned: bool,

    /// Loaded from storage; read-only and outside the duration budget.
    #[serde(default)]
    pub is_existing: bool,

    /// Stored record this event mirrors. Only present when `is_existing`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub existing_reference_id: Option<ReferenceId>,

    /// Kind-specific fields (amount, diaper contents, ...). Carried through unchanged.
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
}

impl EventDescriptor {
    /// Creates a new, unpinned draft event.
    pub fn new(kind: EventKind) -> Self {
        Self {
            id: EventId::generate(),
            kind,
            estimated_time: None,
            is_pinned: false,
            is_existing: false,
            existing_reference_id: None,
            payload: serde_json::Value::Null,
        }
    }

    /// Creates a read-only anchor for an event that is already stored.
    pub fn existing(reference_id: ReferenceId, kind: EventKind, time: DateTime<Utc>) -> Self {
        Self {
            id: EventId(format!("existing-{reference_id}")),
            kind,
            estimated_time: Some(time),
            is_pinned: false,
            is_existing: true,
            existing_reference_id: Some(reference_id),
            payload: serde_json::Value::Null,
        }
    }

    /// Replaces the client-local identifier.
    #[must_use]
    pub fn with_id(mut self, id: EventId) -> Self {
        self.id = id;
        self
    }

    /// Pins the event at an explicit time.
    #[must_use]
    pub fn pinned_at(mut self, time: DateTime<Utc>) -> Self {
        self.estimated_time = Some(time);
        self.is_pinned = true;
        self
    }

    /// Attaches kind-specific fields.
    #[must_use]
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// New events are everything not loaded from storage.
    pub const fn is_new(&self) -> bool {
        !self.is_existing
    }

    /// Whether the estimator assigns this event a time.
    pub const fn is_placeable(&self) -> bool {
        !self.is_existing && !self.is_pinned
    }
}
