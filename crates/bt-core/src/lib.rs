//! Core domain logic for baby tracker catch-up logging.
//!
//! This crate contains the time estimation engine behind Catch-Up Mode:
//! - Duration model: typical minutes per event kind
//! - Window validation and preset windows
//! - Estimation: proportional timestamp assignment with overflow compression
//! - Recalculation: re-estimating after a reorder with temporarily pinned slots
//! - Sessions: the editable event list for one catch-up window
//!
//! Nothing here performs I/O; every call is a pure function of its inputs.

pub mod duration;
mod estimation;
pub mod event_kind;
mod recalculate;
pub mod session;
pub mod types;
pub mod window;

pub use duration::{ConfigOverrides, TimeEstimationConfig, duration_ms};
pub use estimation::{TimeEstimationResult, estimate_event_times};
pub use event_kind::{EventKind, UnknownEventKind};
pub use recalculate::recalculate_times;
pub use session::{BatchEntry, BatchSubmission, CatchUpSession, SessionError};
pub use types::{EventDescriptor, EventId, ReferenceId, TimeWindow, ValidationError};
pub use window::{
    UnknownPreset, WindowPreset, validate_time_window, validate_time_window_at,
};
