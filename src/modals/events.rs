//! Events and effects for the modal reducer
//!
//! Every state change is expressed as a [`ModalEvent`]. The reducer answers
//! with [`ModalEffect`]s describing what actually happened, which the
//! controller logs and records in history.

use std::fmt;
use std::time::Instant;

use super::{ModalKind, ModalPayload};

// ═══════════════════════════════════════════════════════════════════════════════
// Events
// ═══════════════════════════════════════════════════════════════════════════════

/// Requests to change modal state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEvent {
    /// Show a modal, replacing whatever is open
    Open(ModalPayload),
    /// Dismiss the active modal (ignored while busy)
    Close,
    /// A submission is about to run
    SubmitStarted,
    /// The submission started at `generation` resolved
    SubmitSucceeded { generation: u64 },
    /// The submission started at `generation` failed
    SubmitFailed { generation: u64, reason: String },
}

impl ModalEvent {
    /// Short name for logs
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Open(_) => "open",
            Self::Close => "close",
            Self::SubmitStarted => "submit_started",
            Self::SubmitSucceeded { .. } => "submit_succeeded",
            Self::SubmitFailed { .. } => "submit_failed",
        }
    }
}

/// Where an event came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    /// A caller opening or closing a modal
    User,
    /// The submission lifecycle
    Submission,
}

/// Event with the time it was dispatched
#[derive(Debug, Clone)]
pub struct TimestampedEvent {
    pub timestamp: Instant,
    pub source: EventSource,
    pub event: ModalEvent,
}

impl TimestampedEvent {
    pub fn new(source: EventSource, event: ModalEvent) -> Self {
        Self {
            timestamp: Instant::now(),
            source,
            event,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Effects
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of reducing one event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModalEffect {
    /// A modal became visible from the closed state
    Opened { kind: ModalKind, generation: u64 },
    /// A visible modal was swapped for another; the old payload is discarded
    Replaced {
        previous: ModalKind,
        next: ModalKind,
        generation: u64,
    },
    /// The active modal was dismissed
    Closed { kind: ModalKind },
    /// `close` arrived while a submission was in flight
    CloseIgnored { kind: Option<ModalKind> },
    /// Busy flag raised for a submission tied to `generation`
    SubmitBegan {
        kind: Option<ModalKind>,
        generation: u64,
    },
    /// A second submission was requested while one is in flight
    SubmitRejected { kind: Option<ModalKind> },
    /// Submission succeeded and the modal it belonged to was closed
    Completed { kind: Option<ModalKind> },
    /// Submission succeeded but a different modal had been opened meanwhile
    StaleCompletion { generation: u64 },
    /// Submission failed; the modal stays open with its data
    Retained {
        kind: Option<ModalKind>,
        reason: String,
    },
    /// Submission failed after a different modal had been opened meanwhile
    StaleFailure { generation: u64, reason: String },
}

impl fmt::Display for ModalEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn label(kind: Option<&ModalKind>) -> &'static str {
            kind.map_or("none", ModalKind::id)
        }

        match self {
            Self::Opened { kind, .. } => write!(f, "opened {kind}"),
            Self::Replaced { previous, next, .. } => write!(f, "replaced {previous} with {next}"),
            Self::Closed { kind } => write!(f, "closed {kind}"),
            Self::CloseIgnored { kind } => {
                write!(f, "close ignored while {} is busy", label(kind.as_ref()))
            }
            Self::SubmitBegan { kind, .. } => write!(f, "submitting {}", label(kind.as_ref())),
            Self::SubmitRejected { kind } => {
                write!(f, "submit rejected, {} already submitting", label(kind.as_ref()))
            }
            Self::Completed { kind } => write!(f, "submitted {}", label(kind.as_ref())),
            Self::StaleCompletion { generation } => {
                write!(f, "submission from generation {generation} completed after replacement")
            }
            Self::Retained { kind, reason } => {
                write!(f, "submit failed for {}: {reason}", label(kind.as_ref()))
            }
            Self::StaleFailure { generation, reason } => {
                write!(f, "submission from generation {generation} failed after replacement: {reason}")
            }
        }
    }
}
