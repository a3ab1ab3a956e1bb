//! Session history for modal transitions
//!
//! In-memory audit trail of what the controller did during this session:
//! - Every dispatched event and the effects it produced
//! - Submission outcomes
//! - Session metadata (id, start time, last activity)
//!
//! Nothing here is persisted.

use std::collections::VecDeque;
use std::time::Instant;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::ModalKind;
use super::events::{EventSource, ModalEffect, TimestampedEvent};

/// Default number of entries retained
pub const DEFAULT_MAX_EVENTS: usize = 500;

// ═══════════════════════════════════════════════════════════════════════════════
// Session Metadata
// ═══════════════════════════════════════════════════════════════════════════════

/// Identifies the UI session a history belongs to
#[derive(Debug, Clone)]
pub struct SessionMetadata {
    pub session_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Default for SessionMetadata {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionMetadata {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            session_id: Uuid::new_v4(),
            created_at: now,
            last_activity: now,
        }
    }

    pub fn touch(&mut self) {
        self.last_activity = Utc::now();
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// History
// ═══════════════════════════════════════════════════════════════════════════════

/// Bounded log of modal transitions
#[derive(Debug, Clone)]
pub struct History {
    pub metadata: SessionMetadata,
    entries: VecDeque<HistoryEntry>,
    max_events: usize,
    next_id: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_EVENTS)
    }

    /// History retaining at most `max_events` entries (minimum 1)
    pub fn with_capacity(max_events: usize) -> Self {
        let max_events = max_events.max(1);
        Self {
            metadata: SessionMetadata::new(),
            entries: VecDeque::with_capacity(max_events.min(DEFAULT_MAX_EVENTS)),
            max_events,
            next_id: 1,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.metadata.session_id
    }

    /// Record an event together with the effects the reducer returned
    pub fn record(&mut self, event: &TimestampedEvent, effects: &[ModalEffect]) {
        self.metadata.touch();
        let entry = HistoryEntry {
            id: self.next_id(),
            timestamp: event.timestamp,
            source: event.source,
            event: event.event.name(),
            changes: effects.iter().map(HistoryChange::from).collect(),
        };
        self.push_entry(entry);
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Most recent `n` entries, oldest first
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &HistoryEntry> {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Count of submissions that failed and kept their modal open
    pub fn failed_submissions(&self) -> usize {
        self.entries
            .iter()
            .flat_map(|e| &e.changes)
            .filter(|c| matches!(c, HistoryChange::SubmitFailed { .. }))
            .count()
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn push_entry(&mut self, entry: HistoryEntry) {
        self.entries.push_back(entry);

        while self.entries.len() > self.max_events {
            self.entries.pop_front();
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// History Entry Types
// ═══════════════════════════════════════════════════════════════════════════════

/// One dispatched event
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub id: u64,
    pub timestamp: Instant,
    pub source: EventSource,
    /// Event name (`open`, `close`, ...)
    pub event: &'static str,
    /// What the event did; empty when it was a no-op
    pub changes: Vec<HistoryChange>,
}

/// Condensed effect as stored in history
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryChange {
    Opened { kind: ModalKind },
    Replaced { previous: ModalKind, next: ModalKind },
    Closed { kind: ModalKind },
    CloseIgnored,
    SubmitStarted { kind: Option<ModalKind> },
    SubmitRejected,
    SubmitSucceeded { kind: Option<ModalKind>, stale: bool },
    SubmitFailed { kind: Option<ModalKind>, reason: String },
}

impl From<&ModalEffect> for HistoryChange {
    fn from(effect: &ModalEffect) -> Self {
        match effect {
            ModalEffect::Opened { kind, .. } => Self::Opened { kind: *kind },
            ModalEffect::Replaced { previous, next, .. } => Self::Replaced {
                previous: *previous,
                next: *next,
            },
            ModalEffect::Closed { kind } => Self::Closed { kind: *kind },
            ModalEffect::CloseIgnored { .. } => Self::CloseIgnored,
            ModalEffect::SubmitBegan { kind, .. } => Self::SubmitStarted { kind: *kind },
            ModalEffect::SubmitRejected { .. } => Self::SubmitRejected,
            ModalEffect::Completed { kind } => Self::SubmitSucceeded {
                kind: *kind,
                stale: false,
            },
            ModalEffect::StaleCompletion { .. } => Self::SubmitSucceeded {
                kind: None,
                stale: true,
            },
            ModalEffect::Retained { kind, reason } => Self::SubmitFailed {
                kind: *kind,
                reason: reason.clone(),
            },
            ModalEffect::StaleFailure { reason, .. } => Self::SubmitFailed {
                kind: None,
                reason: reason.clone(),
            },
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
