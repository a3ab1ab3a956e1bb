//! Modal controller
//!
//! The single source of truth for which modal is open, what it was opened
//! with, and whether a submission is in flight. A controller is a cheap
//! cloneable handle; construct one per UI session and hand clones to views.

use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use uuid::Uuid;

use super::events::{EventSource, ModalEffect, ModalEvent, TimestampedEvent};
use super::history::{DEFAULT_MAX_EVENTS, History, HistoryEntry};
use super::payload::PayloadFor;
use super::reducer::reduce;
use super::state::{ModalSnapshot, ModalState};
use super::{ModalError, ModalKind, ModalPayload, SubmitError};
use crate::config::Config;
use crate::{log_debug, log_error, log_info, log_warn};

/// Reason recorded when a submission future goes away before settling
const ABANDONED_REASON: &str = "submission abandoned before completion";

// ═══════════════════════════════════════════════════════════════════════════════
// Options
// ═══════════════════════════════════════════════════════════════════════════════

/// Construction options for [`ModalController`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerOptions {
    /// Fail submissions that run longer than this. `None` waits indefinitely.
    pub submit_timeout: Option<Duration>,
    /// History entries retained for the session
    pub max_history: usize,
}

impl Default for ControllerOptions {
    fn default() -> Self {
        Self {
            submit_timeout: None,
            max_history: DEFAULT_MAX_EVENTS,
        }
    }
}

impl From<&Config> for ControllerOptions {
    fn from(config: &Config) -> Self {
        Self {
            submit_timeout: config.submit.timeout(),
            max_history: config.history.max_events,
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Controller
// ═══════════════════════════════════════════════════════════════════════════════

struct Inner {
    state: ModalState,
    history: History,
}

struct Shared {
    inner: Mutex<Inner>,
    updates: watch::Sender<ModalSnapshot>,
    submit_timeout: Option<Duration>,
}

/// Handle to one session's modal state
#[derive(Clone)]
pub struct ModalController {
    shared: Arc<Shared>,
}

impl Default for ModalController {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ModalController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModalController")
            .field("state", &self.snapshot())
            .field("submit_timeout", &self.shared.submit_timeout)
            .finish_non_exhaustive()
    }
}

impl ModalController {
    /// Controller with nothing open, no submit timeout
    pub fn new() -> Self {
        Self::with_options(ControllerOptions::default())
    }

    pub fn with_options(options: ControllerOptions) -> Self {
        let state = ModalState::new();
        let (updates, _) = watch::channel(state.snapshot());

        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    state,
                    history: History::with_capacity(options.max_history),
                }),
                updates,
                submit_timeout: options.submit_timeout,
            }),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::with_options(ControllerOptions::from(config))
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Open / Close
    // ─────────────────────────────────────────────────────────────────────────

    /// Show a modal pre-filled with `payload`. Whatever was open is replaced.
    pub fn open(&self, payload: impl Into<ModalPayload>) {
        let payload = payload.into();
        log_debug!("modal: opening {} for {}", payload.kind(), payload.summary());
        self.dispatch(EventSource::User, ModalEvent::Open(payload));
    }

    /// Show a modal with its empty payload
    pub fn open_kind(&self, kind: ModalKind) {
        self.open(ModalPayload::empty(kind));
    }

    /// Open from an untyped kind name and JSON payload.
    ///
    /// Nothing changes when the kind is unregistered or the payload does not
    /// fit the kind's record shape.
    pub fn open_value(&self, kind: &str, payload: serde_json::Value) -> Result<(), ModalError> {
        let kind: ModalKind = kind.parse()?;
        let payload = ModalPayload::from_value(kind, payload)?;
        self.open(payload);
        Ok(())
    }

    /// Dismiss the active modal. Does nothing while a submission is in
    /// flight or when nothing is open.
    pub fn close(&self) {
        self.dispatch(EventSource::User, ModalEvent::Close);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.shared.inner.lock().state.is_open(kind)
    }

    pub fn active(&self) -> Option<ModalKind> {
        self.shared.inner.lock().state.active_kind()
    }

    pub fn is_busy(&self) -> bool {
        self.shared.inner.lock().state.busy
    }

    /// Copy of the active payload, `None` when closed
    pub fn payload(&self) -> Option<ModalPayload> {
        self.shared.inner.lock().state.payload().cloned()
    }

    /// Active payload as a concrete record, `None` when closed or when the
    /// active modal carries a different record type
    pub fn payload_as<T>(&self) -> Option<T>
    where
        T: PayloadFor + Clone,
    {
        let inner = self.shared.inner.lock();
        inner.state.payload().and_then(T::extract).cloned()
    }

    pub fn snapshot(&self) -> ModalSnapshot {
        self.shared.inner.lock().state.snapshot()
    }

    /// Receiver notified after every transition
    pub fn subscribe(&self) -> watch::Receiver<ModalSnapshot> {
        self.shared.updates.subscribe()
    }

    pub fn session_id(&self) -> Uuid {
        self.shared.inner.lock().history.session_id()
    }

    /// Last `n` history entries, oldest first
    pub fn recent_events(&self, n: usize) -> Vec<HistoryEntry> {
        self.shared.inner.lock().history.recent(n).cloned().collect()
    }

    pub fn failed_submissions(&self) -> usize {
        self.shared.inner.lock().history.failed_submissions()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Submission
    // ─────────────────────────────────────────────────────────────────────────

    /// Run `action` as the active modal's submission.
    ///
    /// While it runs the controller is busy and `close` is ignored. Success
    /// closes the modal. Failure leaves the modal open with its payload and
    /// hands the error back. The busy flag is released on every exit path,
    /// including a panic inside `action` or the returned future being dropped.
    ///
    /// # Panics
    ///
    /// With a submit timeout configured this must be awaited inside a Tokio
    /// runtime with the time driver enabled; `tokio::time::timeout` panics
    /// otherwise. Without a timeout any executor will do.
    pub async fn submit<F, Fut, T, E>(&self, action: F) -> Result<T, SubmitError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: fmt::Display,
    {
        let guard = self.begin_submission()?;

        let outcome = match self.shared.submit_timeout {
            Some(limit) => match tokio::time::timeout(limit, action()).await {
                Ok(result) => result.map_err(SubmitError::Action),
                Err(_) => Err(SubmitError::TimedOut(limit)),
            },
            None => action().await.map_err(SubmitError::Action),
        };

        guard.settle(&outcome);
        outcome
    }

    /// [`submit`](Self::submit) for a synchronous action. No timeout applies.
    pub fn submit_sync<F, T, E>(&self, action: F) -> Result<T, SubmitError<E>>
    where
        F: FnOnce() -> Result<T, E>,
        E: fmt::Display,
    {
        let guard = self.begin_submission()?;
        let outcome = action().map_err(SubmitError::Action);
        guard.settle(&outcome);
        outcome
    }

    fn begin_submission<E>(&self) -> Result<BusyGuard, SubmitError<E>> {
        let effects = self.dispatch(EventSource::Submission, ModalEvent::SubmitStarted);

        effects
            .iter()
            .find_map(|effect| match effect {
                ModalEffect::SubmitBegan { generation, .. } => Some(BusyGuard {
                    controller: self.clone(),
                    generation: *generation,
                    settled: false,
                }),
                _ => None,
            })
            .ok_or(SubmitError::Busy)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    fn dispatch(&self, source: EventSource, event: ModalEvent) -> Vec<ModalEffect> {
        let stamped = TimestampedEvent::new(source, event.clone());

        let effects = {
            let mut inner = self.shared.inner.lock();
            let effects = reduce(&mut inner.state, event);
            inner.history.record(&stamped, &effects);
            // Publish under the lock so watchers see transitions in state order
            self.shared.updates.send_replace(inner.state.snapshot());
            effects
        };

        for effect in &effects {
            log_effect(effect);
        }

        effects
    }
}

fn log_effect(effect: &ModalEffect) {
    match effect {
        ModalEffect::Opened { .. }
        | ModalEffect::Replaced { .. }
        | ModalEffect::Closed { .. }
        | ModalEffect::CloseIgnored { .. }
        | ModalEffect::SubmitBegan { .. } => log_debug!("modal: {}", effect),
        ModalEffect::Completed { .. } => log_info!("modal: {}", effect),
        ModalEffect::SubmitRejected { .. } | ModalEffect::StaleCompletion { .. } => {
            log_warn!("modal: {}", effect);
        }
        ModalEffect::Retained { .. } | ModalEffect::StaleFailure { .. } => {
            log_error!("modal: {}", effect);
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Busy Guard
// ═══════════════════════════════════════════════════════════════════════════════

/// Holds the busy flag for one submission. Dropping it unsettled counts as
/// a failure, so the flag never outlives the submission.
struct BusyGuard {
    controller: ModalController,
    generation: u64,
    settled: bool,
}

impl BusyGuard {
    fn settle<T, E>(mut self, outcome: &Result<T, SubmitError<E>>)
    where
        E: fmt::Display,
    {
        let event = match outcome {
            Ok(_) => ModalEvent::SubmitSucceeded {
                generation: self.generation,
            },
            Err(err) => ModalEvent::SubmitFailed {
                generation: self.generation,
                reason: err.to_string(),
            },
        };
        self.settled = true;
        self.controller.dispatch(EventSource::Submission, event);
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        if !self.settled {
            self.controller.dispatch(
                EventSource::Submission,
                ModalEvent::SubmitFailed {
                    generation: self.generation,
                    reason: ABANDONED_REASON.to_string(),
                },
            );
        }
    }
}
