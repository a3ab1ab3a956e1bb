//! Modal orchestration for the GRC dashboard
//!
//! One controller per UI session decides which dialog is visible:
//! - `kind`: the closed set of registered modals
//! - `payload`: typed records that pre-fill each modal
//! - `reducer`: pure state transitions driven by `events`
//! - `controller`: shared handle with the submit lifecycle
//! - `view`: typed per-dialog binding for rendering code
//! - `history`: in-memory audit trail of the session

mod controller;
mod events;
mod history;
mod kind;
mod payload;
mod reducer;
mod state;
mod view;


use std::time::Duration;

pub use controller::{ControllerOptions, ModalController};
pub use events::{EventSource, ModalEffect, ModalEvent, TimestampedEvent};
pub use history::{DEFAULT_MAX_EVENTS, History, HistoryChange, HistoryEntry, SessionMetadata};
pub use kind::ModalKind;
pub use payload::{ModalPayload, PayloadFor};
pub use reducer::reduce;
pub use state::{ActiveModal, ModalSnapshot, ModalState};
pub use view::ModalView;

/// Errors from asking for a modal that cannot be shown
#[derive(Debug, thiserror::Error)]
pub enum ModalError {
    #[error("Unknown modal kind: {0}. Registered: {registered}", registered = ModalKind::all_ids().join(", "))]
    InvalidModalKind(String),
    #[error("Payload does not fit {kind}: {source}")]
    InvalidPayload {
        kind: ModalKind,
        #[source]
        source: serde_json::Error,
    },
}

/// Why a submission did not succeed
#[derive(Debug, thiserror::Error)]
pub enum SubmitError<E> {
    /// Another submission is still in flight; the action was not run
    #[error("a submission is already in progress")]
    Busy,
    /// Submitted from a view whose modal is not the active one
    #[error("{0} is not open")]
    NotOpen(ModalKind),
    /// The action itself failed
    #[error("{0}")]
    Action(E),
    /// The action exceeded the configured submit timeout
    #[error("submission timed out after {0:?}")]
    TimedOut(Duration),
}

impl<E> SubmitError<E> {
    /// The action's own error, if that is what failed
    pub fn into_action_error(self) -> Option<E> {
        match self {
            Self::Action(err) => Some(err),
            _ => None,
        }
    }
}
