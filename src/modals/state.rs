//! Modal state owned by the controller.

use super::{ModalKind, ModalPayload};

/// The modal currently on screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveModal {
    /// Record pre-filling the dialog
    pub payload: ModalPayload,
    /// Which `open` produced this modal
    pub generation: u64,
}

impl ActiveModal {
    pub fn kind(&self) -> ModalKind {
        self.payload.kind()
    }
}

/// Single modal slot plus submission flag.
///
/// At most one modal is active. The payload lives inside `active`, so it is
/// gone whenever nothing is open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalState {
    pub active: Option<ActiveModal>,
    /// A submission is in flight; `close` is ignored while set
    pub busy: bool,
    /// Bumped on every `open`
    pub generation: u64,
}

impl ModalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_kind(&self) -> Option<ModalKind> {
        self.active.as_ref().map(ActiveModal::kind)
    }

    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.active_kind() == Some(kind)
    }

    pub fn payload(&self) -> Option<&ModalPayload> {
        self.active.as_ref().map(|active| &active.payload)
    }

    /// A modal opened after `generation` is now on screen
    pub fn was_replaced_since(&self, generation: u64) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| active.generation != generation)
    }

    /// Drop the active modal and its payload
    pub fn reset(&mut self) {
        self.active = None;
    }

    pub fn snapshot(&self) -> ModalSnapshot {
        ModalSnapshot {
            active: self.active_kind(),
            payload: self.payload().cloned(),
            busy: self.busy,
            generation: self.generation,
        }
    }
}

/// Owned copy of the state handed to observers
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModalSnapshot {
    pub active: Option<ModalKind>,
    pub payload: Option<ModalPayload>,
    pub busy: bool,
    pub generation: u64,
}

impl ModalSnapshot {
    pub fn is_open(&self, kind: ModalKind) -> bool {
        self.active == Some(kind)
    }

    pub fn is_closed(&self) -> bool {
        self.active.is_none()
    }
}
