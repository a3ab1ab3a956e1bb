//! Pure reducer for modal state
//!
//! All modal transitions happen here:
//! - Takes current state + event
//! - Mutates state in place and returns effects
//! - No I/O, no async, no logging
//!
//! The controller dispatches events and handles the returned effects.

use super::events::{ModalEffect, ModalEvent};
use super::state::{ActiveModal, ModalState};

/// Reducer: (state, event) → effects
pub fn reduce(state: &mut ModalState, event: ModalEvent) -> Vec<ModalEffect> {
    let mut effects = Vec::new();

    match event {
        ModalEvent::Open(payload) => {
            state.generation += 1;
            let next = payload.kind();
            let previous = state.active.replace(ActiveModal {
                payload,
                generation: state.generation,
            });

            effects.push(match previous {
                Some(previous) => ModalEffect::Replaced {
                    previous: previous.kind(),
                    next,
                    generation: state.generation,
                },
                None => ModalEffect::Opened {
                    kind: next,
                    generation: state.generation,
                },
            });
        }

        ModalEvent::Close => {
            if state.busy {
                effects.push(ModalEffect::CloseIgnored {
                    kind: state.active_kind(),
                });
            } else if let Some(active) = state.active.take() {
                effects.push(ModalEffect::Closed {
                    kind: active.kind(),
                });
            }
        }

        ModalEvent::SubmitStarted => {
            if state.busy {
                effects.push(ModalEffect::SubmitRejected {
                    kind: state.active_kind(),
                });
            } else {
                state.busy = true;
                effects.push(ModalEffect::SubmitBegan {
                    kind: state.active_kind(),
                    generation: state.generation,
                });
            }
        }

        ModalEvent::SubmitSucceeded { generation } => {
            state.busy = false;
            if state.was_replaced_since(generation) {
                effects.push(ModalEffect::StaleCompletion { generation });
            } else {
                let kind = state.active_kind();
                state.reset();
                effects.push(ModalEffect::Completed { kind });
            }
        }

        ModalEvent::SubmitFailed { generation, reason } => {
            state.busy = false;
            if state.was_replaced_since(generation) {
                effects.push(ModalEffect::StaleFailure { generation, reason });
            } else {
                effects.push(ModalEffect::Retained {
                    kind: state.active_kind(),
                    reason,
                });
            }
        }
    }

    effects
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modals::{ModalKind, ModalPayload};
    use crate::records::ImprovementDraft;

    fn open(state: &mut ModalState, kind: ModalKind) -> Vec<ModalEffect> {
        reduce(state, ModalEvent::Open(ModalPayload::empty(kind)))
    }

    #[test]
    fn test_open_from_closed() {
        let mut state = ModalState::new();

        let effects = open(&mut state, ModalKind::NewImprovement);

        assert!(state.is_open(ModalKind::NewImprovement));
        assert!(!state.is_open(ModalKind::ScheduleReview));
        assert_eq!(
            effects,
            vec![ModalEffect::Opened {
                kind: ModalKind::NewImprovement,
                generation: 1
            }]
        );
    }

    #[test]
    fn test_open_replaces_without_merging() {
        let mut state = ModalState::new();
        let draft = ImprovementDraft {
            title: "X".to_string(),
            ..Default::default()
        };
        reduce(&mut state, ModalEvent::Open(draft.into()));

        let effects = open(&mut state, ModalKind::ScheduleReview);

        assert!(!state.is_open(ModalKind::NewImprovement));
        assert!(state.is_open(ModalKind::ScheduleReview));
        assert_eq!(
            state.payload(),
            Some(&ModalPayload::empty(ModalKind::ScheduleReview))
        );
        assert!(matches!(
            effects.as_slice(),
            [ModalEffect::Replaced {
                previous: ModalKind::NewImprovement,
                next: ModalKind::ScheduleReview,
                ..
            }]
        ));
    }

    #[test]
    fn test_close_clears_payload() {
        let mut state = ModalState::new();
        open(&mut state, ModalKind::EditImprovement);

        let effects = reduce(&mut state, ModalEvent::Close);

        assert!(state.active.is_none());
        assert!(state.payload().is_none());
        assert_eq!(
            effects,
            vec![ModalEffect::Closed {
                kind: ModalKind::EditImprovement
            }]
        );
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let mut state = ModalState::new();

        let effects = reduce(&mut state, ModalEvent::Close);

        assert!(effects.is_empty());
        assert_eq!(state, ModalState::new());
    }

    #[test]
    fn test_close_ignored_while_busy() {
        let mut state = ModalState::new();
        open(&mut state, ModalKind::NewCorrectiveAction);
        reduce(&mut state, ModalEvent::SubmitStarted);

        let effects = reduce(&mut state, ModalEvent::Close);

        assert!(state.is_open(ModalKind::NewCorrectiveAction));
        assert!(state.busy);
        assert!(matches!(
            effects.as_slice(),
            [ModalEffect::CloseIgnored { .. }]
        ));
    }

    #[test]
    fn test_second_submit_rejected() {
        let mut state = ModalState::new();
        open(&mut state, ModalKind::NewImprovement);
        reduce(&mut state, ModalEvent::SubmitStarted);

        let effects = reduce(&mut state, ModalEvent::SubmitStarted);

        assert!(matches!(
            effects.as_slice(),
            [ModalEffect::SubmitRejected { .. }]
        ));
        assert!(state.busy);
    }

    #[test]
    fn test_success_closes() {
        let mut state = ModalState::new();
        open(&mut state, ModalKind::ScheduleReview);
        reduce(&mut state, ModalEvent::SubmitStarted);

        let effects = reduce(&mut state, ModalEvent::SubmitSucceeded { generation: 1 });

        assert!(!state.busy);
        assert!(state.active.is_none());
        assert_eq!(
            effects,
            vec![ModalEffect::Completed {
                kind: Some(ModalKind::ScheduleReview)
            }]
        );
    }

    #[test]
    fn test_failure_retains() {
        let mut state = ModalState::new();
        let draft = ImprovementDraft {
            title: "Keep me".to_string(),
            ..Default::default()
        };
        reduce(&mut state, ModalEvent::Open(draft.clone().into()));
        reduce(&mut state, ModalEvent::SubmitStarted);

        reduce(
            &mut state,
            ModalEvent::SubmitFailed {
                generation: 1,
                reason: "network".to_string(),
            },
        );

        assert!(!state.busy);
        assert!(state.is_open(ModalKind::NewImprovement));
        assert_eq!(state.payload(), Some(&ModalPayload::NewImprovement(draft)));
    }

    #[test]
    fn test_stale_success_leaves_replacement_open() {
        let mut state = ModalState::new();
        open(&mut state, ModalKind::EditCorrectiveAction);
        reduce(&mut state, ModalEvent::SubmitStarted);
        open(&mut state, ModalKind::ViewDetails);

        let effects = reduce(&mut state, ModalEvent::SubmitSucceeded { generation: 1 });

        assert!(!state.busy);
        assert!(state.is_open(ModalKind::ViewDetails));
        assert_eq!(effects, vec![ModalEffect::StaleCompletion { generation: 1 }]);
    }

    #[test]
    fn test_stale_failure_does_not_blame_replacement() {
        let mut state = ModalState::new();
        open(&mut state, ModalKind::EditImprovement);
        reduce(&mut state, ModalEvent::SubmitStarted);
        open(&mut state, ModalKind::ViewDetails);

        let effects = reduce(
            &mut state,
            ModalEvent::SubmitFailed {
                generation: 1,
                reason: "timeout".to_string(),
            },
        );

        assert!(!state.busy);
        assert!(state.is_open(ModalKind::ViewDetails));
        assert_eq!(
            effects,
            vec![ModalEffect::StaleFailure {
                generation: 1,
                reason: "timeout".to_string()
            }]
        );
    }

    #[test]
    fn test_at_most_one_open() {
        let mut state = ModalState::new();

        for kind in ModalKind::ALL.iter().chain(ModalKind::ALL.iter().rev()) {
            open(&mut state, *kind);
            let open_count = ModalKind::ALL.iter().filter(|k| state.is_open(**k)).count();
            assert_eq!(open_count, 1);
            assert!(state.is_open(*kind));
        }
    }
}
