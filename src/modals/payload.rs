//! Typed modal payloads.
//!
//! Each [`ModalKind`] owns exactly one payload shape, so a view can only be
//! pre-filled with the record type it knows how to render.

use serde::Serialize;

use super::{ModalError, ModalKind};
use crate::records::{
    CorrectiveAction, CorrectiveActionDraft, DetailsRef, Improvement, ImprovementDraft,
    ReviewSchedule,
};

/// Payload pre-filling the active modal, tagged by kind
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "payload", rename_all = "kebab-case")]
pub enum ModalPayload {
    NewCorrectiveAction(CorrectiveActionDraft),
    NewImprovement(ImprovementDraft),
    ScheduleReview(ReviewSchedule),
    EditCorrectiveAction(CorrectiveAction),
    EditImprovement(Improvement),
    ViewDetails(DetailsRef),
}

impl ModalPayload {
    /// The kind this payload opens
    pub const fn kind(&self) -> ModalKind {
        match self {
            Self::NewCorrectiveAction(_) => ModalKind::NewCorrectiveAction,
            Self::NewImprovement(_) => ModalKind::NewImprovement,
            Self::ScheduleReview(_) => ModalKind::ScheduleReview,
            Self::EditCorrectiveAction(_) => ModalKind::EditCorrectiveAction,
            Self::EditImprovement(_) => ModalKind::EditImprovement,
            Self::ViewDetails(_) => ModalKind::ViewDetails,
        }
    }

    /// Empty payload for a kind (the `{}` case)
    pub fn empty(kind: ModalKind) -> Self {
        match kind {
            ModalKind::NewCorrectiveAction => Self::NewCorrectiveAction(Default::default()),
            ModalKind::NewImprovement => Self::NewImprovement(Default::default()),
            ModalKind::ScheduleReview => Self::ScheduleReview(Default::default()),
            ModalKind::EditCorrectiveAction => Self::EditCorrectiveAction(Default::default()),
            ModalKind::EditImprovement => Self::EditImprovement(Default::default()),
            ModalKind::ViewDetails => Self::ViewDetails(Default::default()),
        }
    }

    /// Decode an untyped JSON value into the payload shape owned by `kind`.
    ///
    /// `null` is treated the same as `{}`.
    pub fn from_value(kind: ModalKind, value: serde_json::Value) -> Result<Self, ModalError> {
        let value = if value.is_null() {
            serde_json::Value::Object(serde_json::Map::new())
        } else {
            value
        };

        let decoded = match kind {
            ModalKind::NewCorrectiveAction => serde_json::from_value(value).map(Self::NewCorrectiveAction),
            ModalKind::NewImprovement => serde_json::from_value(value).map(Self::NewImprovement),
            ModalKind::ScheduleReview => serde_json::from_value(value).map(Self::ScheduleReview),
            ModalKind::EditCorrectiveAction => {
                serde_json::from_value(value).map(Self::EditCorrectiveAction)
            }
            ModalKind::EditImprovement => serde_json::from_value(value).map(Self::EditImprovement),
            ModalKind::ViewDetails => serde_json::from_value(value).map(Self::ViewDetails),
        };

        decoded.map_err(|source| ModalError::InvalidPayload { kind, source })
    }

    /// Short human label for logs ("CAR-1", the draft title, ...)
    pub fn summary(&self) -> String {
        let label = match self {
            Self::NewCorrectiveAction(draft) => draft.title.as_str(),
            Self::NewImprovement(draft) => draft.title.as_str(),
            Self::ScheduleReview(review) => review.scope.as_str(),
            Self::EditCorrectiveAction(action) => action.id.as_str(),
            Self::EditImprovement(improvement) => improvement.id.as_str(),
            Self::ViewDetails(details) => details.id.as_str(),
        };
        if label.is_empty() {
            "(empty)".to_string()
        } else {
            label.to_string()
        }
    }
}

impl From<CorrectiveActionDraft> for ModalPayload {
    fn from(draft: CorrectiveActionDraft) -> Self {
        Self::NewCorrectiveAction(draft)
    }
}

impl From<ImprovementDraft> for ModalPayload {
    fn from(draft: ImprovementDraft) -> Self {
        Self::NewImprovement(draft)
    }
}

impl From<ReviewSchedule> for ModalPayload {
    fn from(review: ReviewSchedule) -> Self {
        Self::ScheduleReview(review)
    }
}

impl From<CorrectiveAction> for ModalPayload {
    fn from(action: CorrectiveAction) -> Self {
        Self::EditCorrectiveAction(action)
    }
}

impl From<Improvement> for ModalPayload {
    fn from(improvement: Improvement) -> Self {
        Self::EditImprovement(improvement)
    }
}

impl From<DetailsRef> for ModalPayload {
    fn from(details: DetailsRef) -> Self {
        Self::ViewDetails(details)
    }
}

/// Record types that can be pulled back out of a [`ModalPayload`]
pub trait PayloadFor: Sized {
    /// The kind whose payload is `Self`
    const KIND: ModalKind;

    fn extract(payload: &ModalPayload) -> Option<&Self>;
}

macro_rules! payload_for {
    ($ty:ty, $variant:ident) => {
        impl PayloadFor for $ty {
            const KIND: ModalKind = ModalKind::$variant;

            fn extract(payload: &ModalPayload) -> Option<&Self> {
                match payload {
                    ModalPayload::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

payload_for!(CorrectiveActionDraft, NewCorrectiveAction);
payload_for!(ImprovementDraft, NewImprovement);
payload_for!(ReviewSchedule, ScheduleReview);
payload_for!(CorrectiveAction, EditCorrectiveAction);
payload_for!(Improvement, EditImprovement);
payload_for!(DetailsRef, ViewDetails);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_matches_kind() {
        for kind in ModalKind::ALL {
            assert_eq!(ModalPayload::empty(*kind).kind(), *kind);
        }
    }

    #[test]
    fn test_from_value_typed() {
        let payload =
            ModalPayload::from_value(ModalKind::NewImprovement, json!({"title": "X"})).expect("decodes");
        let draft = ImprovementDraft::extract(&payload).expect("improvement draft");
        assert_eq!(draft.title, "X");
    }

    #[test]
    fn test_summary_labels() {
        let action = CorrectiveAction {
            id: "CAR-1".to_string(),
            ..Default::default()
        };
        assert_eq!(ModalPayload::from(action).summary(), "CAR-1");
        assert_eq!(ModalPayload::empty(ModalKind::ScheduleReview).summary(), "(empty)");
    }

    #[test]
    fn test_from_value_null_is_empty() {
        let payload =
            ModalPayload::from_value(ModalKind::ViewDetails, serde_json::Value::Null).expect("decodes");
        assert_eq!(payload, ModalPayload::empty(ModalKind::ViewDetails));
    }

    #[test]
    fn test_from_value_shape_mismatch() {
        let err = ModalPayload::from_value(ModalKind::ScheduleReview, json!({"date": "next tuesday"}))
            .unwrap_err();
        assert!(matches!(
            err,
            ModalError::InvalidPayload {
                kind: ModalKind::ScheduleReview,
                ..
            }
        ));
    }

    #[test]
    fn test_extract_wrong_shape() {
        let payload = ModalPayload::empty(ModalKind::EditImprovement);
        assert!(CorrectiveAction::extract(&payload).is_none());
        assert!(Improvement::extract(&payload).is_some());
    }
}
