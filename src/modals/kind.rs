//! Registered modal identities.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ModalError;

/// Every modal the dashboard can open. "Nothing open" is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModalKind {
    NewCorrectiveAction,
    NewImprovement,
    ScheduleReview,
    EditCorrectiveAction,
    EditImprovement,
    ViewDetails,
}

impl ModalKind {
    /// All registered kinds
    pub const ALL: &'static [ModalKind] = &[
        ModalKind::NewCorrectiveAction,
        ModalKind::NewImprovement,
        ModalKind::ScheduleReview,
        ModalKind::EditCorrectiveAction,
        ModalKind::EditImprovement,
        ModalKind::ViewDetails,
    ];

    /// Stable identifier used by scripts and logs
    pub const fn id(&self) -> &'static str {
        match self {
            Self::NewCorrectiveAction => "new-corrective-action",
            Self::NewImprovement => "new-improvement",
            Self::ScheduleReview => "schedule-review",
            Self::EditCorrectiveAction => "edit-corrective-action",
            Self::EditImprovement => "edit-improvement",
            Self::ViewDetails => "view-details",
        }
    }

    /// Dialog title
    pub const fn title(&self) -> &'static str {
        match self {
            Self::NewCorrectiveAction => "New Corrective Action",
            Self::NewImprovement => "New Improvement",
            Self::ScheduleReview => "Schedule Review",
            Self::EditCorrectiveAction => "Edit Corrective Action",
            Self::EditImprovement => "Edit Improvement",
            Self::ViewDetails => "Details",
        }
    }

    /// Whether the dialog submits anything (details is read-only)
    pub const fn is_submittable(&self) -> bool {
        !matches!(self, Self::ViewDetails)
    }

    pub fn all_ids() -> Vec<&'static str> {
        Self::ALL.iter().map(Self::id).collect()
    }
}

impl FromStr for ModalKind {
    type Err = ModalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");

        Self::ALL
            .iter()
            .find(|kind| kind.id() == normalized)
            .copied()
            .ok_or_else(|| ModalError::InvalidModalKind(s.to_string()))
    }
}

impl fmt::Display for ModalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_parse_back() {
        for kind in ModalKind::ALL {
            assert_eq!(kind.id().parse::<ModalKind>().ok(), Some(*kind));
        }
    }

    #[test]
    fn test_snake_case_alias() {
        assert_eq!(
            "schedule_review".parse::<ModalKind>().ok(),
            Some(ModalKind::ScheduleReview)
        );
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let err = "delete-everything".parse::<ModalKind>().unwrap_err();
        assert!(matches!(err, ModalError::InvalidModalKind(ref k) if k == "delete-everything"));
    }

    #[test]
    fn test_serde_matches_ids() {
        let json = serde_json::to_string(&ModalKind::EditImprovement).expect("serialize");
        assert_eq!(json, "\"edit-improvement\"");
    }
}
