//! GRC records carried by modal dialogs.
//!
//! Plain data only. Every field is defaulted on deserialisation so an empty
//! object (`{}`) decodes into the record's empty form.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

// ═══════════════════════════════════════════════════════════════════════════════
// Shared Enums
// ═══════════════════════════════════════════════════════════════════════════════

/// Priority assigned to a corrective action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

/// Lifecycle of a corrective action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionStatus {
    #[default]
    Open,
    InProgress,
    Completed,
    Overdue,
}

/// Lifecycle of an improvement initiative
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ImprovementStatus {
    #[default]
    Planned,
    InProgress,
    Completed,
    OnHold,
}

/// Kind of review being scheduled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReviewType {
    #[default]
    Internal,
    External,
    Management,
}

/// Record families a details view can point at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    #[default]
    CorrectiveAction,
    Improvement,
    Policy,
    Risk,
    AuditFinding,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::CorrectiveAction => "corrective action",
            Self::Improvement => "improvement",
            Self::Policy => "policy",
            Self::Risk => "risk",
            Self::AuditFinding => "audit finding",
        };
        write!(f, "{name}")
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Corrective Actions
// ═══════════════════════════════════════════════════════════════════════════════

/// Fields entered when raising a corrective action
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectiveActionDraft {
    pub title: String,
    pub description: String,
    /// Audit finding or risk this action responds to (e.g. `FND-12`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finding_ref: Option<String>,
    pub owner: String,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
}

/// A corrective action already on the register (e.g. `CAR-1`)
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CorrectiveAction {
    pub id: String,
    #[serde(flatten)]
    pub draft: CorrectiveActionDraft,
    pub status: ActionStatus,
}

impl CorrectiveAction {
    pub fn new(id: impl Into<String>, draft: CorrectiveActionDraft) -> Self {
        Self {
            id: id.into(),
            draft,
            status: ActionStatus::Open,
        }
    }

    /// Whether the action is past its due date and not yet completed
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status != ActionStatus::Completed && self.draft.due_date.is_some_and(|due| due < today)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Improvements
// ═══════════════════════════════════════════════════════════════════════════════

/// Fields entered when proposing an improvement
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImprovementDraft {
    pub title: String,
    pub description: String,
    /// Framework area the improvement targets (e.g. "Access Control")
    pub category: String,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
}

/// An improvement tracked for readiness
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Improvement {
    pub id: String,
    #[serde(flatten)]
    pub draft: ImprovementDraft,
    pub status: ImprovementStatus,
    /// Completion percentage, 0–100
    progress: u8,
}

impl Improvement {
    pub fn new(id: impl Into<String>, draft: ImprovementDraft) -> Self {
        Self {
            id: id.into(),
            draft,
            status: ImprovementStatus::Planned,
            progress: 0,
        }
    }

    pub fn progress(&self) -> u8 {
        self.progress.min(100)
    }

    /// Set progress, clamping to 100
    pub fn set_progress(&mut self, percent: u8) {
        self.progress = percent.min(100);
        if self.progress == 100 {
            self.status = ImprovementStatus::Completed;
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Reviews & Details
// ═══════════════════════════════════════════════════════════════════════════════

/// A review to be put on the compliance calendar
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReviewSchedule {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    pub review_type: ReviewType,
    pub reviewer: String,
    pub scope: String,
    pub notes: String,
}

/// Pointer to a record shown read-only in the details view
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailsRef {
    pub record: RecordKind,
    pub id: String,
    pub title: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_decodes_to_default() {
        let action: CorrectiveAction = serde_json::from_str("{}").expect("empty object");
        assert_eq!(action, CorrectiveAction::default());

        let review: ReviewSchedule = serde_json::from_str("{}").expect("empty object");
        assert!(review.date.is_none());
    }

    #[test]
    fn test_flattened_draft_fields() {
        let action: CorrectiveAction = serde_json::from_str(
            r#"{"id":"CAR-1","title":"Rotate keys","priority":"high","status":"in-progress"}"#,
        )
        .expect("valid action");

        assert_eq!(action.id, "CAR-1");
        assert_eq!(action.draft.title, "Rotate keys");
        assert_eq!(action.draft.priority, Priority::High);
        assert_eq!(action.status, ActionStatus::InProgress);
    }

    #[test]
    fn test_review_date_parses() {
        let review: ReviewSchedule =
            serde_json::from_str(r#"{"date":"2024-12-15"}"#).expect("valid review");
        assert_eq!(review.date, NaiveDate::from_ymd_opt(2024, 12, 15));
    }

    #[test]
    fn test_progress_clamps() {
        let mut improvement = Improvement::new("IMP-4", ImprovementDraft::default());
        improvement.set_progress(140);
        assert_eq!(improvement.progress(), 100);
        assert_eq!(improvement.status, ImprovementStatus::Completed);
    }

    #[test]
    fn test_overdue() {
        let draft = CorrectiveActionDraft {
            due_date: NaiveDate::from_ymd_opt(2024, 1, 31),
            ..Default::default()
        };
        let mut action = CorrectiveAction::new("CAR-2", draft);
        let today = NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date");

        assert!(action.is_overdue(today));
        action.status = ActionStatus::Completed;
        assert!(!action.is_overdue(today));
    }
}
