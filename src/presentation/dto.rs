use crate::domain::entities::{CaseRecord, MutationDraft};
use crate::domain::sync::can_act;
use crate::domain::value_objects::Actor;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Rendered sections of the dashboard. Pings split into tabs by review
/// progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionId {
    Active,
    Completed,
    PingsPending,
    PingsAcknowledged,
    PingsResolved,
}

impl SectionId {
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionId::Active => "active",
            SectionId::Completed => "completed",
            SectionId::PingsPending => "pings-pending",
            SectionId::PingsAcknowledged => "pings-acknowledged",
            SectionId::PingsResolved => "pings-resolved",
        }
    }
}

/// Reviewer comment split into its free-text half and the optional to-do
/// half. Reviewers separate the two with a literal "To Do:" paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PingDetail {
    pub description: String,
    pub todo: Option<String>,
}

const TODO_DELIMITER: &str = "\n\nTo Do:";

impl PingDetail {
    pub fn from_comment(comment: &str) -> Self {
        match comment.split_once(TODO_DELIMITER) {
            Some((description, todo)) => Self {
                description: description.trim().to_string(),
                todo: Some(todo.trim().to_string()).filter(|t| !t.is_empty()),
            },
            None => Self {
                description: comment.trim().to_string(),
                todo: None,
            },
        }
    }
}

/// Presentation form of one record. Everything the shell needs to draw a
/// card without reaching back into the store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardView {
    pub key: String,
    pub title: String,
    pub status: String,
    pub severity: Option<String>,
    pub owner: Option<String>,
    pub claimant: Option<String>,
    pub raised_by: Option<String>,
    /// Whether the local actor may use this card's action buttons.
    pub actionable: bool,
    pub detail: Option<PingDetail>,
    pub updated_at: DateTime<Utc>,
}

impl CardView {
    pub fn from_record(record: &CaseRecord, local_actor: &Actor) -> Self {
        let payload = &record.payload;
        Self {
            key: record.key.to_string(),
            title: payload_str(payload, &["casenum"])
                .unwrap_or_else(|| record.key.to_string()),
            status: record.status.to_string(),
            severity: record.status.severity().map(|s| s.label().to_string()),
            owner: record.owner.as_ref().map(|a| a.to_string()),
            claimant: payload_str(payload, &["username"])
                .or_else(|| payload_str(payload, &["claimant"])),
            raised_by: payload_str(payload, &["lead_id", "username"]),
            actionable: can_act(record, local_actor),
            detail: payload_str(payload, &["comment"])
                .map(|comment| PingDetail::from_comment(&comment)),
            updated_at: record.updated_at,
        }
    }
}

fn payload_str(payload: &Value, path: &[&str]) -> Option<String> {
    let mut current = payload;
    for segment in path {
        current = current.get(segment)?;
    }
    current.as_str().map(|s| s.to_string())
}

/// Targeted render operation. The shell patches the named section only;
/// unaffected elements are never rebuilt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderOp {
    Insert { section: SectionId, card: CardView },
    Update { section: SectionId, card: CardView },
    Remove { section: SectionId, key: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    Warning,
    Error,
}

/// User-facing message, shown inline near the affected action. `retry`
/// carries the failed draft when the user should be offered a retry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserNotice {
    pub kind: NoticeKind,
    pub message: String,
    pub retry: Option<MutationDraft>,
}

impl UserNotice {
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Warning,
            message: message.into(),
            retry: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            retry: None,
        }
    }

    pub fn retryable(message: impl Into<String>, draft: MutationDraft) -> Self {
        Self {
            kind: NoticeKind::Error,
            message: message.into(),
            retry: Some(draft),
        }
    }
}
