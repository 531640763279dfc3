use super::case_record::CaseRecord;
use crate::domain::value_objects::{Actor, CaseKey};
use serde::{Deserialize, Serialize};

/// Verb of a realtime frame. Parsing is tolerant: verbs outside this set are
/// dropped at the transport boundary, never surfaced as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventVerb {
    Create,
    Update,
    Delete,
    BeginReview,
    EndReview,
}

impl EventVerb {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "create" => Some(EventVerb::Create),
            "update" => Some(EventVerb::Update),
            "delete" => Some(EventVerb::Delete),
            "begin-review" | "begin_review" => Some(EventVerb::BeginReview),
            "end-review" | "end_review" => Some(EventVerb::EndReview),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EventVerb::Create => "create",
            EventVerb::Update => "update",
            EventVerb::Delete => "delete",
            EventVerb::BeginReview => "begin-review",
            EventVerb::EndReview => "end-review",
        }
    }
}

/// A realtime event already normalized into domain terms. Raw wire field
/// names never reach the reconciler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelEvent {
    /// Stream the frame arrived on (`case`, `ping`).
    pub stream: String,
    pub verb: EventVerb,
    pub actor: Option<Actor>,
    pub key: CaseKey,
    /// Full record for create/update frames; delete and review frames carry
    /// only the key.
    pub record: Option<CaseRecord>,
}
