use crate::domain::value_objects::{Actor, CaseKey, CaseStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Which input last wrote a record. Drives suppression of realtime echoes of
/// the client's own optimistic actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WriteOrigin {
    Snapshot,
    Realtime,
    Optimistic,
}

/// Client-side view of one server-owned entity.
///
/// `version` is a local revision stamped by the reconciler on every applied
/// write; it is not a server field. `payload` carries the domain fields
/// (claimant, timestamps, comments) opaquely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseRecord {
    pub key: CaseKey,
    pub status: CaseStatus,
    pub owner: Option<Actor>,
    pub payload: Value,
    pub version: u64,
    pub origin: WriteOrigin,
    pub updated_at: DateTime<Utc>,
}

impl CaseRecord {
    pub fn new(key: CaseKey, status: CaseStatus, payload: Value) -> Self {
        Self {
            key,
            status,
            owner: None,
            payload,
            version: 0,
            origin: WriteOrigin::Snapshot,
            updated_at: Utc::now(),
        }
    }

    pub fn with_owner(mut self, owner: Actor) -> Self {
        self.owner = Some(owner);
        self
    }
}
