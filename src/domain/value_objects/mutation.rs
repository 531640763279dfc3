use super::case_status::CaseStatus;
use super::role::Role;
use serde::{Deserialize, Serialize};
use std::fmt;

/// User actions submitted through the engine. Wire names follow the backend's
/// action paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationAction {
    Claim,
    Complete,
    Release,
    Acknowledge,
    Resolve,
    Unping,
    BeginReview,
    EndReview,
}

/// What a mutation does to the record's exclusive lock when applied
/// optimistically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerEffect {
    Keep,
    SetLocal,
    Clear,
}

impl MutationAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            MutationAction::Claim => "claim",
            MutationAction::Complete => "complete",
            MutationAction::Release => "unclaim",
            MutationAction::Acknowledge => "acknowledge",
            MutationAction::Resolve => "resolve",
            MutationAction::Unping => "unping",
            MutationAction::BeginReview => "begin-review",
            MutationAction::EndReview => "end-review",
        }
    }

    /// Minimum role allowed to perform the action. Claim lifecycle is open to
    /// technicians; review actions require a lead.
    pub fn minimum_role(&self) -> Role {
        match self {
            MutationAction::Claim | MutationAction::Complete | MutationAction::Release => {
                Role::Tech
            }
            MutationAction::Acknowledge
            | MutationAction::Resolve
            | MutationAction::Unping
            | MutationAction::BeginReview
            | MutationAction::EndReview => Role::Lead,
        }
    }

    /// Status the record takes when the action is applied optimistically.
    /// None leaves the status untouched.
    pub fn projected_status(&self) -> Option<CaseStatus> {
        match self {
            MutationAction::Claim => Some(CaseStatus::Active),
            MutationAction::Complete => Some(CaseStatus::Complete),
            MutationAction::Acknowledge => Some(CaseStatus::Acknowledged),
            MutationAction::Resolve => Some(CaseStatus::Resolved),
            MutationAction::Unping => Some(CaseStatus::Unpinged),
            MutationAction::Release | MutationAction::BeginReview | MutationAction::EndReview => {
                None
            }
        }
    }

    pub fn owner_effect(&self) -> OwnerEffect {
        match self {
            MutationAction::Claim | MutationAction::BeginReview => OwnerEffect::SetLocal,
            MutationAction::Release | MutationAction::EndReview => OwnerEffect::Clear,
            _ => OwnerEffect::Keep,
        }
    }

    /// Actions that may create a record not yet in the store.
    pub fn creates_record(&self) -> bool {
        matches!(self, MutationAction::Claim)
    }

    /// Actions that take the exclusive review lock and therefore set the
    /// local claiming marker for self-echo suppression.
    pub fn takes_lock(&self) -> bool {
        matches!(self, MutationAction::Claim | MutationAction::BeginReview)
    }
}

impl fmt::Display for MutationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
