use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-owned entity collections the engine keeps in sync. Each runs its
/// own reconciler; snapshot removal is only meaningful within the collection
/// that was fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    ActiveClaims,
    CompletedClaims,
    ReviewedClaims,
}

impl Collection {
    pub fn all() -> [Collection; 3] {
        [
            Collection::ActiveClaims,
            Collection::CompletedClaims,
            Collection::ReviewedClaims,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::ActiveClaims => "activeclaim",
            Collection::CompletedClaims => "completeclaim",
            Collection::ReviewedClaims => "reviewedclaim",
        }
    }

    pub fn list_path(&self) -> String {
        format!("/api/{}/list/", self.as_str())
    }

    /// Realtime stream (`type` field of channel frames) feeding this
    /// collection. Case events fan out to both claim collections.
    pub fn stream(&self) -> &'static str {
        match self {
            Collection::ActiveClaims | Collection::CompletedClaims => "case",
            Collection::ReviewedClaims => "ping",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
