use super::case_record::CaseRecord;
use crate::domain::value_objects::Collection;
use serde::{Deserialize, Serialize};

/// A single in-place record update, with the pre-image kept so the projector
/// can detect section moves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordChange {
    pub before: CaseRecord,
    pub after: CaseRecord,
}

/// Minimal description of what one reconciler operation changed. The
/// projector consumes this; nothing downstream re-reads the whole store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreDiff {
    pub collection: Collection,
    pub added: Vec<CaseRecord>,
    pub updated: Vec<RecordChange>,
    pub removed: Vec<CaseRecord>,
}

impl StoreDiff {
    pub fn empty(collection: Collection) -> Self {
        Self {
            collection,
            added: Vec::new(),
            updated: Vec::new(),
            removed: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.updated.len() + self.removed.len()
    }
}
