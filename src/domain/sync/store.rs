use crate::domain::entities::CaseRecord;
use crate::domain::value_objects::CaseKey;
use std::collections::HashMap;

/// Outcome of an upsert attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Upsert {
    /// Write applied; `previous` is the replaced record, if any.
    Applied { previous: Option<CaseRecord> },
    /// Stored record carries a newer version; the write was dropped.
    Stale,
}

/// Authoritative client-side view of one collection. Plain map, no I/O, no
/// locking; the reconciler serializes access.
#[derive(Debug, Default)]
pub struct CaseStore {
    records: HashMap<CaseKey, CaseRecord>,
}

impl CaseStore {
    pub fn new() -> Self {
        Self {
            records: HashMap::new(),
        }
    }

    pub fn get(&self, key: &CaseKey) -> Option<&CaseRecord> {
        self.records.get(key)
    }

    /// Replaces the stored record only if `record.version >= stored.version`.
    /// Out-of-order writes with older versions are dropped.
    pub fn upsert(&mut self, record: CaseRecord) -> Upsert {
        if let Some(stored) = self.records.get(&record.key) {
            if record.version < stored.version {
                return Upsert::Stale;
            }
        }
        let previous = self.records.insert(record.key.clone(), record);
        Upsert::Applied { previous }
    }

    /// Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &CaseKey) -> Option<CaseRecord> {
        self.records.remove(key)
    }

    /// Puts a record back verbatim, bypassing the version guard. Only for
    /// rolling back an optimistic write to its exact pre-image.
    pub fn restore(&mut self, record: CaseRecord) -> Option<CaseRecord> {
        self.records.insert(record.key.clone(), record)
    }

    pub fn keys(&self) -> Vec<CaseKey> {
        self.records.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
