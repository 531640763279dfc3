use super::case_record::CaseRecord;
use crate::domain::value_objects::{
    Actor, CaseKey, CaseStatus, Collection, MutationAction, OwnerEffect,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A user action about to be applied optimistically and submitted to the
/// backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationDraft {
    pub collection: Collection,
    pub action: MutationAction,
    pub key: CaseKey,
    pub body: Value,
}

impl MutationDraft {
    pub fn new(collection: Collection, action: MutationAction, key: CaseKey) -> Self {
        Self {
            collection,
            action,
            key,
            body: Value::Object(serde_json::Map::new()),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = body;
        self
    }

    /// The record this draft produces when applied optimistically over the
    /// current stored record. Fails when the action needs a record that does
    /// not exist.
    pub fn project(
        &self,
        prior: Option<&CaseRecord>,
        local_actor: &Actor,
    ) -> Result<CaseRecord, String> {
        let mut record = match prior {
            Some(existing) => existing.clone(),
            None => {
                if !self.action.creates_record() {
                    return Err(format!("No record for {} to {}", self.key, self.action));
                }
                CaseRecord::new(
                    self.key.clone(),
                    self.action.projected_status().unwrap_or(CaseStatus::Active),
                    Value::Object(serde_json::Map::new()),
                )
            }
        };

        if let Some(status) = self.action.projected_status() {
            record.status = status;
        }
        match self.action.owner_effect() {
            OwnerEffect::SetLocal => record.owner = Some(local_actor.clone()),
            OwnerEffect::Clear => record.owner = None,
            OwnerEffect::Keep => {}
        }
        // User input shows up immediately; the server echo confirms it later.
        if let (Value::Object(target), Value::Object(body)) = (&mut record.payload, &self.body) {
            for (field, value) in body {
                target.insert(field.clone(), value.clone());
            }
        }

        Ok(record)
    }
}
