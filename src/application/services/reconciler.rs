use crate::domain::entities::{
    CaseRecord, ChannelEvent, EventVerb, RecordChange, StoreDiff, WriteOrigin,
};
use crate::domain::sync::CaseStore;
use crate::domain::value_objects::{Actor, CaseKey, Collection};
use crate::shared::error::{AppError, Result};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Handle for an in-flight optimistic mutation. Commit on transport success,
/// rollback on failure; either clears the suppression marker.
#[derive(Debug, Clone)]
pub struct OptimisticToken {
    id: Uuid,
    key: CaseKey,
}

/// Issued when a snapshot fetch starts. A gate is superseded as soon as a
/// newer fetch begins; applying through a superseded gate is a no-op.
#[derive(Debug, Clone, Copy)]
pub struct SnapshotGate {
    generation: u64,
    floor: u64,
}

#[derive(Debug)]
struct PendingMutation {
    id: Uuid,
    prior: Option<CaseRecord>,
    /// Version the optimistic write was stamped with; rollback only applies
    /// while the store still holds exactly that write.
    applied_version: u64,
    /// Set when the action takes the exclusive lock, so the matching
    /// begin-review echo can be recognized.
    claiming: bool,
    expires_at: Instant,
}

#[derive(Debug)]
struct ReconcilerInner {
    store: CaseStore,
    pending: HashMap<CaseKey, PendingMutation>,
    next_version: u64,
    snapshot_generation: u64,
}

impl ReconcilerInner {
    fn next_version(&mut self) -> u64 {
        let version = self.next_version;
        self.next_version += 1;
        version
    }

    fn sweep_expired(&mut self) {
        let now = Instant::now();
        self.pending.retain(|key, marker| {
            let alive = marker.expires_at > now;
            if !alive {
                tracing::debug!("Pending marker expired for {}", key);
            }
            alive
        });
    }

    fn pending_for(&self, key: &CaseKey) -> Option<&PendingMutation> {
        self.pending.get(key)
    }
}

/// Single merge authority for one collection. Snapshot loads, realtime
/// events, and optimistic mutations all pass through here; writes are
/// serialized behind the inner lock and every applied change comes back as a
/// `StoreDiff` for the projector.
pub struct Reconciler {
    collection: Collection,
    local_actor: Actor,
    optimistic_timeout: Duration,
    inner: RwLock<ReconcilerInner>,
}

impl Reconciler {
    pub fn new(collection: Collection, local_actor: Actor, optimistic_timeout: Duration) -> Self {
        Self {
            collection,
            local_actor,
            optimistic_timeout,
            inner: RwLock::new(ReconcilerInner {
                store: CaseStore::new(),
                pending: HashMap::new(),
                next_version: 1,
                snapshot_generation: 0,
            }),
        }
    }

    pub fn collection(&self) -> Collection {
        self.collection
    }

    /// Marks the start of a snapshot fetch. The returned gate carries the
    /// version floor for the fetched records; any local write applied after
    /// this point outranks them.
    pub async fn begin_snapshot(&self) -> SnapshotGate {
        let mut inner = self.inner.write().await;
        inner.snapshot_generation += 1;
        let floor = inner.next_version();
        SnapshotGate {
            generation: inner.snapshot_generation,
            floor,
        }
    }

    /// Merges a fetched snapshot. Returns None when the gate was superseded
    /// by a newer fetch; the caller must discard the result, not retry.
    ///
    /// Keys absent from the server are removed unless an optimistic mutation
    /// for them is still in flight. Records whose key was written locally
    /// after the fetch began lose the version race and are left untouched.
    pub async fn apply_snapshot(
        &self,
        gate: SnapshotGate,
        records: Vec<CaseRecord>,
    ) -> Option<StoreDiff> {
        let mut inner = self.inner.write().await;
        inner.sweep_expired();

        if gate.generation != inner.snapshot_generation {
            tracing::debug!(
                "Discarding superseded {} snapshot (generation {} < {})",
                self.collection,
                gate.generation,
                inner.snapshot_generation
            );
            return None;
        }

        let mut diff = StoreDiff::empty(self.collection);
        let server_keys: std::collections::HashSet<&CaseKey> =
            records.iter().map(|r| &r.key).collect();

        for key in inner.store.keys() {
            if server_keys.contains(&key) || inner.pending_for(&key).is_some() {
                continue;
            }
            if let Some(removed) = inner.store.remove(&key) {
                diff.removed.push(removed);
            }
        }

        for mut record in records {
            record.version = gate.floor;
            record.origin = WriteOrigin::Snapshot;
            let stored = inner.store.get(&record.key).cloned();
            match stored {
                None => {
                    inner.store.upsert(record.clone());
                    diff.added.push(record);
                }
                Some(stored) => {
                    if stored.version > gate.floor {
                        continue;
                    }
                    // List rows never name the lock holder; the owner set by
                    // a begin-review event survives the refresh.
                    if record.owner.is_none() {
                        record.owner = stored.owner.clone();
                    }
                    if stored.status == record.status
                        && stored.owner == record.owner
                        && stored.payload == record.payload
                    {
                        continue;
                    }
                    inner.store.upsert(record.clone());
                    diff.updated.push(RecordChange {
                        before: stored,
                        after: record,
                    });
                }
            }
        }

        tracing::debug!(
            "Applied {} snapshot: +{} ~{} -{}",
            self.collection,
            diff.added.len(),
            diff.updated.len(),
            diff.removed.len()
        );
        Some(diff)
    }

    /// Applies one realtime event. Unknown content is tolerated; the result
    /// is at worst an empty diff, never an error.
    pub async fn apply_event(&self, event: &ChannelEvent) -> StoreDiff {
        let mut inner = self.inner.write().await;
        inner.sweep_expired();
        let mut diff = StoreDiff::empty(self.collection);

        match event.verb {
            EventVerb::Create | EventVerb::Update => {
                let Some(record) = event.record.clone() else {
                    tracing::debug!("Ignoring {} event without record", event.verb.as_str());
                    return diff;
                };
                if event.verb == EventVerb::Create && self.is_self_echo(&inner, event) {
                    tracing::debug!("Suppressing self-echo create for {}", event.key);
                    return diff;
                }
                self.apply_record_write(&mut inner, record, &mut diff);
            }
            EventVerb::Delete => {
                inner.pending.remove(&event.key);
                match inner.store.remove(&event.key) {
                    Some(removed) => diff.removed.push(removed),
                    None => {
                        tracing::debug!("Delete for absent key {} ignored", event.key);
                    }
                }
            }
            EventVerb::BeginReview => {
                let Some(actor) = event.actor.clone() else {
                    tracing::debug!("Ignoring begin-review without actor for {}", event.key);
                    return diff;
                };
                if actor == self.local_actor && self.is_claim_echo(&inner, &event.key) {
                    tracing::debug!("Suppressing self-echo begin-review for {}", event.key);
                    return diff;
                }
                self.set_owner(&mut inner, &event.key, Some(actor), &mut diff);
            }
            EventVerb::EndReview => {
                self.set_owner(&mut inner, &event.key, None, &mut diff);
            }
        }

        diff
    }

    /// Applies a proposed record immediately and marks its key pending.
    /// `claiming` flags lock-taking actions so their begin-review echo is
    /// recognized. Fails when another mutation for the key is in flight.
    pub async fn begin_mutation(
        &self,
        mut proposed: CaseRecord,
        claiming: bool,
    ) -> Result<(OptimisticToken, StoreDiff)> {
        let mut inner = self.inner.write().await;
        inner.sweep_expired();

        if inner.pending_for(&proposed.key).is_some() {
            return Err(AppError::ValidationError(format!(
                "Another action for {} is still in flight",
                proposed.key
            )));
        }

        let prior = inner.store.get(&proposed.key).cloned();
        proposed.version = inner.next_version();
        proposed.origin = WriteOrigin::Optimistic;

        let token = OptimisticToken {
            id: Uuid::new_v4(),
            key: proposed.key.clone(),
        };
        inner.pending.insert(
            proposed.key.clone(),
            PendingMutation {
                id: token.id,
                prior: prior.clone(),
                applied_version: proposed.version,
                claiming,
                expires_at: Instant::now() + self.optimistic_timeout,
            },
        );

        let mut diff = StoreDiff::empty(self.collection);
        inner.store.upsert(proposed.clone());
        match prior {
            None => diff.added.push(proposed),
            Some(before) => diff.updated.push(RecordChange {
                before,
                after: proposed,
            }),
        }

        Ok((token, diff))
    }

    /// Transport succeeded: clear the suppression marker. Later echoes for
    /// the key are applied normally. The record itself is left for the
    /// server's echo or the next snapshot to confirm.
    pub async fn commit(&self, token: &OptimisticToken) {
        let mut inner = self.inner.write().await;
        let is_ours = inner
            .pending_for(&token.key)
            .map(|marker| marker.id == token.id)
            .unwrap_or(false);
        if is_ours {
            inner.pending.remove(&token.key);
        } else {
            tracing::debug!("Commit for {} found no live marker", token.key);
        }
    }

    /// Transport failed: restore the exact pre-mutation record, or remove
    /// the key if the mutation created it. If a newer server write already
    /// replaced the optimistic record, the store is left alone.
    pub async fn rollback(&self, token: &OptimisticToken) -> StoreDiff {
        let mut inner = self.inner.write().await;
        let mut diff = StoreDiff::empty(self.collection);

        let is_ours = inner
            .pending_for(&token.key)
            .map(|marker| marker.id == token.id)
            .unwrap_or(false);
        let marker = if is_ours {
            inner.pending.remove(&token.key)
        } else {
            None
        };
        let Some(marker) = marker else {
            tracing::warn!("Rollback for {} found no live marker", token.key);
            return diff;
        };

        let current = inner.store.get(&token.key).cloned();
        let still_ours = current
            .as_ref()
            .map(|r| r.version == marker.applied_version)
            .unwrap_or(false);
        if !still_ours {
            tracing::debug!("Rollback for {} skipped, store already overwritten", token.key);
            return diff;
        }

        match marker.prior {
            Some(prev) => {
                inner.store.restore(prev.clone());
                diff.updated.push(RecordChange {
                    before: current.unwrap_or_else(|| prev.clone()),
                    after: prev,
                });
            }
            None => {
                if let Some(removed) = inner.store.remove(&token.key) {
                    diff.removed.push(removed);
                }
            }
        }

        diff
    }

    pub async fn record(&self, key: &CaseKey) -> Option<CaseRecord> {
        self.inner.read().await.store.get(key).cloned()
    }

    pub async fn keys(&self) -> Vec<CaseKey> {
        self.inner.read().await.store.keys()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.store.len()
    }

    fn is_self_echo(&self, inner: &ReconcilerInner, event: &ChannelEvent) -> bool {
        let from_local = event
            .actor
            .as_ref()
            .map(|a| *a == self.local_actor)
            .unwrap_or(false);
        from_local && inner.pending_for(&event.key).is_some()
    }

    fn is_claim_echo(&self, inner: &ReconcilerInner, key: &CaseKey) -> bool {
        inner
            .pending_for(key)
            .map(|marker| marker.claiming)
            .unwrap_or(false)
    }

    fn apply_record_write(
        &self,
        inner: &mut ReconcilerInner,
        mut record: CaseRecord,
        diff: &mut StoreDiff,
    ) {
        let stored = inner.store.get(&record.key).cloned();
        // Lock changes travel on the review verbs; a plain update without an
        // owner keeps the one we know about.
        if record.owner.is_none() {
            if let Some(stored) = &stored {
                record.owner = stored.owner.clone();
            }
        }
        record.version = inner.next_version();
        record.origin = WriteOrigin::Realtime;
        inner.store.upsert(record.clone());
        match stored {
            None => diff.added.push(record),
            Some(before) => diff.updated.push(RecordChange {
                before,
                after: record,
            }),
        }
    }

    fn set_owner(
        &self,
        inner: &mut ReconcilerInner,
        key: &CaseKey,
        owner: Option<Actor>,
        diff: &mut StoreDiff,
    ) {
        let Some(stored) = inner.store.get(key).cloned() else {
            tracing::debug!("Review event for unknown key {} ignored", key);
            return;
        };
        if stored.owner == owner {
            return;
        }
        let mut updated = stored.clone();
        updated.owner = owner;
        updated.version = inner.next_version();
        updated.origin = WriteOrigin::Realtime;
        inner.store.upsert(updated.clone());
        diff.updated.push(RecordChange {
            before: stored,
            after: updated,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::CaseStatus;
    use serde_json::json;

    fn key(value: &str) -> CaseKey {
        CaseKey::new(value.to_string()).unwrap()
    }

    fn actor(name: &str) -> Actor {
        Actor::new(name.to_string()).unwrap()
    }

    fn record(key_str: &str, status: CaseStatus) -> CaseRecord {
        CaseRecord::new(
            key(key_str),
            status,
            json!({"casenum": key_str, "username": "bob"}),
        )
    }

    fn create_event(key_str: &str, by: &str) -> ChannelEvent {
        ChannelEvent {
            stream: "case".to_string(),
            verb: EventVerb::Create,
            actor: Some(actor(by)),
            key: key(key_str),
            record: Some(record(key_str, CaseStatus::Active)),
        }
    }

    fn reconciler() -> Reconciler {
        Reconciler::new(
            Collection::ActiveClaims,
            actor("alice"),
            Duration::from_secs(10),
        )
    }

    #[tokio::test]
    async fn test_snapshot_populates_empty_store() {
        let rec = reconciler();
        let gate = rec.begin_snapshot().await;
        let diff = rec
            .apply_snapshot(gate, vec![record("C100", CaseStatus::Active)])
            .await
            .unwrap();

        assert_eq!(diff.added.len(), 1);
        assert!(diff.updated.is_empty() && diff.removed.is_empty());
        assert_eq!(rec.len().await, 1);
    }

    #[tokio::test]
    async fn test_snapshot_and_realtime_create_coexist() {
        let rec = reconciler();
        let gate = rec.begin_snapshot().await;
        rec.apply_snapshot(gate, vec![record("C100", CaseStatus::Active)])
            .await
            .unwrap();

        let diff = rec.apply_event(&create_event("C200", "bob")).await;
        assert_eq!(diff.added.len(), 1);

        let mut keys: Vec<String> = rec.keys().await.into_iter().map(String::from).collect();
        keys.sort();
        assert_eq!(keys, vec!["C100".to_string(), "C200".to_string()]);
    }

    #[tokio::test]
    async fn test_delete_for_absent_key_is_a_noop() {
        let rec = reconciler();
        let event = ChannelEvent {
            stream: "case".to_string(),
            verb: EventVerb::Delete,
            actor: Some(actor("bob")),
            key: key("C999"),
            record: None,
        };
        let diff = rec.apply_event(&event).await;
        assert!(diff.is_empty());
        assert_eq!(rec.len().await, 0);
    }

    #[tokio::test]
    async fn test_self_echo_create_is_suppressed() {
        let rec = reconciler();
        let proposed = record("C300", CaseStatus::Active);
        let (_token, _diff) = rec.begin_mutation(proposed, true).await.unwrap();

        let diff = rec.apply_event(&create_event("C300", "alice")).await;
        assert!(diff.is_empty());
        assert_eq!(rec.len().await, 1);

        let stored = rec.record(&key("C300")).await.unwrap();
        assert_eq!(stored.origin, WriteOrigin::Optimistic);
    }

    #[tokio::test]
    async fn test_create_from_another_actor_is_not_suppressed() {
        let rec = reconciler();
        let (_token, _) = rec
            .begin_mutation(record("C300", CaseStatus::Active), false)
            .await
            .unwrap();

        let diff = rec.apply_event(&create_event("C300", "bob")).await;
        assert_eq!(diff.updated.len(), 1);
        let stored = rec.record(&key("C300")).await.unwrap();
        assert_eq!(stored.origin, WriteOrigin::Realtime);
    }

    #[tokio::test]
    async fn test_stale_snapshot_loses_to_later_realtime_update() {
        let rec = reconciler();
        let first = rec.begin_snapshot().await;
        rec.apply_snapshot(first, vec![record("C100", CaseStatus::Active)])
            .await
            .unwrap();

        // Fetch starts, then an event lands before the response is merged.
        let slow = rec.begin_snapshot().await;
        let event = ChannelEvent {
            stream: "case".to_string(),
            verb: EventVerb::Update,
            actor: Some(actor("bob")),
            key: key("C100"),
            record: Some(record("C100", CaseStatus::Complete)),
        };
        rec.apply_event(&event).await;

        let diff = rec
            .apply_snapshot(slow, vec![record("C100", CaseStatus::Active)])
            .await
            .unwrap();
        assert!(diff.is_empty());
        assert_eq!(
            rec.record(&key("C100")).await.unwrap().status,
            CaseStatus::Complete
        );
    }

    #[tokio::test]
    async fn test_superseded_snapshot_is_discarded() {
        let rec = reconciler();
        let old_gate = rec.begin_snapshot().await;
        let new_gate = rec.begin_snapshot().await;

        assert!(rec
            .apply_snapshot(old_gate, vec![record("C100", CaseStatus::Active)])
            .await
            .is_none());

        let diff = rec
            .apply_snapshot(new_gate, vec![record("C200", CaseStatus::Active)])
            .await
            .unwrap();
        assert_eq!(diff.added.len(), 1);
        assert!(rec.record(&key("C100")).await.is_none());
    }

    #[tokio::test]
    async fn test_snapshot_removes_missing_keys_but_keeps_pending_ones() {
        let rec = reconciler();
        let gate = rec.begin_snapshot().await;
        rec.apply_snapshot(
            gate,
            vec![
                record("C100", CaseStatus::Active),
                record("C200", CaseStatus::Active),
            ],
        )
        .await
        .unwrap();

        let (_token, _) = rec
            .begin_mutation(record("C300", CaseStatus::Active), false)
            .await
            .unwrap();

        let gate = rec.begin_snapshot().await;
        let diff = rec
            .apply_snapshot(gate, vec![record("C100", CaseStatus::Active)])
            .await
            .unwrap();

        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.removed[0].key, key("C200"));
        assert!(rec.record(&key("C300")).await.is_some());
    }

    #[tokio::test]
    async fn test_rollback_restores_prior_record_exactly() {
        let rec = reconciler();
        let gate = rec.begin_snapshot().await;
        rec.apply_snapshot(gate, vec![record("C100", CaseStatus::Active)])
            .await
            .unwrap();
        let prior = rec.record(&key("C100")).await.unwrap();

        let mut proposed = prior.clone();
        proposed.status = CaseStatus::Complete;
        let (token, _) = rec.begin_mutation(proposed, false).await.unwrap();
        assert_eq!(
            rec.record(&key("C100")).await.unwrap().status,
            CaseStatus::Complete
        );

        let diff = rec.rollback(&token).await;
        assert_eq!(diff.updated.len(), 1);
        assert_eq!(rec.record(&key("C100")).await.unwrap(), prior);
    }

    #[tokio::test]
    async fn test_rollback_removes_record_the_mutation_created() {
        let rec = reconciler();
        let (token, _) = rec
            .begin_mutation(record("C300", CaseStatus::Active), false)
            .await
            .unwrap();

        let diff = rec.rollback(&token).await;
        assert_eq!(diff.removed.len(), 1);
        assert!(rec.record(&key("C300")).await.is_none());
    }

    #[tokio::test]
    async fn test_rollback_leaves_newer_server_write_alone() {
        let rec = reconciler();
        let (token, _) = rec
            .begin_mutation(record("C300", CaseStatus::Active), false)
            .await
            .unwrap();

        // Server state arrives from another actor before our call fails.
        rec.apply_event(&create_event("C300", "bob")).await;

        let diff = rec.rollback(&token).await;
        assert!(diff.is_empty());
        let stored = rec.record(&key("C300")).await.unwrap();
        assert_eq!(stored.origin, WriteOrigin::Realtime);
    }

    #[tokio::test]
    async fn test_commit_clears_marker_so_later_echo_applies() {
        let rec = reconciler();
        let (token, _) = rec
            .begin_mutation(record("C300", CaseStatus::Active), false)
            .await
            .unwrap();
        rec.commit(&token).await;

        let diff = rec.apply_event(&create_event("C300", "alice")).await;
        assert_eq!(diff.updated.len(), 1);
        assert_eq!(rec.len().await, 1);
        assert_eq!(
            rec.record(&key("C300")).await.unwrap().origin,
            WriteOrigin::Realtime
        );
    }

    #[tokio::test]
    async fn test_expired_marker_no_longer_suppresses() {
        let rec = Reconciler::new(Collection::ActiveClaims, actor("alice"), Duration::ZERO);
        let (_token, _) = rec
            .begin_mutation(record("C300", CaseStatus::Active), false)
            .await
            .unwrap();

        let diff = rec.apply_event(&create_event("C300", "alice")).await;
        assert_eq!(diff.updated.len(), 1);
    }

    #[tokio::test]
    async fn test_begin_review_locks_and_self_echo_is_suppressed() {
        let rec = Reconciler::new(
            Collection::ReviewedClaims,
            actor("lead1"),
            Duration::from_secs(10),
        );
        let gate = rec.begin_snapshot().await;
        rec.apply_snapshot(gate, vec![record("17", CaseStatus::PingedHigh)])
            .await
            .unwrap();

        // Remote lead takes the lock.
        let event = ChannelEvent {
            stream: "ping".to_string(),
            verb: EventVerb::BeginReview,
            actor: Some(actor("lead2")),
            key: key("17"),
            record: None,
        };
        let diff = rec.apply_event(&event).await;
        assert_eq!(diff.updated.len(), 1);
        assert_eq!(
            rec.record(&key("17")).await.unwrap().owner,
            Some(actor("lead2"))
        );

        // Release, then take it locally; our own echo must not double-apply.
        let release = ChannelEvent {
            verb: EventVerb::EndReview,
            ..event.clone()
        };
        rec.apply_event(&release).await;

        let mut proposed = rec.record(&key("17")).await.unwrap();
        proposed.owner = Some(actor("lead1"));
        let (_token, _) = rec.begin_mutation(proposed, true).await.unwrap();

        let echo = ChannelEvent {
            verb: EventVerb::BeginReview,
            actor: Some(actor("lead1")),
            ..event
        };
        let diff = rec.apply_event(&echo).await;
        assert!(diff.is_empty());
        assert_eq!(
            rec.record(&key("17")).await.unwrap().owner,
            Some(actor("lead1"))
        );
    }

    #[tokio::test]
    async fn test_second_mutation_for_same_key_is_rejected_while_pending() {
        let rec = reconciler();
        let (_token, _) = rec
            .begin_mutation(record("C300", CaseStatus::Active), false)
            .await
            .unwrap();

        let err = rec
            .begin_mutation(record("C300", CaseStatus::Complete), false)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(_)));
    }

    #[tokio::test]
    async fn test_update_without_owner_keeps_the_known_lock() {
        let rec = Reconciler::new(
            Collection::ReviewedClaims,
            actor("lead1"),
            Duration::from_secs(10),
        );
        let gate = rec.begin_snapshot().await;
        rec.apply_snapshot(gate, vec![record("17", CaseStatus::PingedLow)])
            .await
            .unwrap();

        let lock = ChannelEvent {
            stream: "ping".to_string(),
            verb: EventVerb::BeginReview,
            actor: Some(actor("lead2")),
            key: key("17"),
            record: None,
        };
        rec.apply_event(&lock).await;

        let update = ChannelEvent {
            stream: "ping".to_string(),
            verb: EventVerb::Update,
            actor: Some(actor("lead2")),
            key: key("17"),
            record: Some(record("17", CaseStatus::Acknowledged)),
        };
        rec.apply_event(&update).await;

        let stored = rec.record(&key("17")).await.unwrap();
        assert_eq!(stored.status, CaseStatus::Acknowledged);
        assert_eq!(stored.owner, Some(actor("lead2")));
    }

    #[tokio::test]
    async fn test_snapshot_refresh_keeps_held_review_lock() {
        let rec = Reconciler::new(
            Collection::ReviewedClaims,
            actor("lead1"),
            Duration::from_secs(10),
        );
        let gate = rec.begin_snapshot().await;
        rec.apply_snapshot(gate, vec![record("17", CaseStatus::PingedHigh)])
            .await
            .unwrap();

        let lock = ChannelEvent {
            stream: "ping".to_string(),
            verb: EventVerb::BeginReview,
            actor: Some(actor("lead2")),
            key: key("17"),
            record: None,
        };
        rec.apply_event(&lock).await;

        // Periodic refresh returns the same row without an owner field.
        let gate = rec.begin_snapshot().await;
        let diff = rec
            .apply_snapshot(gate, vec![record("17", CaseStatus::PingedHigh)])
            .await
            .unwrap();

        assert!(diff.is_empty());
        assert_eq!(
            rec.record(&key("17")).await.unwrap().owner,
            Some(actor("lead2"))
        );
    }
}
