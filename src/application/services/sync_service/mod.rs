
use crate::application::ports::channel::{ChannelSignal, RealtimeChannel};
use crate::application::ports::transport::{CaseTransport, TransportError};
use crate::application::ports::view::ViewSink;
use crate::application::services::reconciler::Reconciler;
use crate::domain::entities::{ChannelEvent, MutationDraft, StoreDiff};
use crate::domain::sync::can_act;
use crate::domain::value_objects::{Actor, CaseKey, Collection, Role};
use crate::presentation::dto::UserNotice;
use crate::presentation::projector::SectionProjector;
use crate::shared::config::SyncConfig;
use crate::shared::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, RwLock};

const FAILURE_LOG_CAP: usize = 100;

#[async_trait]
pub trait SyncServiceTrait: Send + Sync {
    /// Initial snapshots, then the realtime subscription. Idempotent startup
    /// is not supported; call once.
    async fn start(&self) -> Result<()>;

    /// Force-fetch one collection and apply the result unless superseded.
    async fn refresh(&self, collection: Collection) -> Result<()>;

    /// Validate, apply optimistically, submit, then commit or roll back.
    async fn submit(&self, draft: MutationDraft) -> Result<()>;

    /// Most recent transport failures, oldest first.
    async fn recent_failures(&self) -> Vec<String>;

    async fn record(&self, collection: Collection, key: &CaseKey)
        -> Option<crate::domain::entities::CaseRecord>;
}

/// Orchestrates the sync loop for all collections: snapshots in, realtime
/// events in, optimistic mutations out, render operations to the shell.
/// All collaborators are injected; the actor identity is explicit.
pub struct SyncService {
    transport: Arc<dyn CaseTransport>,
    channel: Arc<dyn RealtimeChannel>,
    sink: Arc<dyn ViewSink>,
    projector: SectionProjector,
    reconcilers: HashMap<Collection, Arc<Reconciler>>,
    local_actor: Actor,
    local_role: Role,
    sync: SyncConfig,
    failures: Arc<RwLock<VecDeque<String>>>,
}

impl SyncService {
    pub fn new(
        transport: Arc<dyn CaseTransport>,
        channel: Arc<dyn RealtimeChannel>,
        sink: Arc<dyn ViewSink>,
        local_actor: Actor,
        local_role: Role,
        sync: SyncConfig,
    ) -> Self {
        let timeout = Duration::from_secs(sync.optimistic_timeout);
        let reconcilers = Collection::all()
            .into_iter()
            .map(|collection| {
                (
                    collection,
                    Arc::new(Reconciler::new(collection, local_actor.clone(), timeout)),
                )
            })
            .collect();

        Self {
            transport,
            channel,
            sink,
            projector: SectionProjector::new(local_actor.clone()),
            reconcilers,
            local_actor,
            local_role,
            sync,
            failures: Arc::new(RwLock::new(VecDeque::new())),
        }
    }

    pub fn collections(&self) -> Vec<Collection> {
        Collection::all()
            .into_iter()
            .filter(|c| self.reconcilers.contains_key(c))
            .collect()
    }

    fn reconciler(&self, collection: Collection) -> Result<&Arc<Reconciler>> {
        self.reconcilers.get(&collection).ok_or_else(|| {
            AppError::ConfigurationError(format!("No reconciler for {}", collection))
        })
    }

    async fn emit(&self, diff: &StoreDiff) {
        if diff.is_empty() {
            return;
        }
        let ops = self.projector.project(diff);
        if !ops.is_empty() {
            self.sink.apply(ops).await;
        }
    }

    async fn handle_event(&self, event: &ChannelEvent) {
        for collection in self.collections() {
            if collection.stream() != event.stream {
                continue;
            }
            if let Ok(reconciler) = self.reconciler(collection) {
                let diff = reconciler.apply_event(event).await;
                self.emit(&diff).await;
            }
        }
    }

    async fn record_failure(&self, err: &TransportError) {
        let mut failures = self.failures.write().await;
        if failures.len() == FAILURE_LOG_CAP {
            failures.pop_front();
        }
        failures.push_back(err.to_string());
    }

    /// Message wording users actually see, per failure class.
    fn friendly_message(err: &TransportError) -> String {
        match err {
            TransportError::Network(_) => {
                "Connection problem. Please check your network and try again.".to_string()
            }
            TransportError::Auth { .. } => {
                "Your session has expired. Please log in again.".to_string()
            }
            TransportError::Conflict { .. } => {
                "This item was changed by someone else. The view has been refreshed.".to_string()
            }
            TransportError::Server { .. } | TransportError::Decode(_) => {
                "The server ran into a problem. Please try again shortly.".to_string()
            }
        }
    }

    fn spawn_channel_loop(&self, mut rx: mpsc::Receiver<ChannelSignal>) {
        let service = self.clone();
        tokio::spawn(async move {
            while let Some(signal) = rx.recv().await {
                match signal {
                    ChannelSignal::Connected => {
                        tracing::info!("Realtime channel connected; refreshing all collections");
                        for collection in service.collections() {
                            if let Err(e) = service.refresh(collection).await {
                                tracing::warn!(
                                    "Refresh after (re)connect failed for {}: {}",
                                    collection,
                                    e
                                );
                            }
                        }
                    }
                    ChannelSignal::Event(event) => {
                        service.handle_event(&event).await;
                    }
                    ChannelSignal::Closed => {
                        tracing::warn!("Realtime channel exhausted its reconnect attempts");
                        service
                            .sink
                            .notify(UserNotice::warning(
                                "Live updates are unavailable. The view may be stale.",
                            ))
                            .await;
                    }
                }
            }
        });
    }

    fn schedule_refresh(&self, interval_secs: u64) {
        let service = self.clone();
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(tokio::time::Duration::from_secs(interval_secs));

            loop {
                interval.tick().await;

                for collection in service.collections() {
                    if let Err(e) = service.refresh(collection).await {
                        tracing::error!("Scheduled refresh for {} failed: {}", collection, e);
                    }
                }
            }
        });
    }

    async fn reject_locally(&self, message: String) -> AppError {
        self.sink.notify(UserNotice::error(message.clone())).await;
        AppError::ValidationError(message)
    }
}

#[async_trait]
impl SyncServiceTrait for SyncService {
    async fn start(&self) -> Result<()> {
        for collection in self.collections() {
            if let Err(e) = self.refresh(collection).await {
                // Startup keeps going; the view stays empty only until the
                // first successful fetch or reconnect refresh.
                tracing::warn!("Initial snapshot for {} failed: {}", collection, e);
            }
        }

        let rx = self
            .channel
            .subscribe()
            .await
            .map_err(|e| AppError::ChannelError(e.to_string()))?;
        self.spawn_channel_loop(rx);

        if self.sync.auto_refresh {
            self.schedule_refresh(self.sync.refresh_interval);
        }
        Ok(())
    }

    async fn refresh(&self, collection: Collection) -> Result<()> {
        let reconciler = self.reconciler(collection)?;
        let gate = reconciler.begin_snapshot().await;

        match self.transport.fetch_snapshot(collection).await {
            Ok(records) => {
                if let Some(diff) = reconciler.apply_snapshot(gate, records).await {
                    self.emit(&diff).await;
                }
                Ok(())
            }
            Err(err @ TransportError::Auth { .. }) => {
                self.record_failure(&err).await;
                self.sink.session_expired().await;
                Err(err.into())
            }
            Err(err) => {
                // The stale view stays up; a transient read failure must
                // never blank the UI.
                self.record_failure(&err).await;
                tracing::warn!(
                    "Snapshot fetch for {} failed, keeping current view: {}",
                    collection,
                    err
                );
                Err(err.into())
            }
        }
    }

    async fn submit(&self, draft: MutationDraft) -> Result<()> {
        if !draft.body.is_object() {
            return Err(self
                .reject_locally("Action payload must be a JSON object".to_string())
                .await);
        }
        let minimum = draft.action.minimum_role();
        if !self.local_role.has_minimum(minimum) {
            return Err(self
                .reject_locally(format!(
                    "{} requires the {} role",
                    draft.action, minimum
                ))
                .await);
        }

        let reconciler = self.reconciler(draft.collection)?;
        let prior = reconciler.record(&draft.key).await;
        if let Some(record) = &prior {
            if !can_act(record, &self.local_actor) {
                let owner = record
                    .owner
                    .as_ref()
                    .map(|a| a.to_string())
                    .unwrap_or_default();
                return Err(self
                    .reject_locally(format!("{} is being reviewed by {}", draft.key, owner))
                    .await);
            }
        }

        let proposed = draft
            .project(prior.as_ref(), &self.local_actor)
            .map_err(AppError::NotFound)?;
        let (token, diff) = reconciler
            .begin_mutation(proposed, draft.action.takes_lock())
            .await?;
        self.emit(&diff).await;

        match self
            .transport
            .submit_mutation(draft.collection, draft.action, &draft.key, draft.body.clone())
            .await
        {
            Ok(_) => {
                reconciler.commit(&token).await;
                Ok(())
            }
            Err(err) => {
                self.record_failure(&err).await;
                let diff = reconciler.rollback(&token).await;
                self.emit(&diff).await;

                match &err {
                    TransportError::Auth { .. } => {
                        self.sink.session_expired().await;
                    }
                    TransportError::Conflict { .. } => {
                        self.sink
                            .notify(UserNotice::warning(Self::friendly_message(&err)))
                            .await;
                        // Local state is known stale; pull the server's truth.
                        if let Err(refresh_err) = self.refresh(draft.collection).await {
                            tracing::warn!(
                                "Forced refresh after conflict failed: {}",
                                refresh_err
                            );
                        }
                    }
                    _ => {
                        self.sink
                            .notify(UserNotice::retryable(
                                Self::friendly_message(&err),
                                draft.clone(),
                            ))
                            .await;
                    }
                }
                Err(err.into())
            }
        }
    }

    async fn recent_failures(&self) -> Vec<String> {
        self.failures.read().await.iter().cloned().collect()
    }

    async fn record(
        &self,
        collection: Collection,
        key: &CaseKey,
    ) -> Option<crate::domain::entities::CaseRecord> {
        match self.reconciler(collection) {
            Ok(reconciler) => reconciler.record(key).await,
            Err(_) => None,
        }
    }
}

impl Clone for SyncService {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            channel: self.channel.clone(),
            sink: self.sink.clone(),
            projector: self.projector.clone(),
            reconcilers: self.reconcilers.clone(),
            local_actor: self.local_actor.clone(),
            local_role: self.local_role,
            sync: self.sync.clone(),
            failures: self.failures.clone(),
        }
    }
}
