use crate::application::ports::{CaseTransport, RealtimeChannel, ViewSink};
use crate::application::services::{SyncService, SyncServiceTrait};
use crate::domain::value_objects::{Actor, Role};
use crate::infrastructure::{RestTransport, WsChannel};
use crate::shared::config::AppConfig;
use crate::shared::error::{AppError, Result};
use std::sync::Arc;

/// Application-wide state: the validated configuration plus the wired sync
/// engine. The view sink comes from the embedding shell; everything else is
/// constructed here.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub sync_service: Arc<SyncService>,
}

impl AppState {
    pub fn new(config: AppConfig, sink: Arc<dyn ViewSink>) -> Result<Self> {
        config.validate().map_err(AppError::ConfigurationError)?;

        let actor =
            Actor::new(config.actor.username.clone()).map_err(AppError::ConfigurationError)?;
        let role = Role::parse(&config.actor.role).ok_or_else(|| {
            AppError::ConfigurationError(format!("Unknown role: {}", config.actor.role))
        })?;

        let transport: Arc<dyn CaseTransport> = Arc::new(RestTransport::new(&config.api)?);
        let channel: Arc<dyn RealtimeChannel> = Arc::new(WsChannel::new(&config));

        let sync_service = Arc::new(SyncService::new(
            transport,
            channel,
            sink,
            actor,
            role,
            config.sync.clone(),
        ));

        Ok(Self {
            config,
            sync_service,
        })
    }

    /// Take the initial snapshots and open the realtime subscription.
    pub async fn start(&self) -> Result<()> {
        self.sync_service.start().await
    }
}
