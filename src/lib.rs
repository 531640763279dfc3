pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
pub mod shared;
pub mod state;

pub use application::services::{SyncService, SyncServiceTrait};
pub use shared::{AppConfig, AppError, Result};
pub use state::AppState;

/// Initialize the tracing stack. `RUST_LOG` overrides the default filter.
pub fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caseflow_core=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
