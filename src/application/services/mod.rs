pub mod reconciler;
pub mod sync_service;

pub use reconciler::{OptimisticToken, Reconciler, SnapshotGate};
pub use sync_service::{SyncService, SyncServiceTrait};
