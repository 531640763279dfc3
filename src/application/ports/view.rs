use crate::presentation::dto::{RenderOp, UserNotice};
use async_trait::async_trait;

/// Outbound seam to the embedding shell. The engine never touches a UI
/// toolkit; it hands the shell targeted render operations and notices.
#[async_trait]
pub trait ViewSink: Send + Sync {
    /// Apply a batch of render operations. Ops within one batch are ordered.
    async fn apply(&self, ops: Vec<RenderOp>);

    /// Show a user-facing notice (inline banner near the affected action).
    async fn notify(&self, notice: UserNotice);

    /// Credentials were rejected; the session layer must take over.
    async fn session_expired(&self);
}
