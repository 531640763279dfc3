use super::transport::TransportError;
use crate::domain::entities::ChannelEvent;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Signals delivered by a realtime subscription.
///
/// `Connected` arrives after every successful (re)connection, including the
/// first, and always before any event from that connection. Consumers use it
/// to force a snapshot refresh; events missed while disconnected are
/// otherwise unrecoverable.
#[derive(Debug, Clone, PartialEq)]
pub enum ChannelSignal {
    Connected,
    Event(ChannelEvent),
    /// Reconnect attempts are exhausted; the subscription is dead.
    Closed,
}

/// Reconnecting realtime channel. One subscription covers all streams; the
/// consumer routes by `ChannelEvent::stream`.
#[async_trait]
pub trait RealtimeChannel: Send + Sync {
    async fn subscribe(&self) -> Result<mpsc::Receiver<ChannelSignal>, TransportError>;
}
