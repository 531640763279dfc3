pub mod ports;
pub mod services;

pub use ports::{CaseTransport, ChannelSignal, RealtimeChannel, TransportError, ViewSink};
pub use services::{SyncService, SyncServiceTrait};
