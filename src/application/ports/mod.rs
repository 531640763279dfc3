pub mod channel;
pub mod transport;
pub mod view;

pub use channel::{ChannelSignal, RealtimeChannel};
pub use transport::{CaseTransport, TransportError};
pub use view::ViewSink;
