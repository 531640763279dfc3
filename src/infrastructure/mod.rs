pub mod api;
pub mod realtime;

pub use api::RestTransport;
pub use realtime::WsChannel;
