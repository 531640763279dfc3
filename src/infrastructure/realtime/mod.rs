pub mod ws_channel;

pub use ws_channel::WsChannel;
