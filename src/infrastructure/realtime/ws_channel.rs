//! Reconnecting WebSocket subscription to the backend's realtime channel.
//!
//! One connection carries every stream. After connecting, the worker sends an
//! auth frame and waits for the server's confirmation before anything else;
//! only then does the subscriber see `Connected`, so a refresh is always
//! ordered ahead of that connection's events.

use crate::application::ports::channel::{ChannelSignal, RealtimeChannel};
use crate::application::ports::transport::TransportError;
use crate::infrastructure::api::normalize;
use crate::shared::config::AppConfig;
use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(10);
const SIGNAL_BUFFER: usize = 256;

/// Close code the backend uses when it rejects the auth frame.
const AUTH_REJECTED: u16 = 4000;

pub struct WsChannel {
    url: String,
    token: Option<String>,
    username: String,
    reconnect_delay: Duration,
    max_reconnect_attempts: u32,
}

impl WsChannel {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            url: config.websocket_url(),
            token: config.api.token.clone(),
            username: config.actor.username.clone(),
            reconnect_delay: Duration::from_millis(config.channel.reconnect_delay_ms),
            max_reconnect_attempts: config.channel.max_reconnect_attempts,
        }
    }
}

#[async_trait]
impl RealtimeChannel for WsChannel {
    async fn subscribe(&self) -> Result<mpsc::Receiver<ChannelSignal>, TransportError> {
        let (tx, rx) = mpsc::channel(SIGNAL_BUFFER);
        let worker = ChannelWorker {
            url: self.url.clone(),
            token: self.token.clone(),
            username: self.username.clone(),
            reconnect_delay: self.reconnect_delay,
            max_reconnect_attempts: self.max_reconnect_attempts,
            tx,
        };
        tokio::spawn(worker.run());
        Ok(rx)
    }
}

struct ChannelWorker {
    url: String,
    token: Option<String>,
    username: String,
    reconnect_delay: Duration,
    max_reconnect_attempts: u32,
    tx: mpsc::Sender<ChannelSignal>,
}

impl ChannelWorker {
    async fn run(self) {
        let mut attempts: u32 = 0;
        loop {
            tracing::info!("Connecting realtime channel at {}", self.url);
            match self.connect_and_forward(&mut attempts).await {
                Ok(()) => tracing::info!("Realtime channel closed by server"),
                Err(e) => tracing::warn!("Realtime channel failed: {}", e),
            }

            if self.tx.is_closed() {
                return;
            }

            attempts += 1;
            if attempts > self.max_reconnect_attempts {
                tracing::error!(
                    "Max reconnection attempts ({}) reached, giving up",
                    self.max_reconnect_attempts
                );
                let _ = self.tx.send(ChannelSignal::Closed).await;
                return;
            }

            tracing::info!(
                "Reconnecting in {:?} (attempt {}/{})",
                self.reconnect_delay,
                attempts,
                self.max_reconnect_attempts
            );
            tokio::time::sleep(self.reconnect_delay).await;
        }
    }

    /// One connection lifetime: connect, authenticate, forward frames until
    /// the connection dies. Resets the attempt counter once authenticated.
    async fn connect_and_forward(&self, attempts: &mut u32) -> Result<(), TransportError> {
        let (stream, _) = connect_async(self.url.as_str())
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        let (mut write, mut read) = stream.split();

        let hello = json!({
            "type": "auth",
            "token": self.token,
            "username": self.username,
        });
        write
            .send(Message::Text(hello.to_string()))
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let reply = tokio::time::timeout(HANDSHAKE_TIMEOUT, read.next())
            .await
            .map_err(|_| TransportError::Network("Auth handshake timed out".to_string()))?;
        let text = match reply {
            Some(Ok(Message::Text(text))) => text,
            Some(Ok(_)) => {
                return Err(TransportError::Decode("Non-text auth reply".to_string()));
            }
            Some(Err(e)) => return Err(TransportError::Network(e.to_string())),
            None => {
                return Err(TransportError::Network(
                    "Connection closed during handshake".to_string(),
                ));
            }
        };
        let frame: Value =
            serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))?;
        let authenticated = frame.get("type").and_then(Value::as_str) == Some("auth")
            && frame.get("status").and_then(Value::as_str) == Some("success");
        if !authenticated {
            return Err(TransportError::Auth {
                status: AUTH_REJECTED,
            });
        }

        tracing::info!("Realtime channel authenticated");
        *attempts = 0;
        if self.tx.send(ChannelSignal::Connected).await.is_err() {
            return Ok(());
        }

        while let Some(frame) = read.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    let Ok(value) = serde_json::from_str::<Value>(&text) else {
                        tracing::debug!("Undecodable channel frame: {}", text);
                        continue;
                    };
                    if value.get("type").and_then(Value::as_str) == Some("auth") {
                        continue;
                    }
                    let Some(event) = normalize::event_from_frame(&value) else {
                        tracing::debug!("Ignoring unrecognized channel frame");
                        continue;
                    };
                    if self.tx.send(ChannelSignal::Event(event)).await.is_err() {
                        return Ok(());
                    }
                }
                Ok(Message::Ping(payload)) => {
                    let _ = write.send(Message::Pong(payload)).await;
                }
                Ok(Message::Close(_)) => return Ok(()),
                Ok(_) => {}
                Err(e) => return Err(TransportError::Network(e.to_string())),
            }
        }
        Ok(())
    }
}
