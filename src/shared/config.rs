use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub channel: ChannelConfig,
    pub sync: SyncConfig,
    pub actor: ActorConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChannelConfig {
    pub path: String,
    pub reconnect_delay_ms: u64,
    pub max_reconnect_attempts: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    pub auto_refresh: bool,
    pub refresh_interval: u64,
    pub optimistic_timeout: u64,
}

/// Identity the engine acts as. Passed explicitly into services,
/// never read from ambient storage.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorConfig {
    pub username: String,
    pub role: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:8000".to_string(),
                token: None,
                timeout_secs: 30,
            },
            channel: ChannelConfig {
                path: "/ws/caseflow/".to_string(),
                reconnect_delay_ms: 3000,
                max_reconnect_attempts: 5,
            },
            sync: SyncConfig {
                auto_refresh: true,
                refresh_interval: 300, // 5 minutes
                optimistic_timeout: 10,
            },
            actor: ActorConfig {
                username: String::new(),
                role: "Tech".to_string(),
            },
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("CASEFLOW_API_BASE_URL") {
            if !v.trim().is_empty() {
                cfg.api.base_url = v.trim().trim_end_matches('/').to_string();
            }
        }
        if let Ok(v) = std::env::var("CASEFLOW_API_TOKEN") {
            if !v.trim().is_empty() {
                cfg.api.token = Some(v.trim().to_string());
            }
        }
        if let Ok(v) = std::env::var("CASEFLOW_API_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.api.timeout_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CASEFLOW_WS_PATH") {
            if !v.trim().is_empty() {
                cfg.channel.path = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("CASEFLOW_WS_RECONNECT_DELAY_MS") {
            if let Some(value) = parse_u64(&v) {
                cfg.channel.reconnect_delay_ms = value;
            }
        }
        if let Ok(v) = std::env::var("CASEFLOW_WS_MAX_RECONNECT_ATTEMPTS") {
            if let Some(value) = parse_u32(&v) {
                cfg.channel.max_reconnect_attempts = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CASEFLOW_AUTO_REFRESH") {
            cfg.sync.auto_refresh = parse_bool(&v, cfg.sync.auto_refresh);
        }
        if let Ok(v) = std::env::var("CASEFLOW_REFRESH_INTERVAL_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.refresh_interval = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CASEFLOW_OPTIMISTIC_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.optimistic_timeout = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("CASEFLOW_USERNAME") {
            if !v.trim().is_empty() {
                cfg.actor.username = v.trim().to_string();
            }
        }
        if let Ok(v) = std::env::var("CASEFLOW_ROLE") {
            if !v.trim().is_empty() {
                cfg.actor.role = v.trim().to_string();
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.api.base_url.is_empty() {
            return Err("Api base_url must not be empty".to_string());
        }
        if !self.api.base_url.starts_with("http://") && !self.api.base_url.starts_with("https://") {
            return Err("Api base_url must start with http:// or https://".to_string());
        }
        if self.api.timeout_secs == 0 {
            return Err("Api timeout_secs must be greater than 0".to_string());
        }
        if !self.channel.path.starts_with('/') {
            return Err("Channel path must start with /".to_string());
        }
        if self.channel.max_reconnect_attempts == 0 {
            return Err("Channel max_reconnect_attempts must be greater than 0".to_string());
        }
        if self.sync.optimistic_timeout == 0 {
            return Err("Sync optimistic_timeout must be greater than 0".to_string());
        }
        if self.sync.auto_refresh && self.sync.refresh_interval == 0 {
            return Err("Sync refresh_interval must be greater than 0".to_string());
        }
        Ok(())
    }

    /// WebSocket endpoint derived from the API base, ws/wss following the
    /// http/https scheme.
    pub fn websocket_url(&self) -> String {
        let base = if let Some(rest) = self.api.base_url.strip_prefix("https://") {
            format!("wss://{}", rest)
        } else if let Some(rest) = self.api.base_url.strip_prefix("http://") {
            format!("ws://{}", rest)
        } else {
            format!("ws://{}", self.api.base_url)
        };
        format!("{}{}", base.trim_end_matches('/'), self.channel.path)
    }
}

fn parse_bool(s: &str, default: bool) -> bool {
    match s.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AppConfig::default().validate().is_ok());
    }

    #[test]
    fn test_websocket_url_follows_api_scheme() {
        let mut cfg = AppConfig::default();
        cfg.api.base_url = "http://localhost:8000".to_string();
        assert_eq!(cfg.websocket_url(), "ws://localhost:8000/ws/caseflow/");

        cfg.api.base_url = "https://caseflow.example.com".to_string();
        assert_eq!(
            cfg.websocket_url(),
            "wss://caseflow.example.com/ws/caseflow/"
        );
    }

    #[test]
    fn test_validate_rejects_bad_base_url() {
        let mut cfg = AppConfig::default();
        cfg.api.base_url = "ftp://somewhere".to_string();
        assert!(cfg.validate().is_err());
    }
}
