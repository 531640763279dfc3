//! REST transport against the case backend.

use super::normalize;
use crate::application::ports::transport::{CaseTransport, TransportError};
use crate::domain::entities::CaseRecord;
use crate::domain::value_objects::{CaseKey, Collection, MutationAction};
use crate::shared::config::ApiConfig;
use crate::shared::error::{AppError, Result};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

/// Token-authenticated HTTP client. Snapshot reads and mutation writes share
/// one connection pool; auth rides as a default header on every call.
pub struct RestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl RestTransport {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if let Some(token) = &config.token {
            let value = HeaderValue::from_str(&format!("Token {token}"))
                .map_err(|e| AppError::ConfigurationError(format!("Invalid API token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ConfigurationError(format!("Failed to build HTTP client: {e}"))
            })?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Map a non-2xx response onto the error taxonomy. A 404 during a
    /// mutation means the record disappeared under the caller, which is a
    /// conflict, not a server fault.
    async fn error_for(response: reqwest::Response, mutating: bool) -> TransportError {
        let status = response.status().as_u16();
        let message = Self::error_message(response).await;
        match status {
            401 | 403 => TransportError::Auth { status },
            409 => TransportError::Conflict { status, message },
            404 if mutating => TransportError::Conflict { status, message },
            _ => TransportError::Server { status, message },
        }
    }

    async fn error_message(response: reqwest::Response) -> String {
        let body = response.text().await.unwrap_or_default();
        if let Ok(value) = serde_json::from_str::<Value>(&body) {
            if let Some(detail) = value
                .get("detail")
                .or_else(|| value.get("error"))
                .and_then(Value::as_str)
            {
                return detail.to_string();
            }
        }
        body
    }
}

#[async_trait]
impl CaseTransport for RestTransport {
    async fn fetch_snapshot(
        &self,
        collection: Collection,
    ) -> std::result::Result<Vec<CaseRecord>, TransportError> {
        let url = format!("{}{}", self.base_url, collection.list_path());
        tracing::debug!("GET {}", url);

        let response = self.http.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, false).await);
        }

        let rows: Vec<Value> = response
            .json()
            .await
            .map_err(|e| TransportError::Decode(e.to_string()))?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            match normalize::record_from_row(collection, row) {
                Some(record) => records.push(record),
                None => tracing::warn!("Skipping {} row without a usable key", collection),
            }
        }
        tracing::debug!("Fetched {} {} records", records.len(), collection);
        Ok(records)
    }

    async fn submit_mutation(
        &self,
        collection: Collection,
        action: MutationAction,
        key: &CaseKey,
        body: Value,
    ) -> std::result::Result<Value, TransportError> {
        let url = format!(
            "{}/api/{}/{}/",
            self.base_url,
            collection.as_str(),
            action.as_str()
        );

        // The key rides in the body under the collection's key field unless
        // the caller already set it.
        let mut payload = body;
        if let Value::Object(map) = &mut payload {
            let key_field = match collection {
                Collection::ReviewedClaims => "id",
                Collection::ActiveClaims | Collection::CompletedClaims => "casenum",
            };
            map.entry(key_field)
                .or_insert_with(|| Value::String(key.to_string()));
        }

        tracing::debug!("POST {} for {}", url, key);
        let response = self.http.post(&url).json(&payload).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_for(response, true).await);
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&text).map_err(|e| TransportError::Decode(e.to_string()))
    }
}
