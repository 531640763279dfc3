use crate::domain::entities::CaseRecord;
use crate::domain::value_objects::{CaseKey, Collection, MutationAction};
use crate::shared::error::AppError;
use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Typed failure surface of the REST transport. Callers decide policy from
/// the variant; non-2xx responses never escape as unparsed values.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Request failed: {0}")]
    Network(String),

    #[error("Authentication rejected (status {status})")]
    Auth { status: u16 },

    #[error("Conflicting write (status {status}): {message}")]
    Conflict { status: u16, message: String },

    #[error("Server failure (status {status}): {message}")]
    Server { status: u16, message: String },

    #[error("Undecodable response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        TransportError::Network(err.to_string())
    }
}

impl From<TransportError> for AppError {
    fn from(err: TransportError) -> Self {
        let message = err.to_string();
        match err {
            TransportError::Network(msg) => AppError::Network(msg),
            TransportError::Auth { .. } => AppError::Auth(message),
            TransportError::Conflict { .. } => AppError::Conflict(message),
            TransportError::Server { .. } => AppError::Server(message),
            TransportError::Decode(msg) => AppError::SerializationError(msg),
        }
    }
}

/// Authenticated REST access to the backend. Implementations normalize wire
/// payloads into domain records; field-name drift stays on their side of the
/// boundary.
#[async_trait]
pub trait CaseTransport: Send + Sync {
    /// Full current server state of one collection.
    async fn fetch_snapshot(
        &self,
        collection: Collection,
    ) -> Result<Vec<CaseRecord>, TransportError>;

    /// Persist one user action. The returned value is the backend's response
    /// body, passed through for diagnostics.
    async fn submit_mutation(
        &self,
        collection: Collection,
        action: MutationAction,
        key: &CaseKey,
        body: Value,
    ) -> Result<Value, TransportError>;
}
