use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::status::StatusData;

// Backend failures carry the agent's own message and are surfaced to the
// operator verbatim; transport failures mean the call itself never completed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BridgeError {
    #[error("{0}")]
    Backend(String),
    #[error("agent unreachable: {0}")]
    Transport(String),
}

impl BridgeError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

// Wire envelope shared by every agent response: `err` non-null signals a
// backend-reported failure, otherwise `data` carries the payload (absent for
// plain acknowledgements).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<String>,
}

impl<T> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            err: None,
        }
    }

    pub fn ack() -> Self {
        Self {
            data: None,
            err: None,
        }
    }

    pub fn backend_err(message: impl Into<String>) -> Self {
        Self {
            data: None,
            err: Some(message.into()),
        }
    }

    pub fn into_result(self) -> Result<Option<T>, BridgeError> {
        match self.err {
            Some(message) => Err(BridgeError::Backend(message)),
            None => Ok(self.data),
        }
    }
}

// The agent RPC surface. Calls are asynchronous, non-cancellable once issued
// and carry no timeout; start/stop are idempotent from the caller's side
// (the backend decides no-op versus error).
#[async_trait]
pub trait Bridge: Send + Sync {
    async fn status(&self) -> Result<StatusData, BridgeError>;
    async fn start_context(&self, context: &str) -> Result<(), BridgeError>;
    async fn stop_context(&self, context: &str) -> Result<(), BridgeError>;
    async fn start_service(&self, context: &str, service: &str) -> Result<(), BridgeError>;
    async fn stop_service(&self, context: &str, service: &str) -> Result<(), BridgeError>;
    async fn login(
        &self,
        context: &str,
        username: &str,
        password: &str,
    ) -> Result<(), BridgeError>;
    async fn logout(&self, context: &str) -> Result<(), BridgeError>;
    async fn restart(&self) -> Result<(), BridgeError>;
}
