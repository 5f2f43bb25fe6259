use std::path::PathBuf;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufStream};
use tokio::net::UnixStream;
use tokio::sync::Mutex;

use crate::bridge::{Bridge, BridgeError, Envelope};
use crate::status::StatusData;

#[derive(Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
enum AgentRequest<'a> {
    Status,
    StartContext {
        context: &'a str,
    },
    StopContext {
        context: &'a str,
    },
    StartService {
        context: &'a str,
        service: &'a str,
    },
    StopService {
        context: &'a str,
        service: &'a str,
    },
    Login {
        context: &'a str,
        username: &'a str,
        password: &'a str,
    },
    Logout {
        context: &'a str,
    },
    Restart,
}

// Client for the tunnelmux agent socket, one JSON object per line in each
// direction. The connection is dialed lazily on first use and dropped on any
// transport error so the next call redials a restarted agent.
pub struct AgentClient {
    socket_path: PathBuf,
    stream: Mutex<Option<BufStream<UnixStream>>>,
}

impl AgentClient {
    pub fn new(socket_path: PathBuf) -> Self {
        Self {
            socket_path,
            stream: Mutex::new(None),
        }
    }

    pub async fn reset(&self) {
        *self.stream.lock().await = None;
    }

    async fn call<T: DeserializeOwned>(
        &self,
        request: &AgentRequest<'_>,
    ) -> Result<Option<T>, BridgeError> {
        let mut guard = self.stream.lock().await;

        if guard.is_none() {
            let stream = UnixStream::connect(&self.socket_path).await.map_err(|error| {
                BridgeError::Transport(format!("connect {}: {error}", self.socket_path.display()))
            })?;
            log::debug!("[agent] connected to {}", self.socket_path.display());
            *guard = Some(BufStream::new(stream));
        }

        let stream = match guard.as_mut() {
            Some(stream) => stream,
            None => return Err(BridgeError::Transport("no agent connection".to_string())),
        };

        match Self::round_trip(stream, request).await {
            Ok(envelope) => envelope.into_result(),
            Err(error) => {
                *guard = None;
                Err(error)
            }
        }
    }

    async fn round_trip<T: DeserializeOwned>(
        stream: &mut BufStream<UnixStream>,
        request: &AgentRequest<'_>,
    ) -> Result<Envelope<T>, BridgeError> {
        let mut line = serde_json::to_string(request)
            .map_err(|error| BridgeError::Transport(format!("encode request: {error}")))?;
        line.push('\n');

        stream
            .write_all(line.as_bytes())
            .await
            .map_err(|error| BridgeError::Transport(format!("write request: {error}")))?;
        stream
            .flush()
            .await
            .map_err(|error| BridgeError::Transport(format!("write request: {error}")))?;

        let mut response = String::new();
        let bytes_read = stream
            .read_line(&mut response)
            .await
            .map_err(|error| BridgeError::Transport(format!("read response: {error}")))?;
        if bytes_read == 0 {
            return Err(BridgeError::Transport(
                "agent closed the connection".to_string(),
            ));
        }

        serde_json::from_str(&response)
            .map_err(|error| BridgeError::Transport(format!("malformed response: {error}")))
    }

    async fn command(&self, request: AgentRequest<'_>) -> Result<(), BridgeError> {
        self.call::<serde_json::Value>(&request).await.map(|_| ())
    }
}

#[async_trait]
impl Bridge for AgentClient {
    async fn status(&self) -> Result<StatusData, BridgeError> {
        let data = self.call::<StatusData>(&AgentRequest::Status).await?;
        data.ok_or_else(|| BridgeError::Transport("status response had no data".to_string()))
    }

    async fn start_context(&self, context: &str) -> Result<(), BridgeError> {
        self.command(AgentRequest::StartContext { context }).await
    }

    async fn stop_context(&self, context: &str) -> Result<(), BridgeError> {
        self.command(AgentRequest::StopContext { context }).await
    }

    async fn start_service(&self, context: &str, service: &str) -> Result<(), BridgeError> {
        self.command(AgentRequest::StartService { context, service })
            .await
    }

    async fn stop_service(&self, context: &str, service: &str) -> Result<(), BridgeError> {
        self.command(AgentRequest::StopService { context, service })
            .await
    }

    async fn login(
        &self,
        context: &str,
        username: &str,
        password: &str,
    ) -> Result<(), BridgeError> {
        self.command(AgentRequest::Login {
            context,
            username,
            password,
        })
        .await
    }

    async fn logout(&self, context: &str) -> Result<(), BridgeError> {
        self.command(AgentRequest::Logout { context }).await
    }

    // The agent is expected to go down right after acknowledging; drop the
    // cached connection so the next call redials the restarted process.
    async fn restart(&self) -> Result<(), BridgeError> {
        let result = self.command(AgentRequest::Restart).await;
        self.reset().await;
        result
    }
}
