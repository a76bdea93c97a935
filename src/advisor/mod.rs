use crate::event::AppEvent;
use reqwest::Client;
use std::env;
use std::fmt;
use std::sync::mpsc;
use tokio::runtime::Handle;

pub mod protocol;

use protocol::{extract_reply, ChatRequest, ChatResponse};

const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub endpoint: String,
    pub model: String,
    pub api_key: Option<String>,
}

impl AdvisorConfig {
    /// Endpoint, model, and optional bearer token from the environment.
    pub fn from_env() -> Self {
        Self {
            endpoint: env::var("SHELFIE_ENDPOINT").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            model: env::var("SHELFIE_MODEL").unwrap_or_else(|_| protocol::DEFAULT_MODEL.to_string()),
            api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
        }
    }
}

#[derive(Debug)]
pub enum AdvisorError {
    Transport(String),
    Status(u16),
    Parse(String),
}

impl fmt::Display for AdvisorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "advisor request failed: {message}"),
            Self::Status(status) => write!(f, "advisor request failed with status: {status}"),
            Self::Parse(message) => write!(f, "failed to parse advisor response: {message}"),
        }
    }
}

impl std::error::Error for AdvisorError {}

/// HTTP client for the chat-completion endpoint. `send` runs the request
/// on the tokio runtime and always delivers exactly one terminal event
/// back to the UI, success or failure.
#[derive(Clone)]
pub struct AdvisorClient {
    config: AdvisorConfig,
    http: Client,
    tx: mpsc::Sender<AppEvent>,
    runtime_handle: Handle,
}

impl AdvisorClient {
    pub fn new(config: AdvisorConfig, tx: mpsc::Sender<AppEvent>) -> Result<Self, AdvisorError> {
        let runtime_handle = Handle::try_current()
            .map_err(|err| AdvisorError::Transport(format!("tokio runtime unavailable: {err}")))?;

        Ok(Self {
            config,
            http: Client::new(),
            tx,
            runtime_handle,
        })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn send(&self, request: ChatRequest) {
        let tx = self.tx.clone();
        let http = self.http.clone();
        let config = self.config.clone();

        self.runtime_handle.spawn(async move {
            let event = match request_reply(&http, &config, &request).await {
                Ok(reply) => AppEvent::AdvisorReply(reply),
                Err(err) => AppEvent::AdvisorFailed(err.to_string()),
            };
            let _ = tx.send(event);
        });
    }
}

async fn request_reply(
    http: &Client,
    config: &AdvisorConfig,
    request: &ChatRequest,
) -> Result<String, AdvisorError> {
    let mut builder = http.post(&config.endpoint).json(request);
    if let Some(key) = &config.api_key {
        builder = builder.header("Authorization", format!("Bearer {key}"));
    }

    let response = builder
        .send()
        .await
        .map_err(|err| AdvisorError::Transport(err.to_string()))?;

    if !response.status().is_success() {
        return Err(AdvisorError::Status(response.status().as_u16()));
    }

    let parsed: ChatResponse = response
        .json()
        .await
        .map_err(|err| AdvisorError::Parse(err.to_string()))?;

    let message = parsed
        .choices
        .into_iter()
        .next()
        .map(|choice| choice.message)
        .unwrap_or_default();

    Ok(extract_reply(message))
}

#[cfg(test)]
mod tests {
    use super::AdvisorError;

    #[test]
    fn errors_render_a_useful_message() {
        assert_eq!(
            AdvisorError::Status(500).to_string(),
            "advisor request failed with status: 500"
        );
        assert!(AdvisorError::Transport("connection refused".to_string())
            .to_string()
            .contains("connection refused"));
    }
}
