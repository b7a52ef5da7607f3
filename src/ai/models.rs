use crate::error::{Result, StandupError};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Chat-completion client for GitHub Models
pub struct ModelsClient {
    token: String,
    endpoint: String,
    client: Client,
}

impl ModelsClient {
    /// Create a new client for `endpoint`, bounding each call by `timeout`
    pub fn new(token: String, endpoint: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            token,
            endpoint: endpoint.to_string(),
            client,
        })
    }

    /// Send one completion request and decode the reply
    pub async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse> {
        debug!(model = %request.model, endpoint = %self.endpoint, "chat completion request");

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(StandupError::models_api(format!(
                "API request failed with status {}: {}",
                status.as_u16(),
                body
            )));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[derive(Debug, Serialize)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system<S: Into<String>>(content: S) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    pub fn user<S: Into<String>>(content: S) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChoiceMessage {
    pub content: Option<String>,
}
