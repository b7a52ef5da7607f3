pub mod models;
pub mod prompt;

use crate::config::Config;
use crate::error::{Result, StandupError};
use crate::github::Activity;
use models::{ChatRequest, Message, ModelsClient};
use std::time::Duration;

const TEMPERATURE: f64 = 0.7;
const TOP_P: f64 = 1.0;

/// Turns collected activity into a standup report through GitHub Models
pub struct ReportGenerator {
    client: ModelsClient,
}

impl ReportGenerator {
    /// Create a generator. Fails with [`StandupError::MissingToken`] when no token is available.
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_token(config.github_token(), config)
    }

    pub(crate) fn with_token(token: Option<String>, config: &Config) -> Result<Self> {
        let token = token.ok_or(StandupError::MissingToken)?;
        let client = ModelsClient::new(
            token,
            &config.models_api_url,
            Duration::from_secs(config.completion_timeout_secs),
        )?;

        Ok(Self { client })
    }

    /// Generate a report for `activities` with the given model
    pub async fn generate(&self, activities: &[Activity], model: &str) -> Result<String> {
        let digest = prompt::format_activities(activities);

        let request = ChatRequest {
            messages: vec![
                Message::system(prompt::SYSTEM_PROMPT),
                Message::user(prompt::user_prompt(&digest)),
            ],
            model: model.to_string(),
            temperature: TEMPERATURE,
            top_p: TOP_P,
            stream: false,
        };

        let response = self.client.complete(&request).await?;

        let choice = response
            .choices
            .into_iter()
            .next()
            .ok_or(StandupError::EmptyCompletion)?;

        Ok(choice.message.content.unwrap_or_default().trim().to_string())
    }
}
