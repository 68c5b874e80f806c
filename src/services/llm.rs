// openai-compatible chat completion client (deepinfra by default)
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{
    error::{ApiError, Result},
    models::ChatMessage,
    Config,
};

/// Opaque text completion: messages in, one text reply out.
#[async_trait]
pub trait Completion: Send + Sync {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String>;
}

pub struct ChatCompletionClient {
    http: reqwest::Client,
    api_url: String,
    api_key: Option<SecretString>,
    model: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

impl ChatCompletionClient {
    pub fn new(http: reqwest::Client, config: &Config) -> Self {
        Self {
            http,
            api_url: config.llm_api_url.clone(),
            api_key: config.llm_api_key.clone().map(SecretString::from),
            model: config.llm_model.clone(),
            timeout: Duration::from_secs(config.llm_timeout),
        }
    }
}

#[async_trait]
impl Completion for ChatCompletionClient {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String> {
        let mut request = self
            .http
            .post(&self.api_url)
            .timeout(self.timeout)
            .json(&ChatRequest {
                model: &self.model,
                messages,
            });

        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key.expose_secret());
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::ModelCallFailed(format!("request: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::ModelCallFailed(format!("{}: {}", status, body)));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ApiError::ModelCallFailed(format!("parse: {}", e)))?;

        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| ApiError::ModelCallFailed("empty completion".into()))
    }
}
