use crate::api::response::{extract_error_message, extract_reply};
use crate::api::RequestBody;
use crate::config::ApiSettings;
use crate::error::{IvoneError, Result};
use crate::models::ChatMessage;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use std::time::Duration;

/// Sends a prepared conversation upstream and returns the reply text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// One attempt, no retry.
    async fn send(&self, messages: &[ChatMessage]) -> Result<String>;

    /// Drop any conversation state the upstream keeps for this client.
    async fn reset_conversation(&self) -> Result<()> {
        Ok(())
    }
}

pub struct HttpCompletionClient {
    client: reqwest::Client,
    endpoint: String,
    model: String,
    max_tokens: u32,
}

impl HttpCompletionClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", settings.api_key)).map_err(|e| {
                IvoneError::ConfigError(format!("Invalid authorization header: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: settings.endpoint.clone(),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionClient for HttpCompletionClient {
    async fn send(&self, messages: &[ChatMessage]) -> Result<String> {
        let request_body = RequestBody {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            stream: false,
        };

        tracing::debug!(
            model = %self.model,
            messages = messages.len(),
            "sending completion request"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        tracing::debug!(status = %status, "completion response");

        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(IvoneError::ApiError {
                status: status.as_u16(),
                message: extract_error_message(&error_text),
            });
        }

        let response_text = response.text().await?;
        let response_json: Value = serde_json::from_str(&response_text)
            .map_err(|e| IvoneError::MalformedResponse(format!("invalid JSON body: {}", e)))?;

        extract_reply(&response_json)
    }
}
