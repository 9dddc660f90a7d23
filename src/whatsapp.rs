use crate::config::WhatsAppSettings;
use crate::error::{IvoneError, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

#[derive(Serialize)]
struct TextBody<'a> {
    body: &'a str,
}

#[derive(Serialize)]
struct OutgoingMessage<'a> {
    messaging_product: &'static str,
    to: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    text: TextBody<'a>,
}

/// Forwards replies through the WhatsApp Cloud API.
pub struct WhatsAppClient {
    client: reqwest::Client,
    messages_url: String,
}

impl WhatsAppClient {
    pub fn new(settings: &WhatsAppSettings) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", settings.token)).map_err(|e| {
                IvoneError::ConfigError(format!("Invalid WhatsApp token: {}", e))
            })?,
        );
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(15))
            .build()?;

        Ok(Self {
            client,
            messages_url: format!("{}/messages", settings.api_url.trim_end_matches('/')),
        })
    }

    /// Send `body` as a text message to `to`. Returns the provider's response.
    pub async fn send_text(&self, to: &str, body: &str) -> Result<Value> {
        let message = OutgoingMessage {
            messaging_product: "whatsapp",
            to,
            kind: "text",
            text: TextBody { body },
        };

        let response = self
            .client
            .post(&self.messages_url)
            .json(&message)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "WhatsApp request failed");
                IvoneError::ForwardError(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %text, "WhatsApp rejected message");
            return Err(IvoneError::ForwardError(format!("status {}: {}", status, text)));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| IvoneError::ForwardError(format!("invalid response: {}", e)))
    }
}
