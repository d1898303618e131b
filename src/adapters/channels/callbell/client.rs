//! Callbell API client for outbound messages.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

/// Configuration for the Callbell client.
#[derive(Debug, Clone)]
pub struct CallbellConfig {
    api_key: Secret<String>,
    pub base_url: String,
    pub timeout: Duration,
}

impl CallbellConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            base_url: "https://api.callbell.eu/v1".to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Outbound send failures.
#[derive(Debug, thiserror::Error)]
pub enum CallbellSendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Callbell message sender.
pub struct CallbellClient {
    config: CallbellConfig,
    client: Client,
}

impl CallbellClient {
    pub fn new(config: CallbellConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn send_url(&self) -> String {
        format!("{}/messages/send", self.config.base_url)
    }

    /// Sends a plain text message over WhatsApp via Callbell.
    pub async fn send_text(&self, to: &str, text: &str) -> Result<String, CallbellSendError> {
        debug!(to, text_len = text.len(), "sending message via callbell");

        let body = json!({
            "to": to,
            "from": "whatsapp",
            "type": "text",
            "content": { "text": text }
        });

        let response = self
            .client
            .post(self.send_url())
            .bearer_auth(self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| CallbellSendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(CallbellSendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| CallbellSendError::Network(e.to_string()))?;

        let uuid = sent.message.map(|m| m.uuid).unwrap_or_default();
        info!(to, uuid = %uuid, "message sent via callbell");
        Ok(uuid)
    }
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    message: Option<SentMessage>,
}

#[derive(Debug, Deserialize)]
struct SentMessage {
    #[serde(default)]
    uuid: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_url_appends_path() {
        let client = CallbellClient::new(CallbellConfig::new("key"));
        assert_eq!(client.send_url(), "https://api.callbell.eu/v1/messages/send");
    }
}
