//! WhatsApp Cloud API client for outbound messages.

use std::time::Duration;

use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

/// Configuration for the Cloud API client.
#[derive(Debug, Clone)]
pub struct WhatsAppConfig {
    access_token: Secret<String>,
    pub phone_number_id: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl WhatsAppConfig {
    pub fn new(access_token: impl Into<String>, phone_number_id: impl Into<String>) -> Self {
        Self {
            access_token: Secret::new(access_token.into()),
            phone_number_id: phone_number_id.into(),
            base_url: "https://graph.facebook.com/v18.0".to_string(),
            timeout: Duration::from_secs(15),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn access_token(&self) -> &str {
        self.access_token.expose_secret()
    }
}

/// Outbound send failures.
#[derive(Debug, thiserror::Error)]
pub enum SendError {
    #[error("network error: {0}")]
    Network(String),

    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Cloud API message sender.
pub struct WhatsAppClient {
    config: WhatsAppConfig,
    client: Client,
}

impl WhatsAppClient {
    pub fn new(config: WhatsAppConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/{}/messages",
            self.config.base_url, self.config.phone_number_id
        )
    }

    /// Sends a plain text message.
    pub async fn send_text(&self, to: &str, text: &str) -> Result<String, SendError> {
        debug!(to, text_len = text.len(), "sending whatsapp message");

        let body = json!({
            "messaging_product": "whatsapp",
            "recipient_type": "individual",
            "to": to,
            "type": "text",
            "text": { "body": text }
        });

        let response = self
            .client
            .post(self.messages_url())
            .bearer_auth(self.config.access_token())
            .json(&body)
            .send()
            .await
            .map_err(|e| SendError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: SendResponse = response
            .json()
            .await
            .map_err(|e| SendError::Network(e.to_string()))?;

        let message_id = sent
            .messages
            .into_iter()
            .next()
            .map(|m| m.id)
            .unwrap_or_default();
        info!(to, message_id = %message_id, "whatsapp message sent");
        Ok(message_id)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct SendResponse {
    #[serde(default)]
    messages: Vec<SentMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
struct SentMessage {
    #[serde(default)]
    id: String,
}
