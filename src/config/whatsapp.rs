//! WhatsApp Cloud API configuration

use serde::Deserialize;

use super::error::ValidationError;
use super::server::Environment;

/// WhatsApp channel configuration
#[derive(Debug, Clone, Deserialize)]
pub struct WhatsAppConfig {
    /// Cloud API access token
    pub access_token: Option<String>,

    /// Phone number id to send from
    pub phone_number_id: Option<String>,

    /// Verify token for the Meta webhook handshake
    #[serde(default = "default_verify_token")]
    pub verify_token: String,

    /// App secret for webhook signature verification
    pub app_secret: Option<String>,
}

impl WhatsAppConfig {
    /// Check if the channel is configured for outbound sends
    pub fn enabled(&self) -> bool {
        self.access_token.as_ref().is_some_and(|t| !t.is_empty())
            && self.phone_number_id.as_ref().is_some_and(|p| !p.is_empty())
    }

    /// Validate WhatsApp configuration
    pub fn validate(&self, environment: &Environment) -> Result<(), ValidationError> {
        if self.access_token.is_some() && self.phone_number_id.is_none() {
            return Err(ValidationError::MissingRequired("WHATSAPP_PHONE_NUMBER_ID"));
        }
        // Unsigned webhooks are acceptable only outside production.
        if self.enabled() && *environment == Environment::Production && self.app_secret.is_none() {
            return Err(ValidationError::MissingRequired("WHATSAPP_APP_SECRET"));
        }
        Ok(())
    }
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            phone_number_id: None,
            verify_token: default_verify_token(),
            app_secret: None,
        }
    }
}

fn default_verify_token() -> String {
    "captura-verify".to_string()
}
