//! Callbell chat-aggregator configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Callbell channel configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CallbellConfig {
    /// Callbell API key
    pub api_key: Option<String>,
}

impl CallbellConfig {
    /// Check if the channel is configured
    pub fn enabled(&self) -> bool {
        self.api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate Callbell configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        Ok(())
    }
}
