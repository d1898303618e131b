//! Publication destination configuration

use serde::Deserialize;

use super::error::ValidationError;

/// CRM destination configuration.
///
/// One destination for now; the publisher takes a list, so adding more is
/// a config-shape change only.
#[derive(Debug, Clone, Deserialize)]
pub struct PublicationConfig {
    /// Destination name, used in outcomes
    #[serde(default = "default_crm_name")]
    pub crm_name: String,

    /// Destination API base URL
    pub crm_base_url: Option<String>,

    /// Destination API key
    pub crm_api_key: Option<String>,
}

impl PublicationConfig {
    /// Check if a destination is configured
    pub fn enabled(&self) -> bool {
        self.crm_base_url.as_ref().is_some_and(|u| !u.is_empty())
    }

    /// Validate publication configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.enabled() && self.crm_api_key.as_ref().map_or(true, |k| k.is_empty()) {
            return Err(ValidationError::MissingDestinationKey);
        }
        Ok(())
    }
}

impl Default for PublicationConfig {
    fn default() -> Self {
        Self {
            crm_name: default_crm_name(),
            crm_base_url: None,
            crm_api_key: None,
        }
    }
}

fn default_crm_name() -> String {
    "prop360".to_string()
}
