//! Google AI services configuration (Gemini, Vision, Maps)

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Configuration for the Google-backed collaborators.
///
/// Every key is optional: without Gemini the heuristic extractor and the
/// deterministic response fallbacks take over, without Vision photos pass
/// through unscreened, without Maps listings carry no neighborhood
/// selling points.
#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Gemini API key
    pub gemini_api_key: Option<String>,

    /// Gemini model id
    #[serde(default = "default_gemini_model")]
    pub gemini_model: String,

    /// Vision API key
    pub vision_api_key: Option<String>,

    /// Maps/Places API key
    pub maps_api_key: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Check if Gemini is configured
    pub fn has_gemini(&self) -> bool {
        self.gemini_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Vision is configured
    pub fn has_vision(&self) -> bool {
        self.vision_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Check if Maps is configured
    pub fn has_maps(&self) -> bool {
        self.maps_api_key.as_ref().is_some_and(|k| !k.is_empty())
    }

    /// Validate AI configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 || self.timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            gemini_model: default_gemini_model(),
            vision_api_key: None,
            maps_api_key: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_gemini_model() -> String {
    "gemini-1.5-pro".to_string()
}

fn default_timeout() -> u64 {
    60
}
