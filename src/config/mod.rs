//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `CAPTURA` prefix and nested values use `__` as separator.
//!
//! # Example
//!
//! ```no_run
//! use captura::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Server running on {}", config.server.socket_addr());
//! ```

mod ai;
mod callbell;
mod capture;
mod error;
mod publication;
mod server;
mod whatsapp;

pub use ai::AiConfig;
pub use callbell::CallbellConfig;
pub use capture::CaptureConfig;
pub use error::{ConfigError, ValidationError};
pub use publication::PublicationConfig;
pub use server::{Environment, ServerConfig};
pub use whatsapp::WhatsAppConfig;

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Server configuration (host, port, environment)
    #[serde(default)]
    pub server: ServerConfig,

    /// Google AI services (Gemini, Vision, Maps)
    #[serde(default)]
    pub ai: AiConfig,

    /// WhatsApp Cloud API channel
    #[serde(default)]
    pub whatsapp: WhatsAppConfig,

    /// Callbell channel
    #[serde(default)]
    pub callbell: CallbellConfig,

    /// Publication destinations
    #[serde(default)]
    pub publication: PublicationConfig,

    /// Capture policy knobs
    #[serde(default)]
    pub capture: CaptureConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CAPTURA` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `CAPTURA__SERVER__PORT=3000` -> `server.port = 3000`
    /// - `CAPTURA__AI__GEMINI_API_KEY=...` -> `ai.gemini_api_key = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CAPTURA")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.ai.validate()?;
        self.whatsapp.validate(&self.server.environment)?;
        self.callbell.validate()?;
        self.publication.validate()?;
        self.capture.validate()?;
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn clear_env() {
        env::remove_var("CAPTURA__SERVER__PORT");
        env::remove_var("CAPTURA__SERVER__ENVIRONMENT");
        env::remove_var("CAPTURA__AI__GEMINI_API_KEY");
        env::remove_var("CAPTURA__WHATSAPP__ACCESS_TOKEN");
        env::remove_var("CAPTURA__WHATSAPP__PHONE_NUMBER_ID");
        env::remove_var("CAPTURA__CAPTURE__SWEEP_INTERVAL_SECS");
    }

    #[test]
    fn loads_with_defaults_only() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();

        let config = AppConfig::load().unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 3000);
        assert!(!config.whatsapp.enabled());
        assert!(!config.publication.enabled());
    }

    #[test]
    fn reads_nested_overrides_from_env() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CAPTURA__SERVER__PORT", "8080");
        env::set_var("CAPTURA__AI__GEMINI_API_KEY", "g-key");

        let config = AppConfig::load().unwrap();
        clear_env();

        assert_eq!(config.server.port, 8080);
        assert!(config.ai.has_gemini());
    }

    #[test]
    fn whatsapp_token_without_phone_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CAPTURA__WHATSAPP__ACCESS_TOKEN", "token");

        let config = AppConfig::load().unwrap();
        clear_env();

        assert!(config.validate().is_err());
    }

    #[test]
    fn short_sweep_interval_fails_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CAPTURA__CAPTURE__SWEEP_INTERVAL_SECS", "5");

        let config = AppConfig::load().unwrap();
        clear_env();

        assert!(matches!(
            config.validate(),
            Err(ValidationError::InvalidSweepInterval)
        ));
    }

    #[test]
    fn production_requires_app_secret_when_whatsapp_enabled() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        env::set_var("CAPTURA__SERVER__ENVIRONMENT", "production");
        env::set_var("CAPTURA__WHATSAPP__ACCESS_TOKEN", "token");
        env::set_var("CAPTURA__WHATSAPP__PHONE_NUMBER_ID", "12345");

        let config = AppConfig::load().unwrap();
        clear_env();

        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("WHATSAPP_APP_SECRET"))
        ));
    }
}
