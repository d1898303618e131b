//! Response Generation Port - turns a capture record into chat text.
//!
//! The orchestrator decides *which* template to send; the collaborator
//! only enriches the wording. Every template has a fixed deterministic
//! fallback string, and a generation failure never affects control flow:
//! the fallback is sent instead.

use async_trait::async_trait;

use crate::domain::capture::CaptureRecord;

/// The messages the orchestrator can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResponseTemplate {
    /// Greeting on first contact from an unseen address.
    Welcome,
    /// Prompt naming the still-missing required fields.
    RequestMissing,
    /// Summary once every required field is present.
    CaptureComplete,
    /// Confirmation after a successful publication.
    PublishConfirmation,
}

impl ResponseTemplate {
    /// Stable key, used in logs and by collaborator implementations.
    pub fn key(&self) -> &'static str {
        match self {
            ResponseTemplate::Welcome => "welcome",
            ResponseTemplate::RequestMissing => "request_missing",
            ResponseTemplate::CaptureComplete => "capture_complete",
            ResponseTemplate::PublishConfirmation => "publish_confirmation",
        }
    }

    /// Deterministic fallback text for this template.
    ///
    /// This is a contractual part of the interface: whenever the
    /// collaborator fails, this exact text is sent.
    pub fn fallback(&self, record: &CaptureRecord) -> String {
        match self {
            ResponseTemplate::Welcome => "\
¡Hola! 👋 Soy tu asistente de captación.

📸 Mándame fotos de la propiedad
🎙️ Graba un audio describiendo el depa
📍 Comparte la ubicación
✍️ O escríbeme los datos directamente

¡Empecemos! ¿Qué propiedad vamos a captar?"
                .to_string(),
            ResponseTemplate::RequestMissing => {
                let missing: Vec<&str> =
                    record.missing_required().iter().map(|f| f.label()).collect();
                if missing.is_empty() {
                    "Necesito revisar algunos datos antes de poder publicar.".to_string()
                } else {
                    format!("📝 Me falta: {}. ¿Me ayudas con eso?", missing.join(", "))
                }
            }
            ResponseTemplate::CaptureComplete => {
                "✅ ¡Tengo todos los datos! ¿Publicamos la propiedad?".to_string()
            }
            ResponseTemplate::PublishConfirmation => {
                let links: Vec<String> = record
                    .publication()
                    .iter()
                    .filter(|o| o.success)
                    .filter_map(|o| o.url.clone())
                    .collect();
                if links.is_empty() {
                    "🎉 ¡Publicado con éxito!".to_string()
                } else {
                    format!("🎉 ¡Publicado con éxito!\n{}", links.join("\n"))
                }
            }
        }
    }
}

/// Port for the response-generation collaborator.
#[async_trait]
pub trait ResponseGenerator: Send + Sync {
    /// Generates chat text for the given template and record.
    async fn generate(
        &self,
        template: ResponseTemplate,
        record: &CaptureRecord,
    ) -> Result<String, ResponseError>;
}

/// Response-generation failures. All of them resolve to the template
/// fallback; none propagate.
#[derive(Debug, thiserror::Error)]
pub enum ResponseError {
    #[error("response generation unavailable: {0}")]
    Unavailable(String),

    #[error("empty response from generator")]
    Empty,
}

impl ResponseError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }
}
