//! Gemini Responder - contextual chat replies in the assistant's voice.
//!
//! Only enriches wording; which template to send was already decided by
//! the orchestrator, and every failure here falls back to the template's
//! fixed text upstream.

use async_trait::async_trait;

use crate::adapters::gemini::{GeminiClient, GeminiError, GenerationOptions};
use crate::domain::capture::CaptureRecord;
use crate::ports::{ResponseError, ResponseGenerator, ResponseTemplate};

const WELCOME_PROMPT: &str = r#"Eres un asistente de captación inmobiliaria amigable y eficiente.
Tu rol es ayudar a corredores a captar propiedades de forma fácil.

El corredor acaba de iniciar una nueva captación.
Dale la bienvenida y explica brevemente qué puede hacer:
- Enviar audio describiendo la propiedad
- Enviar fotos
- Compartir ubicación
- Escribir datos directamente

Sé breve, amigable y usa emojis. Habla en español chileno informal pero profesional."#;

const REQUEST_MISSING_PROMPT: &str = r#"Eres un asistente de captación inmobiliaria.
El corredor está captando una propiedad. Aquí están los datos que ya tenemos:

{current_data}

Y estos son los campos que aún faltan:
{missing_fields}

Genera un mensaje breve pidiendo la información faltante de forma amigable.
Da tips si aplica (ej: "puedes enviar un audio describiendo el depa").
Usa español chileno informal pero profesional, con emojis."#;

const CAPTURE_COMPLETE_PROMPT: &str = r#"Eres un asistente de captación inmobiliaria.
El corredor ha completado la captación con estos datos:

{current_data}

Genera un resumen de la propiedad y pregunta si quiere publicar.
Muestra los datos de forma clara y ordenada.
Usa español chileno informal pero profesional."#;

const PUBLISH_CONFIRMATION_PROMPT: &str = r#"Eres un asistente de captación inmobiliaria.
La propiedad ha sido publicada exitosamente en:
{destinations}

Genera un mensaje de confirmación breve y celebratorio.
Incluye los links si están disponibles."#;

/// LLM-backed response generation collaborator.
pub struct GeminiResponder {
    client: std::sync::Arc<GeminiClient>,
}

impl GeminiResponder {
    pub fn new(client: std::sync::Arc<GeminiClient>) -> Self {
        Self { client }
    }

    fn prompt_for(template: ResponseTemplate, record: &CaptureRecord) -> String {
        let current_data =
            serde_json::to_string_pretty(record.fields()).unwrap_or_else(|_| "{}".to_string());

        match template {
            ResponseTemplate::Welcome => WELCOME_PROMPT.to_string(),
            ResponseTemplate::RequestMissing => {
                let missing: Vec<&str> =
                    record.missing_required().iter().map(|f| f.label()).collect();
                REQUEST_MISSING_PROMPT
                    .replace("{current_data}", &current_data)
                    .replace("{missing_fields}", &missing.join(", "))
            }
            ResponseTemplate::CaptureComplete => {
                CAPTURE_COMPLETE_PROMPT.replace("{current_data}", &current_data)
            }
            ResponseTemplate::PublishConfirmation => {
                let destinations: Vec<String> = record
                    .publication()
                    .iter()
                    .filter(|o| o.success)
                    .map(|o| match &o.url {
                        Some(url) => format!("{} ({})", o.destination, url),
                        None => o.destination.clone(),
                    })
                    .collect();
                PUBLISH_CONFIRMATION_PROMPT.replace("{destinations}", &destinations.join("\n"))
            }
        }
    }
}

#[async_trait]
impl ResponseGenerator for GeminiResponder {
    async fn generate(
        &self,
        template: ResponseTemplate,
        record: &CaptureRecord,
    ) -> Result<String, ResponseError> {
        let prompt = Self::prompt_for(template, record);
        match self
            .client
            .generate_text(&prompt, GenerationOptions::default())
            .await
        {
            Ok(text) => Ok(text),
            Err(GeminiError::Empty) => Err(ResponseError::Empty),
            Err(err) => Err(ResponseError::unavailable(err.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::{Area, ListingFields, Price};
    use crate::domain::foundation::{BrokerId, ChannelAddress};
    use crate::domain::listing::PublicationOutcome;

    fn record() -> CaptureRecord {
        CaptureRecord::new(
            BrokerId::new("b1").unwrap(),
            ChannelAddress::new("569").unwrap(),
        )
    }

    #[test]
    fn request_missing_prompt_embeds_data_and_gaps() {
        let mut record = record();
        record.apply_extraction(ListingFields {
            price: Price {
                amount: Some(3500.0),
                currency: None,
            },
            area: Area {
                total: Some(60.0),
                usable: None,
            },
            ..Default::default()
        });

        let prompt = GeminiResponder::prompt_for(ResponseTemplate::RequestMissing, &record);
        assert!(prompt.contains("3500"));
        assert!(prompt.contains("baños, dirección"));
    }

    #[test]
    fn publish_confirmation_prompt_lists_successful_destinations() {
        let mut record = record();
        record.attach_publication(vec![
            PublicationOutcome::success("prop360", "p-1", "https://prop360.cl/p/1"),
            PublicationOutcome::failure("portal", "timeout"),
        ]);

        let prompt = GeminiResponder::prompt_for(ResponseTemplate::PublishConfirmation, &record);
        assert!(prompt.contains("prop360 (https://prop360.cl/p/1)"));
        assert!(!prompt.contains("portal"));
    }
}
