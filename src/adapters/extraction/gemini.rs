//! Gemini Extractor - LLM-backed field extraction for text and audio.

use async_trait::async_trait;
use tracing::warn;

use crate::adapters::gemini::{strip_code_fences, GeminiClient, GeminiError, GenerationOptions};
use crate::domain::capture::{validate, ListingFields};
use crate::domain::foundation::MediaRef;
use crate::ports::{ExtractionError, FieldExtractor};

/// Extraction instruction. The hard rules matter more than the wording:
/// unmentioned fields must come back null, and price, m² and bathrooms are
/// only ever extracted when explicitly stated.
const EXTRACTION_PROMPT: &str = r#"Eres un experto en extracción de datos inmobiliarios de Chile.
Analiza el siguiente texto (transcripción de audio o mensaje directo) y extrae la información de la propiedad.

REGLAS CRÍTICAS:
1. NO alucines datos. Si algo no se menciona, déjalo null.
2. Precio, m² y baños son SAGRADOS - solo extráelos si se mencionan explícitamente.
3. Interpreta jerga chilena: "depa" = departamento, "estaciona" = estacionamiento, etc.
4. Para precios: "150 palos" = 150.000.000 CLP, "2.500 UF" = 2500 UF.

Texto a analizar:
---
{input}
---

Responde SOLO con un JSON válido con esta estructura:
{
  "kind": "departamento|casa|oficina|terreno|local|null",
  "operation": "venta|arriendo|null",
  "price": { "amount": number|null, "currency": "CLP|UF|USD|null" },
  "area": { "total": number|null, "usable": number|null },
  "bedrooms": number|null,
  "bathrooms": number|null,
  "parking_spots": number|null,
  "storage": boolean|null,
  "address": {
    "street": "string|null",
    "number": "string|null",
    "district": "string|null"
  },
  "summary": "resumen breve de lo mencionado",
  "selling_points": ["array de puntos destacados mencionados"]
}"#;

/// Audio variant of the instruction, applied to the attached voice note.
const AUDIO_PROMPT_PREFIX: &str =
    "Transcribe el audio adjunto y luego sigue estas instrucciones.\n\n";

const EXTRACTION_OPTIONS: GenerationOptions = GenerationOptions {
    temperature: 0.2,
    max_output_tokens: 2048,
    top_p: 0.95,
};

/// MIME type WhatsApp voice notes arrive as.
const AUDIO_MIME_TYPE: &str = "audio/ogg";

/// LLM-backed extraction collaborator.
pub struct GeminiExtractor {
    client: std::sync::Arc<GeminiClient>,
}

impl GeminiExtractor {
    pub fn new(client: std::sync::Arc<GeminiClient>) -> Self {
        Self { client }
    }

    fn parse(&self, raw: &str) -> Result<ListingFields, ExtractionError> {
        let json = strip_code_fences(raw);
        let fields: ListingFields = serde_json::from_str(json)
            .map_err(|e| ExtractionError::unparsable(e.to_string()))?;

        // Advisory only; implausible values are handled by the policy.
        let report = validate(&fields);
        if !report.is_ok() {
            warn!(errors = report.errors.len(), "extraction came back with implausible values");
        }

        Ok(fields)
    }
}

#[async_trait]
impl FieldExtractor for GeminiExtractor {
    async fn extract_text(&self, text: &str) -> Result<ListingFields, ExtractionError> {
        let prompt = EXTRACTION_PROMPT.replace("{input}", text);
        let raw = self
            .client
            .generate_text(&prompt, EXTRACTION_OPTIONS)
            .await
            .map_err(into_extraction_error)?;
        self.parse(&raw)
    }

    async fn extract_audio(&self, media: &MediaRef) -> Result<ListingFields, ExtractionError> {
        let prompt = format!(
            "{}{}",
            AUDIO_PROMPT_PREFIX,
            EXTRACTION_PROMPT.replace("{input}", "(contenido del audio adjunto)")
        );
        let raw = self
            .client
            .generate_with_audio(&prompt, media.as_str(), AUDIO_MIME_TYPE, EXTRACTION_OPTIONS)
            .await
            .map_err(into_extraction_error)?;
        self.parse(&raw)
    }
}

fn into_extraction_error(err: GeminiError) -> ExtractionError {
    match err {
        GeminiError::Parse(message) | GeminiError::Api { message, .. } => {
            ExtractionError::unparsable(message)
        }
        GeminiError::Empty => ExtractionError::unparsable("empty completion"),
        other => ExtractionError::unavailable(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gemini::GeminiConfig;
    use crate::domain::capture::Currency;

    fn extractor() -> GeminiExtractor {
        GeminiExtractor::new(std::sync::Arc::new(GeminiClient::new(GeminiConfig::new(
            "test-key",
        ))))
    }

    #[test]
    fn parses_a_model_response_with_fences() {
        let raw = r#"```json
{
  "kind": "departamento",
  "operation": "venta",
  "price": { "amount": 3500, "currency": "UF" },
  "area": { "total": 60, "usable": null },
  "bedrooms": 2,
  "bathrooms": 1,
  "parking_spots": null,
  "storage": null,
  "address": { "street": null, "number": null, "district": "Ñuñoa" },
  "summary": "Depa en Ñuñoa",
  "selling_points": ["cerca del metro"]
}
```"#;

        let fields = extractor().parse(raw).unwrap();
        assert_eq!(fields.price.amount, Some(3500.0));
        assert_eq!(fields.price.currency, Some(Currency::Uf));
        assert_eq!(fields.address.district.as_deref(), Some("Ñuñoa"));
        assert_eq!(fields.selling_points, vec!["cerca del metro".to_string()]);
    }

    #[test]
    fn explicit_nulls_stay_absent() {
        let raw = r#"{
  "kind": null,
  "operation": null,
  "price": { "amount": null, "currency": null },
  "area": { "total": null, "usable": null },
  "bedrooms": null,
  "bathrooms": null,
  "parking_spots": null,
  "storage": null,
  "address": { "street": null, "number": null, "district": null },
  "summary": null,
  "selling_points": []
}"#;

        let fields = extractor().parse(raw).unwrap();
        assert_eq!(fields, ListingFields::default());
    }

    #[test]
    fn garbage_output_is_an_unparsable_error() {
        let err = extractor().parse("lo siento, no puedo ayudar").unwrap_err();
        assert!(matches!(err, ExtractionError::Unparsable(_)));
    }
}
