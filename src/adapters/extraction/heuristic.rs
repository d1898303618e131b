//! Heuristic Extractor - deterministic regex extraction for Chilean
//! listing shorthand.
//!
//! Good enough for direct text messages ("depa 2 dormitorios, 3500 UF,
//! 60m2, 1 baño") and for running without any external AI dependency.
//! Sacred fields are extracted only when an explicit unit or marker is
//! present: a bare number is never interpreted as a price.

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::domain::capture::{Currency, ListingFields, OperationKind, Price, PropertyKind};
use crate::domain::foundation::MediaRef;
use crate::ports::{ExtractionError, FieldExtractor};

static PRICE_UF: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d{1,3}(?:\.\d{3})+|\d+(?:,\d+)?)\s*uf\b").unwrap());
static PRICE_MILLIONS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:palos?|millones?)\b").unwrap());
static PRICE_PESOS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\s*(\d{1,3}(?:\.\d{3})+|\d+)").unwrap());
static AREA_M2: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:m2|m²|mts?2?|metros?)\b").unwrap());
static BEDROOMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:dormitorios?|dorms?|piezas?|habitaciones?)\b").unwrap());
static BATHROOMS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*(?:baños?|banos?)\b").unwrap());
static PARKING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(\d+)\s*estacionamientos?\b").unwrap());
static STORAGE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bbodega\b").unwrap());

/// Maximum summary length carried from the raw text.
const SUMMARY_MAX_CHARS: usize = 200;

/// Regex-based local extractor.
#[derive(Debug, Clone, Default)]
pub struct HeuristicExtractor;

impl HeuristicExtractor {
    pub fn new() -> Self {
        Self
    }

    fn extract(text: &str) -> ListingFields {
        let mut fields = ListingFields::default();

        if let Some(caps) = PRICE_UF.captures(text) {
            fields.price = Price {
                amount: parse_decimal(&caps[1]),
                currency: Some(Currency::Uf),
            };
        } else if let Some(caps) = PRICE_MILLIONS.captures(text) {
            fields.price = Price {
                amount: parse_decimal(&caps[1]).map(|v| v * 1_000_000.0),
                currency: Some(Currency::Clp),
            };
        } else if let Some(caps) = PRICE_PESOS.captures(text) {
            fields.price = Price {
                amount: parse_decimal(&caps[1]),
                currency: Some(Currency::Clp),
            };
        }

        if let Some(caps) = AREA_M2.captures(text) {
            fields.area.total = parse_decimal(&caps[1]);
        }
        if let Some(caps) = BEDROOMS.captures(text) {
            fields.bedrooms = caps[1].parse().ok();
        }
        if let Some(caps) = BATHROOMS.captures(text) {
            fields.bathrooms = caps[1].parse().ok();
        }
        if let Some(caps) = PARKING.captures(text) {
            fields.parking_spots = caps[1].parse().ok();
        }
        if STORAGE.is_match(text) {
            fields.storage = Some(true);
        }

        fields.kind = detect_kind(text);
        fields.operation = detect_operation(text);
        fields.summary = Some(text.chars().take(SUMMARY_MAX_CHARS).collect());

        fields
    }
}

#[async_trait]
impl FieldExtractor for HeuristicExtractor {
    async fn extract_text(&self, text: &str) -> Result<ListingFields, ExtractionError> {
        let fields = Self::extract(text);
        debug!(
            price = ?fields.price.amount,
            area = ?fields.area.total,
            bathrooms = ?fields.bathrooms,
            "heuristic extraction done"
        );
        Ok(fields)
    }

    async fn extract_audio(&self, _media: &MediaRef) -> Result<ListingFields, ExtractionError> {
        // No local transcription: acknowledge the audio without inventing
        // any data.
        Ok(ListingFields {
            summary: Some("Audio recibido - pendiente procesamiento".to_string()),
            ..Default::default()
        })
    }
}

/// Parses Chilean-formatted numbers: "3.500" (thousands dots) and
/// "2,5" (decimal comma).
fn parse_decimal(raw: &str) -> Option<f64> {
    let normalized = if raw.contains('.') && raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else if raw.contains('.') {
        raw.replace('.', "")
    } else {
        raw.replace(',', ".")
    };
    normalized.parse().ok()
}

fn detect_kind(text: &str) -> Option<PropertyKind> {
    static KIND_PATTERNS: Lazy<Vec<(Regex, PropertyKind)>> = Lazy::new(|| {
        vec![
            (
                Regex::new(r"(?i)\b(?:depa|departamento)\b").unwrap(),
                PropertyKind::Apartment,
            ),
            (Regex::new(r"(?i)\bcasa\b").unwrap(), PropertyKind::House),
            (Regex::new(r"(?i)\boficina\b").unwrap(), PropertyKind::Office),
            (Regex::new(r"(?i)\bterreno\b").unwrap(), PropertyKind::Land),
            (Regex::new(r"(?i)\blocal\b").unwrap(), PropertyKind::Commercial),
        ]
    });

    KIND_PATTERNS
        .iter()
        .find(|(pattern, _)| pattern.is_match(text))
        .map(|(_, kind)| *kind)
}

fn detect_operation(text: &str) -> Option<OperationKind> {
    static SALE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\b(?:venta|vendo)\b").unwrap());
    static RENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\barr(?:iendo|endar)\b").unwrap());

    if SALE.is_match(text) {
        Some(OperationKind::Sale)
    } else if RENT.is_match(text) {
        Some(OperationKind::Rent)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn extract(text: &str) -> ListingFields {
        HeuristicExtractor::new().extract_text(text).await.unwrap()
    }

    #[tokio::test]
    async fn extracts_the_classic_shorthand_message() {
        let fields = extract("depa 2 dormitorios, 3500 UF, 60m2, 1 baño").await;

        assert_eq!(fields.price.amount, Some(3500.0));
        assert_eq!(fields.price.currency, Some(Currency::Uf));
        assert_eq!(fields.area.total, Some(60.0));
        assert_eq!(fields.bedrooms, Some(2));
        assert_eq!(fields.bathrooms, Some(1));
        assert_eq!(fields.kind, Some(PropertyKind::Apartment));
        assert!(fields.address.street.is_none());
    }

    #[tokio::test]
    async fn bare_numbers_are_never_a_price() {
        let fields = extract("2 dormitorios y 60 metros").await;
        assert!(fields.price.amount.is_none());
        assert!(fields.price.currency.is_none());
    }

    #[tokio::test]
    async fn dotted_thousands_parse() {
        let fields = extract("vendo casa en 5.500 UF").await;
        assert_eq!(fields.price.amount, Some(5500.0));
        assert_eq!(fields.operation, Some(OperationKind::Sale));
        assert_eq!(fields.kind, Some(PropertyKind::House));
    }

    #[tokio::test]
    async fn palos_multiply_to_clp_millions() {
        let fields = extract("150 palos el depa").await;
        assert_eq!(fields.price.amount, Some(150_000_000.0));
        assert_eq!(fields.price.currency, Some(Currency::Clp));
    }

    #[tokio::test]
    async fn peso_amounts_with_sign_parse() {
        let fields = extract("precio $185.000.000 conversable").await;
        assert_eq!(fields.price.amount, Some(185_000_000.0));
        assert_eq!(fields.price.currency, Some(Currency::Clp));
    }

    #[tokio::test]
    async fn storage_and_parking_are_detected() {
        let fields = extract("2 estacionamientos y bodega").await;
        assert_eq!(fields.parking_spots, Some(2));
        assert_eq!(fields.storage, Some(true));
    }

    #[tokio::test]
    async fn summary_is_capped() {
        let long = "x".repeat(500);
        let fields = extract(&long).await;
        assert_eq!(fields.summary.unwrap().chars().count(), 200);
    }

    #[tokio::test]
    async fn audio_yields_no_fabricated_fields() {
        let fields = HeuristicExtractor::new()
            .extract_audio(&MediaRef::new("audio-1"))
            .await
            .unwrap();

        assert!(fields.price.amount.is_none());
        assert!(fields.bathrooms.is_none());
        assert!(fields.summary.unwrap().contains("Audio recibido"));
    }
}
