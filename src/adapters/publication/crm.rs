//! CRM Publisher - assembles the finished listing and pushes it to every
//! configured destination catalog.
//!
//! Per-destination failures land inside the returned outcome list, in
//! configuration order. Copy generation and the neighborhood lookup are
//! best-effort: both fall back (deterministic copy, no selling points)
//! without failing the run.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use tracing::{info, warn};

use crate::adapters::gemini::{strip_code_fences, GeminiClient, GenerationOptions};
use crate::adapters::geo::MapsClient;
use crate::domain::capture::CaptureRecord;
use crate::domain::listing::{Listing, ListingCopy, PublicationOutcome};
use crate::ports::{ListingPublisher, PublicationError};

const COPY_PROMPT: &str = r#"Eres un experto copywriter inmobiliario en Chile.
Genera una publicación profesional y atractiva para la siguiente propiedad.

Datos de la propiedad:
{fields}

USPs del barrio:
{usps}

Genera un JSON con:
{
  "title": "Título atractivo de máximo 80 caracteres",
  "description": "Descripción de 3-4 párrafos, profesional pero cálida. Destaca los puntos fuertes.",
  "hashtags": ["array de 5 hashtags relevantes"]
}

Usa español chileno profesional. No inventes datos que no estén en la información proporcionada."#;

/// One destination catalog.
#[derive(Debug, Clone)]
pub struct CrmDestination {
    pub name: String,
    pub base_url: String,
    pub api_key: Secret<String>,
}

impl CrmDestination {
    pub fn new(
        name: impl Into<String>,
        base_url: impl Into<String>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            api_key: Secret::new(api_key.into()),
        }
    }
}

/// Publication collaborator pushing to external CRM catalogs.
pub struct CrmPublisher {
    destinations: Vec<CrmDestination>,
    /// Copy generation; absent means deterministic fallback copy.
    gemini: Option<Arc<GeminiClient>>,
    /// Neighborhood selling points; absent means none.
    maps: Option<Arc<MapsClient>>,
    client: Client,
}

impl CrmPublisher {
    pub fn new(destinations: Vec<CrmDestination>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            destinations,
            gemini: None,
            maps: None,
            client,
        }
    }

    pub fn with_gemini(mut self, gemini: Arc<GeminiClient>) -> Self {
        self.gemini = Some(gemini);
        self
    }

    pub fn with_maps(mut self, maps: Arc<MapsClient>) -> Self {
        self.maps = Some(maps);
        self
    }

    async fn neighborhood_usps(&self, record: &CaptureRecord) -> Vec<String> {
        let coordinates = match record.fields().address.coordinates {
            Some(coordinates) => coordinates,
            None => return Vec::new(),
        };
        let maps = match &self.maps {
            Some(maps) => maps,
            None => return Vec::new(),
        };

        match maps.neighborhood_usps(&coordinates).await {
            Ok(usps) => usps,
            Err(err) => {
                warn!(error = %err, "could not resolve neighborhood selling points");
                Vec::new()
            }
        }
    }

    async fn generate_copy(&self, record: &CaptureRecord, usps: &[String]) -> ListingCopy {
        let gemini = match &self.gemini {
            Some(gemini) => gemini,
            None => return ListingCopy::fallback(record.fields()),
        };

        let fields_json =
            serde_json::to_string_pretty(record.fields()).unwrap_or_else(|_| "{}".to_string());
        let prompt = COPY_PROMPT
            .replace("{fields}", &fields_json)
            .replace("{usps}", &usps.join("\n"));

        match gemini
            .generate_text(&prompt, GenerationOptions::default())
            .await
        {
            Ok(raw) => match serde_json::from_str::<ListingCopy>(strip_code_fences(&raw)) {
                Ok(copy) => copy,
                Err(err) => {
                    warn!(error = %err, "unparsable listing copy, using fallback");
                    ListingCopy::fallback(record.fields())
                }
            },
            Err(err) => {
                warn!(error = %err, "copy generation failed, using fallback");
                ListingCopy::fallback(record.fields())
            }
        }
    }

    async fn push(&self, destination: &CrmDestination, listing: &Listing) -> PublicationOutcome {
        let url = format!("{}/listings", destination.base_url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(destination.api_key.expose_secret())
            .json(listing)
            .send()
            .await;

        match response {
            Ok(response) if response.status().is_success() => {
                match response.json::<CrmPushResponse>().await {
                    Ok(body) => PublicationOutcome {
                        destination: destination.name.clone(),
                        success: true,
                        id: body.id,
                        url: body.url,
                        error: None,
                    },
                    Err(err) => {
                        PublicationOutcome::failure(&destination.name, err.to_string())
                    }
                }
            }
            Ok(response) => PublicationOutcome::failure(
                &destination.name,
                format!("status {}", response.status()),
            ),
            Err(err) => PublicationOutcome::failure(&destination.name, err.to_string()),
        }
    }
}

#[async_trait]
impl ListingPublisher for CrmPublisher {
    async fn publish(
        &self,
        record: &CaptureRecord,
    ) -> Result<Vec<PublicationOutcome>, PublicationError> {
        if self.destinations.is_empty() {
            return Err(PublicationError::NoDestinations);
        }

        info!(capture_id = %record.id(), "starting publication");

        let usps = self.neighborhood_usps(record).await;
        let copy = self.generate_copy(record, &usps).await;
        let listing = Listing::from_capture(record, copy, usps);

        let mut outcomes = Vec::with_capacity(self.destinations.len());
        for destination in &self.destinations {
            let outcome = self.push(destination, &listing).await;
            info!(
                destination = %outcome.destination,
                success = outcome.success,
                "destination push finished"
            );
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}

#[derive(Debug, Deserialize)]
struct CrmPushResponse {
    id: Option<String>,
    url: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{BrokerId, ChannelAddress};

    fn record() -> CaptureRecord {
        CaptureRecord::new(
            BrokerId::new("b1").unwrap(),
            ChannelAddress::new("569").unwrap(),
        )
    }

    #[tokio::test]
    async fn no_destinations_is_a_whole_run_failure() {
        let publisher = CrmPublisher::new(Vec::new());
        let result = publisher.publish(&record()).await;
        assert!(matches!(result, Err(PublicationError::NoDestinations)));
    }

    #[tokio::test]
    async fn unreachable_destination_lands_in_the_outcome_list() {
        let publisher = CrmPublisher::new(vec![CrmDestination::new(
            "prop360",
            // Nothing listens on this port; the connection is refused.
            "http://127.0.0.1:1",
            "key",
        )]);

        let outcomes = publisher.publish(&record()).await.unwrap();

        assert_eq!(outcomes.len(), 1);
        assert_eq!(outcomes[0].destination, "prop360");
        assert!(!outcomes[0].success);
        assert!(outcomes[0].error.is_some());
    }

    #[tokio::test]
    async fn copy_falls_back_without_a_generator() {
        let publisher = CrmPublisher::new(vec![CrmDestination::new(
            "prop360",
            "http://127.0.0.1:1",
            "key",
        )]);

        let copy = publisher.generate_copy(&record(), &[]).await;
        assert_eq!(copy.title, "Propiedad");
    }

    #[tokio::test]
    async fn no_coordinates_means_no_usps() {
        let publisher = CrmPublisher::new(Vec::new());
        let usps = publisher.neighborhood_usps(&record()).await;
        assert!(usps.is_empty());
    }
}
