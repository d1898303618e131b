//! WhatsApp Cloud API webhook: verification handshake and inbound
//! message intake.
//!
//! Normalizes Cloud API payloads into `InboundMessage` before invoking
//! the orchestrator, and sends replies back through the Cloud API client.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::application::handlers::{ProcessInboundCommand, ProcessInboundHandler};
use crate::domain::capture::InboundMessage;
use crate::domain::foundation::{BrokerId, ChannelAddress, MediaRef};

use super::client::WhatsAppClient;
use super::signature::SignatureVerifier;

/// Shared state for the WhatsApp webhook routes.
#[derive(Clone)]
pub struct WhatsAppWebhookState {
    pub handler: Arc<ProcessInboundHandler>,
    pub client: Arc<WhatsAppClient>,
    pub verify_token: String,
    /// Absent disables signature checks (local development only).
    pub verifier: Option<Arc<SignatureVerifier>>,
}

/// Routes for the WhatsApp webhook.
pub fn whatsapp_webhook_router(state: WhatsAppWebhookState) -> Router {
    Router::new()
        .route("/webhook/whatsapp", get(verify).post(receive))
        .with_state(state)
}

#[derive(Debug, Deserialize)]
struct VerifyParams {
    #[serde(rename = "hub.mode")]
    mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    challenge: Option<String>,
}

/// Meta's webhook verification handshake.
async fn verify(
    State(state): State<WhatsAppWebhookState>,
    Query(params): Query<VerifyParams>,
) -> Response {
    let subscribed = params.mode.as_deref() == Some("subscribe")
        && params.verify_token.as_deref() == Some(state.verify_token.as_str());

    if subscribed {
        info!("whatsapp webhook verified");
        (StatusCode::OK, params.challenge.unwrap_or_default()).into_response()
    } else {
        warn!("whatsapp webhook verification failed");
        StatusCode::FORBIDDEN.into_response()
    }
}

/// Inbound message deliveries.
async fn receive(
    State(state): State<WhatsAppWebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> StatusCode {
    if let Some(verifier) = &state.verifier {
        let header = headers
            .get("x-hub-signature-256")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if let Err(err) = verifier.verify(&body, header) {
            warn!(error = %err, "rejected unsigned whatsapp delivery");
            return StatusCode::FORBIDDEN;
        }
    }

    let envelope: WebhookEnvelope = match serde_json::from_slice(&body) {
        Ok(envelope) => envelope,
        Err(err) => {
            warn!(error = %err, "unparsable whatsapp payload");
            return StatusCode::BAD_REQUEST;
        }
    };

    if envelope.object != "whatsapp_business_account" {
        return StatusCode::NOT_FOUND;
    }

    for entry in envelope.entry {
        for change in entry.changes {
            if change.field != "messages" {
                continue;
            }
            process_change(&state, change.value).await;
        }
    }

    StatusCode::OK
}

async fn process_change(state: &WhatsAppWebhookState, value: ChangeValue) {
    for message in &value.messages {
        let normalized = match normalize_message(message) {
            Some(normalized) => normalized,
            None => {
                debug!(message_id = %message.id, "skipping message without usable sender");
                continue;
            }
        };

        let contact_name = value
            .contacts
            .iter()
            .find(|c| c.wa_id == message.from)
            .and_then(|c| c.profile.as_ref())
            .map(|p| p.name.clone());
        // The sender is known non-empty here; an empty contact name falls
        // back to it.
        let broker_id = match contact_name
            .and_then(|name| BrokerId::new(name).ok())
            .or_else(|| BrokerId::new(message.from.clone()).ok())
        {
            Some(broker_id) => broker_id,
            None => continue,
        };

        info!(
            channel_address = %normalized.from,
            kind = normalized.kind(),
            "whatsapp message received"
        );

        let address = normalized.from.clone();
        match state
            .handler
            .execute(ProcessInboundCommand {
                broker_id,
                message: normalized,
            })
            .await
        {
            Ok(result) if !result.reply.is_empty() => {
                if let Err(err) = state.client.send_text(address.as_str(), &result.reply).await {
                    warn!(error = %err, "failed to send whatsapp reply");
                }
            }
            Ok(_) => {}
            Err(err) => warn!(error = %err, "inbound processing failed"),
        }
    }
}

/// Translates one Cloud API message into the normalized shape.
fn normalize_message(message: &WaMessage) -> Option<InboundMessage> {
    let from = ChannelAddress::new(message.from.clone()).ok()?;

    let normalized = match message.kind.as_str() {
        "text" => InboundMessage::text(
            message.id.as_str(),
            from,
            message.text.as_ref().map(|t| t.body.clone()).unwrap_or_default(),
        ),
        "audio" => InboundMessage::audio(
            message.id.as_str(),
            from,
            MediaRef::new(message.audio.as_ref().map(|m| m.id.clone()).unwrap_or_default()),
        ),
        "image" => InboundMessage::image(
            message.id.as_str(),
            from,
            MediaRef::new(message.image.as_ref().map(|m| m.id.clone()).unwrap_or_default()),
        ),
        "location" => match &message.location {
            Some(location) => {
                InboundMessage::location(message.id.as_str(), from, location.latitude, location.longitude)
            }
            None => InboundMessage::unknown(message.id.as_str(), from),
        },
        _ => InboundMessage::unknown(message.id.as_str(), from),
    };

    Some(normalized)
}

// --- Cloud API wire types ---

#[derive(Debug, Deserialize)]
struct WebhookEnvelope {
    #[serde(default)]
    object: String,
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    changes: Vec<Change>,
}

#[derive(Debug, Deserialize)]
struct Change {
    #[serde(default)]
    field: String,
    value: ChangeValue,
}

#[derive(Debug, Default, Deserialize)]
struct ChangeValue {
    #[serde(default)]
    messages: Vec<WaMessage>,
    #[serde(default)]
    contacts: Vec<WaContact>,
}

#[derive(Debug, Deserialize)]
struct WaContact {
    #[serde(default)]
    wa_id: String,
    profile: Option<WaProfile>,
}

#[derive(Debug, Deserialize)]
struct WaProfile {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct WaMessage {
    #[serde(default)]
    id: String,
    #[serde(default)]
    from: String,
    #[serde(rename = "type", default)]
    kind: String,
    text: Option<WaText>,
    audio: Option<WaMedia>,
    image: Option<WaMedia>,
    location: Option<WaLocation>,
}

#[derive(Debug, Deserialize)]
struct WaText {
    #[serde(default)]
    body: String,
}

#[derive(Debug, Deserialize)]
struct WaMedia {
    #[serde(default)]
    id: String,
}

#[derive(Debug, Deserialize)]
struct WaLocation {
    #[serde(default)]
    latitude: f64,
    #[serde(default)]
    longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::capture::MessagePayload;

    fn message(kind: &str) -> WaMessage {
        WaMessage {
            id: "wamid.1".to_string(),
            from: "56912345678".to_string(),
            kind: kind.to_string(),
            text: Some(WaText {
                body: "hola".to_string(),
            }),
            audio: Some(WaMedia {
                id: "audio-1".to_string(),
            }),
            image: Some(WaMedia {
                id: "image-1".to_string(),
            }),
            location: Some(WaLocation {
                latitude: -33.4,
                longitude: -70.6,
            }),
        }
    }

    #[test]
    fn normalizes_every_known_kind() {
        assert!(matches!(
            normalize_message(&message("text")).unwrap().payload,
            MessagePayload::Text { .. }
        ));
        assert!(matches!(
            normalize_message(&message("audio")).unwrap().payload,
            MessagePayload::Audio { .. }
        ));
        assert!(matches!(
            normalize_message(&message("image")).unwrap().payload,
            MessagePayload::Image { .. }
        ));
        assert!(matches!(
            normalize_message(&message("location")).unwrap().payload,
            MessagePayload::Location { .. }
        ));
    }

    #[test]
    fn unrecognized_kind_normalizes_to_unknown() {
        let normalized = normalize_message(&message("sticker")).unwrap();
        assert!(matches!(normalized.payload, MessagePayload::Unknown));
    }

    #[test]
    fn empty_sender_is_skipped() {
        let mut msg = message("text");
        msg.from = String::new();
        assert!(normalize_message(&msg).is_none());
    }

    #[test]
    fn cloud_api_envelope_parses() {
        let json = r#"{
            "object": "whatsapp_business_account",
            "entry": [{
                "id": "1",
                "changes": [{
                    "field": "messages",
                    "value": {
                        "messaging_product": "whatsapp",
                        "contacts": [{"wa_id": "56912345678", "profile": {"name": "Caro"}}],
                        "messages": [{
                            "id": "wamid.1",
                            "from": "56912345678",
                            "timestamp": "1700000000",
                            "type": "text",
                            "text": {"body": "vendo depa"}
                        }]
                    }
                }]
            }]
        }"#;

        let envelope: WebhookEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.object, "whatsapp_business_account");
        let change = &envelope.entry[0].changes[0];
        assert_eq!(change.field, "messages");
        assert_eq!(change.value.messages[0].text.as_ref().unwrap().body, "vendo depa");
        assert_eq!(
            change.value.contacts[0].profile.as_ref().unwrap().name,
            "Caro"
        );
    }
}
