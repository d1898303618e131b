//! Callbell webhook: inbound `message_created` events.
//!
//! Only inbound messages (`direction: "in"`) are processed; status
//! updates and our own outbound messages are acknowledged and dropped.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::application::handlers::{ProcessInboundCommand, ProcessInboundHandler};
use crate::domain::capture::InboundMessage;
use crate::domain::foundation::{BrokerId, ChannelAddress, MediaRef};

use super::client::CallbellClient;

/// Shared state for the Callbell webhook route.
#[derive(Clone)]
pub struct CallbellWebhookState {
    pub handler: Arc<ProcessInboundHandler>,
    pub client: Arc<CallbellClient>,
}

/// Routes for the Callbell webhook.
pub fn callbell_webhook_router(state: CallbellWebhookState) -> Router {
    Router::new()
        .route("/webhook/callbell", post(receive))
        .with_state(state)
}

async fn receive(
    State(state): State<CallbellWebhookState>,
    Json(event): Json<CallbellEvent>,
) -> (StatusCode, Json<Value>) {
    match event.kind.as_str() {
        "message_created" => {
            if let Some(payload) = event.payload {
                process_event(&state, payload).await;
            }
        }
        "message_status_updated" => {
            debug!("message status update ignored");
        }
        other => {
            debug!(kind = other, "unhandled callbell event");
        }
    }

    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

async fn process_event(state: &CallbellWebhookState, payload: EventPayload) {
    // Only inbound traffic; our own sends echo back with direction "out".
    if payload.message.direction != "in" {
        return;
    }

    let address = match ChannelAddress::new(payload.contact.phone.clone()) {
        Ok(address) => address,
        Err(_) => {
            warn!("callbell event without a usable phone");
            return;
        }
    };

    // The phone is known non-empty here; an empty contact name falls
    // back to it.
    let broker_id = match payload
        .contact
        .name
        .clone()
        .and_then(|name| BrokerId::new(name).ok())
        .or_else(|| BrokerId::new(payload.contact.phone.clone()).ok())
    {
        Some(broker_id) => broker_id,
        None => return,
    };

    let normalized = normalize_message(&payload.message, address.clone());

    info!(
        channel_address = %address,
        kind = normalized.kind(),
        "callbell message received"
    );

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
                warn!(error = %err, "failed to send callbell reply");
            }
        }
        Ok(_) => {}
        Err(err) => warn!(error = %err, "inbound processing failed"),
    }
}

/// Translates one Callbell message into the normalized shape.
fn normalize_message(message: &CallbellMessage, from: ChannelAddress) -> InboundMessage {
    match message.kind.as_str() {
        "text" => InboundMessage::text(message.uuid.as_str(), from, message.text.clone().unwrap_or_default()),
        "image" => InboundMessage::image(
            message.uuid.as_str(),
            from,
            MediaRef::new(message.media_url.clone().unwrap_or_default()),
        ),
        "audio" | "voice" => InboundMessage::audio(
            message.uuid.as_str(),
            from,
            MediaRef::new(message.media_url.clone().unwrap_or_default()),
        ),
        "location" => match (message.latitude, message.longitude) {
            (Some(lat), Some(lng)) => InboundMessage::location(message.uuid.as_str(), from, lat, lng),
            _ => InboundMessage::unknown(message.uuid.as_str(), from),
        },
        _ => InboundMessage::unknown(message.uuid.as_str(), from),
    }
}

// --- Callbell wire types ---

#[derive(Debug, Deserialize)]
struct CallbellEvent {
    #[serde(rename = "type", default)]
    kind: String,
    payload: Option<EventPayload>,
}

#[derive(Debug, Deserialize)]
struct EventPayload {
    message: CallbellMessage,
    contact: CallbellContact,
}

#[derive(Debug, Deserialize)]
struct CallbellMessage {
    #[serde(default)]
    uuid: String,
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    direction: String,
    text: Option<String>,
    #[serde(rename = "mediaUrl")]
    media_url: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct CallbellContact {
    #[serde(default)]
    phone: String,
    name: Option<String>,
}
