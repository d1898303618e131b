//! Normalized inbound messages.
//!
//! Channel adapters translate their own wire formats into this shape
//! before invoking the orchestrator; the orchestrator never sees
//! channel-specific payloads.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ChannelAddress, MediaRef, Timestamp};

/// One normalized inbound message from any channel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InboundMessage {
    /// Channel-assigned message id, opaque.
    pub id: String,
    pub timestamp: Timestamp,
    /// Reply destination; also the capture store key.
    pub from: ChannelAddress,
    pub payload: MessagePayload,
}

/// Closed set of message kinds the orchestrator dispatches on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MessagePayload {
    Text { body: String },
    Audio { media: MediaRef },
    Image { media: MediaRef },
    Location { lat: f64, lng: f64 },
    Unknown,
}

impl InboundMessage {
    pub fn new(id: impl Into<String>, from: ChannelAddress, payload: MessagePayload) -> Self {
        Self {
            id: id.into(),
            timestamp: Timestamp::now(),
            from,
            payload,
        }
    }

    pub fn text(id: impl Into<String>, from: ChannelAddress, body: impl Into<String>) -> Self {
        Self::new(id, from, MessagePayload::Text { body: body.into() })
    }

    pub fn audio(id: impl Into<String>, from: ChannelAddress, media: MediaRef) -> Self {
        Self::new(id, from, MessagePayload::Audio { media })
    }

    pub fn image(id: impl Into<String>, from: ChannelAddress, media: MediaRef) -> Self {
        Self::new(id, from, MessagePayload::Image { media })
    }

    pub fn location(id: impl Into<String>, from: ChannelAddress, lat: f64, lng: f64) -> Self {
        Self::new(id, from, MessagePayload::Location { lat, lng })
    }

    pub fn unknown(id: impl Into<String>, from: ChannelAddress) -> Self {
        Self::new(id, from, MessagePayload::Unknown)
    }

    /// Message kind as a stable name, for logging.
    pub fn kind(&self) -> &'static str {
        match self.payload {
            MessagePayload::Text { .. } => "text",
            MessagePayload::Audio { .. } => "audio",
            MessagePayload::Image { .. } => "image",
            MessagePayload::Location { .. } => "location",
            MessagePayload::Unknown => "unknown",
        }
    }
}
