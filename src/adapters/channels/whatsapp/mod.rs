//! WhatsApp Cloud API channel adapter.

mod client;
mod signature;
mod webhook;

pub use client::{WhatsAppClient, WhatsAppConfig};
pub use signature::{SignatureError, SignatureVerifier};
pub use webhook::{whatsapp_webhook_router, WhatsAppWebhookState};
