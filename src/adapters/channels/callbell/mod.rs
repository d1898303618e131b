//! Callbell chat-aggregator channel adapter.

mod client;
mod webhook;

pub use client::{CallbellClient, CallbellConfig};
pub use webhook::{callbell_webhook_router, CallbellWebhookState};
