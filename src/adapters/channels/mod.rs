//! Channel adapters: inbound normalization and outbound sends.

pub mod callbell;
pub mod whatsapp;
