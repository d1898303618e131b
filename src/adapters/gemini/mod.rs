//! Shared Gemini client used by extraction, response and copy generation.

mod client;

pub use client::{strip_code_fences, GeminiClient, GeminiConfig, GeminiError, GenerationOptions};
