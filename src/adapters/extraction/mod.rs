//! Extraction adapters: heuristic regex and Gemini-backed.

mod gemini;
mod heuristic;

pub use gemini::GeminiExtractor;
pub use heuristic::HeuristicExtractor;
