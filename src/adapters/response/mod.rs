//! Response generation adapters.

mod gemini;
mod template;

pub use gemini::GeminiResponder;
pub use template::TemplateResponder;
