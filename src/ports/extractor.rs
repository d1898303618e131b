//! Field Extraction Port - turns raw text or audio into a partial record.
//!
//! Implementations must never guess: every field not explicitly mentioned
//! in the input comes back absent. The orchestrator merges whatever is
//! returned and recomputes completeness; a guessed sacred field would
//! poison the capture.

use async_trait::async_trait;

use crate::domain::capture::ListingFields;
use crate::domain::foundation::MediaRef;

/// Port for the extraction collaborator.
#[async_trait]
pub trait FieldExtractor: Send + Sync {
    /// Extracts listing fields from a raw text message.
    async fn extract_text(&self, text: &str) -> Result<ListingFields, ExtractionError>;

    /// Extracts listing fields from an audio note.
    async fn extract_audio(&self, media: &MediaRef) -> Result<ListingFields, ExtractionError>;
}

/// Extraction collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    /// The collaborator is unreachable or returned a transport error.
    #[error("extraction unavailable: {0}")]
    Unavailable(String),

    /// The collaborator answered but the output was not a valid
    /// partial-record JSON.
    #[error("unparsable extraction output: {0}")]
    Unparsable(String),

    /// The referenced media could not be fetched.
    #[error("media not found: {0}")]
    MediaNotFound(MediaRef),
}

impl ExtractionError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn unparsable(message: impl Into<String>) -> Self {
        Self::Unparsable(message.into())
    }

    /// Retry-by-resend makes sense for transport failures only.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ExtractionError::Unavailable(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unavailable_is_retryable() {
        assert!(ExtractionError::unavailable("timeout").is_retryable());
        assert!(!ExtractionError::unparsable("bad json").is_retryable());
        assert!(!ExtractionError::MediaNotFound(MediaRef::new("m1")).is_retryable());
    }

    #[test]
    fn errors_display_their_context() {
        let err = ExtractionError::unparsable("expected object");
        assert_eq!(err.to_string(), "unparsable extraction output: expected object");
    }
}
