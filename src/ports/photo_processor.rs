//! Photo Processing Port - categorizes, scores and screens listing photos.

use async_trait::async_trait;

use crate::domain::capture::ProcessedPhoto;
use crate::domain::foundation::MediaRef;

/// Port for the photo-processing collaborator.
///
/// A rejected photo (unsafe or sensitive content) comes back with
/// `accepted: false` and never reaches the capture record.
#[async_trait]
pub trait PhotoProcessor: Send + Sync {
    /// Processes one photo: classification, quality score, screening.
    async fn process(&self, media: &MediaRef) -> Result<ProcessedPhoto, PhotoProcessingError>;
}

/// Photo-processing collaborator failures.
#[derive(Debug, thiserror::Error)]
pub enum PhotoProcessingError {
    #[error("photo processing unavailable: {0}")]
    Unavailable(String),

    #[error("unparsable analysis output: {0}")]
    Unparsable(String),

    #[error("media not found: {0}")]
    MediaNotFound(MediaRef),
}

impl PhotoProcessingError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn unparsable(message: impl Into<String>) -> Self {
        Self::Unparsable(message.into())
    }
}
