//! Passthrough Photo Processor - accepts every photo unscreened.
//!
//! Used when no Vision credentials are configured and in tests. Photos
//! keep their original reference, land in the catch-all category and get
//! a flat middle-of-the-road score.

use async_trait::async_trait;
use tracing::debug;

use crate::domain::capture::{PhotoCategory, ProcessedPhoto};
use crate::domain::foundation::MediaRef;
use crate::ports::{PhotoProcessingError, PhotoProcessor};

const PASSTHROUGH_SCORE: f64 = 75.0;

#[derive(Debug, Clone, Default)]
pub struct PassthroughPhotoProcessor;

impl PassthroughPhotoProcessor {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl PhotoProcessor for PassthroughPhotoProcessor {
    async fn process(&self, media: &MediaRef) -> Result<ProcessedPhoto, PhotoProcessingError> {
        debug!(media = %media, "photo accepted without analysis");
        Ok(ProcessedPhoto {
            reference: media.clone(),
            enhanced_reference: None,
            category: PhotoCategory::Other,
            score: PASSTHROUGH_SCORE,
            accepted: true,
        })
    }
}
