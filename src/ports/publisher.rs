//! Publication Port - pushes a finished listing to external catalogs.

use async_trait::async_trait;

use crate::domain::capture::CaptureRecord;
use crate::domain::listing::PublicationOutcome;

/// Port for the publication collaborator.
///
/// Implementations assemble the listing (copy, neighborhood selling
/// points, curated photos) and push it to every configured destination,
/// collecting one outcome per destination in configuration order.
/// Per-destination failures land inside the outcome list; only a failure
/// of the publication run as a whole is returned as an error, and that
/// error propagates to the approval caller.
#[async_trait]
pub trait ListingPublisher: Send + Sync {
    async fn publish(
        &self,
        record: &CaptureRecord,
    ) -> Result<Vec<PublicationOutcome>, PublicationError>;
}

/// Whole-run publication failures.
#[derive(Debug, thiserror::Error)]
pub enum PublicationError {
    #[error("no publication destinations configured")]
    NoDestinations,

    #[error("publication failed: {0}")]
    Failed(String),
}

impl PublicationError {
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }
}
