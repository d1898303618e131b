//! Capture Orchestrator - drives one conversation turn at a time.
//!
//! Dispatches each normalized inbound message to the right collaborator,
//! merges whatever came back, recomputes completeness and decides both the
//! next state and the next outbound message. Collaborator failures on the
//! message path never escape: the record moves to the recoverable error
//! state and the broker is asked to resend. Publication failures are the
//! one exception and propagate to the approval caller.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::foundation::DomainError;
use crate::domain::listing::PublicationOutcome;
use crate::ports::{
    ExtractionError, FieldExtractor, ListingPublisher, PhotoProcessingError, PhotoProcessor,
    PublicationError, ResponseGenerator, ResponseTemplate,
};

use super::fields::Coordinates;
use super::message::{InboundMessage, MessagePayload};
use super::photos::CurationPolicy;
use super::record::CaptureRecord;
use super::state::CaptureState;
use super::validation::validate;

/// Fixed reply for message kinds the orchestrator does not handle.
pub const CLARIFICATION_PROMPT: &str =
    "🤔 No entendí ese tipo de mensaje. Puedes enviarme texto, audio, fotos o ubicación.";

/// Fixed apology after a failed processing attempt; the broker recovers
/// by simply resending.
pub const APOLOGY: &str =
    "😅 Hubo un problema procesando tu mensaje. ¿Puedes intentar de nuevo?";

/// Internal failures on the message path; all are caught at the
/// `handle_message` boundary.
#[derive(Debug, thiserror::Error)]
enum ProcessingError {
    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Photos(#[from] PhotoProcessingError),

    #[error(transparent)]
    State(#[from] DomainError),
}

/// Failures of the approval path; these reach the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApprovalError {
    #[error(transparent)]
    State(#[from] DomainError),

    #[error(transparent)]
    Publication(#[from] PublicationError),
}

/// The conversation state machine over the collaborator ports.
pub struct CaptureOrchestrator {
    extractor: Arc<dyn FieldExtractor>,
    photos: Arc<dyn PhotoProcessor>,
    responder: Arc<dyn ResponseGenerator>,
    publisher: Arc<dyn ListingPublisher>,
    curation: CurationPolicy,
}

impl CaptureOrchestrator {
    pub fn new(
        extractor: Arc<dyn FieldExtractor>,
        photos: Arc<dyn PhotoProcessor>,
        responder: Arc<dyn ResponseGenerator>,
        publisher: Arc<dyn ListingPublisher>,
    ) -> Self {
        Self {
            extractor,
            photos,
            responder,
            publisher,
            curation: CurationPolicy::default(),
        }
    }

    /// Overrides the photo curation caps.
    pub fn with_curation(mut self, curation: CurationPolicy) -> Self {
        self.curation = curation;
        self
    }

    /// Processes one inbound message and returns the text to send back.
    ///
    /// Sending it is the channel adapter's job. Nothing throws past this
    /// boundary: any collaborator or transition failure moves the record
    /// to `Error` and returns the fixed apology.
    pub async fn handle_message(
        &self,
        message: &InboundMessage,
        record: &mut CaptureRecord,
    ) -> String {
        info!(
            channel_address = %record.channel_address(),
            kind = message.kind(),
            state = %record.state(),
            "processing inbound message"
        );

        match self.dispatch(message, record).await {
            Ok(reply) => reply,
            Err(err) => {
                warn!(
                    channel_address = %record.channel_address(),
                    error = %err,
                    "message handling failed"
                );
                record.enter_error();
                APOLOGY.to_string()
            }
        }
    }

    async fn dispatch(
        &self,
        message: &InboundMessage,
        record: &mut CaptureRecord,
    ) -> Result<String, ProcessingError> {
        let mut reply: Option<String> = None;

        match &message.payload {
            MessagePayload::Audio { media } => {
                record.push_audio(media.clone());
                record.transition_to(CaptureState::ProcessingAudio)?;
                let extracted = self.extractor.extract_audio(media).await?;
                record.apply_extraction(extracted);
                record.transition_to(CaptureState::Validating)?;
            }
            MessagePayload::Image { media } => {
                record.push_photo(media.clone());
                record.transition_to(CaptureState::ProcessingPhotos)?;
                let processed = self.photos.process(media).await?;
                record.add_processed_photos([processed], &self.curation);
                record.transition_to(CaptureState::Receiving)?;
            }
            MessagePayload::Text { body } => {
                let extracted = self.extractor.extract_text(body).await?;
                record.apply_extraction(extracted);
                record.transition_to(CaptureState::Validating)?;
            }
            MessagePayload::Location { lat, lng } => {
                record.apply_coordinates(Coordinates {
                    lat: *lat,
                    lng: *lng,
                });
                record.transition_to(CaptureState::Receiving)?;
            }
            MessagePayload::Unknown => {
                reply = Some(CLARIFICATION_PROMPT.to_string());
            }
        }

        self.check_completeness(record, &mut reply).await?;

        Ok(match reply {
            Some(text) => text,
            None => self.render(ResponseTemplate::RequestMissing, record).await,
        })
    }

    /// Once every required field is present and plausible, the record is
    /// forced into `ReadyToPublish` and the broker gets the summary.
    async fn check_completeness(
        &self,
        record: &mut CaptureRecord,
        reply: &mut Option<String>,
    ) -> Result<(), ProcessingError> {
        if !record.is_complete()
            || !record
                .state()
                .can_transition_to(&CaptureState::ReadyToPublish)
        {
            return Ok(());
        }

        let report = validate(record.fields());
        for warning in &report.warnings {
            debug!(channel_address = %record.channel_address(), warning, "validation warning");
        }
        if !report.is_ok() {
            // An implausible sacred value blocks completeness but is not a
            // processing failure; the broker is re-prompted instead.
            for error in &report.errors {
                warn!(
                    channel_address = %record.channel_address(),
                    error = %error,
                    "implausible value blocks completeness"
                );
            }
            return Ok(());
        }

        record.transition_to(CaptureState::ReadyToPublish)?;
        *reply = Some(self.render(ResponseTemplate::CaptureComplete, record).await);
        Ok(())
    }

    /// Operator approval: publish the capture and close it out.
    ///
    /// Valid from any non-terminal state. A publication failure
    /// propagates and leaves the record in `Publishing` so the operator
    /// can re-approve.
    pub async fn handle_approval(
        &self,
        record: &mut CaptureRecord,
    ) -> Result<Vec<PublicationOutcome>, ApprovalError> {
        info!(
            channel_address = %record.channel_address(),
            state = %record.state(),
            "approval received, publishing"
        );

        record.transition_to(CaptureState::AwaitingApproval)?;
        record.transition_to(CaptureState::Publishing)?;

        let outcomes = self.publisher.publish(record).await?;

        record.attach_publication(outcomes.clone());
        record.transition_to(CaptureState::Completed)?;

        info!(
            channel_address = %record.channel_address(),
            destinations = outcomes.len(),
            succeeded = outcomes.iter().filter(|o| o.success).count(),
            "publication completed"
        );

        Ok(outcomes)
    }

    /// Renders a template through the collaborator, falling back to the
    /// template's fixed text on any failure. Generation never affects
    /// control flow.
    pub async fn render(&self, template: ResponseTemplate, record: &CaptureRecord) -> String {
        match self.responder.generate(template, record).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => template.fallback(record),
            Err(err) => {
                debug!(
                    template = template.key(),
                    error = %err,
                    "response generation failed, using fallback"
                );
                template.fallback(record)
            }
        }
    }
}
