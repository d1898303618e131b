//! The capture record: unit of work for one prospective listing.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::foundation::{BrokerId, CaptureId, ChannelAddress, DomainError, MediaRef, Timestamp};
use crate::domain::listing::PublicationOutcome;

use super::fields::{Coordinates, ListingFields, Merge};
use super::photos::{curate, CurationPolicy, ProcessedPhoto};
use super::state::CaptureState;
use super::validation::{compute_missing, RequiredField};

/// Idle lifetime of a capture; the expiry sweep evicts records past it.
pub const CAPTURE_TTL_HOURS: i64 = 24;

/// In-flight capture for one conversation.
///
/// Mutated exclusively through the methods below so that
/// `missing_required` is always the exact recomputation from the current
/// fields and `expires_at` always tracks `updated_at`.
#[derive(Debug, Clone, Serialize)]
pub struct CaptureRecord {
    id: CaptureId,
    broker_id: BrokerId,
    channel_address: ChannelAddress,
    state: CaptureState,
    fields: ListingFields,
    received_audio: Vec<MediaRef>,
    received_photos: Vec<MediaRef>,
    processed_photos: Vec<ProcessedPhoto>,
    missing_required: BTreeSet<RequiredField>,
    publication: Vec<PublicationOutcome>,
    created_at: Timestamp,
    updated_at: Timestamp,
    expires_at: Timestamp,
}

impl CaptureRecord {
    /// Creates a fresh record for a first-contact address.
    pub fn new(broker_id: BrokerId, channel_address: ChannelAddress) -> Self {
        let now = Timestamp::now();
        let fields = ListingFields::default();
        let missing_required = compute_missing(&fields);

        Self {
            id: CaptureId::new(),
            broker_id,
            channel_address,
            state: CaptureState::Initial,
            fields,
            received_audio: Vec::new(),
            received_photos: Vec::new(),
            processed_photos: Vec::new(),
            missing_required,
            publication: Vec::new(),
            created_at: now,
            updated_at: now,
            expires_at: now.plus_hours(CAPTURE_TTL_HOURS),
        }
    }

    // --- accessors (read-only, never refresh expiry) ---

    pub fn id(&self) -> CaptureId {
        self.id
    }

    pub fn broker_id(&self) -> &BrokerId {
        &self.broker_id
    }

    pub fn channel_address(&self) -> &ChannelAddress {
        &self.channel_address
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn fields(&self) -> &ListingFields {
        &self.fields
    }

    pub fn received_audio(&self) -> &[MediaRef] {
        &self.received_audio
    }

    pub fn received_photos(&self) -> &[MediaRef] {
        &self.received_photos
    }

    pub fn processed_photos(&self) -> &[ProcessedPhoto] {
        &self.processed_photos
    }

    pub fn missing_required(&self) -> &BTreeSet<RequiredField> {
        &self.missing_required
    }

    pub fn publication(&self) -> &[PublicationOutcome] {
        &self.publication
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn updated_at(&self) -> Timestamp {
        self.updated_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// True when every required field is present.
    pub fn is_complete(&self) -> bool {
        self.missing_required.is_empty()
    }

    /// True once the record's idle lifetime has passed.
    pub fn is_expired(&self, now: Timestamp) -> bool {
        now.is_after(&self.expires_at)
    }

    // --- mutations (each one refreshes updated_at and expires_at) ---

    /// Validated state transition.
    pub fn transition_to(&mut self, target: CaptureState) -> Result<(), DomainError> {
        self.state = self.state.transition_to(target)?;
        self.touch();
        Ok(())
    }

    /// Moves the record into the recoverable error state. From states that
    /// cannot reach `Error` (only `Completed`) the record is left as is.
    pub fn enter_error(&mut self) {
        if self.state.can_transition_to(&CaptureState::Error) {
            self.state = CaptureState::Error;
            self.touch();
        }
    }

    /// Merges a partial extraction and recomputes the missing-field set.
    pub fn apply_extraction(&mut self, incoming: ListingFields) {
        self.fields.merge_from(incoming);
        self.missing_required = compute_missing(&self.fields);
        self.touch();
    }

    /// Merges shared coordinates directly, without an extraction call.
    pub fn apply_coordinates(&mut self, coordinates: Coordinates) {
        self.fields.address.coordinates = Some(coordinates);
        self.missing_required = compute_missing(&self.fields);
        self.touch();
    }

    /// Records an audio note reference (append-only).
    pub fn push_audio(&mut self, media: MediaRef) {
        self.received_audio.push(media);
        self.touch();
    }

    /// Records a photo reference (append-only).
    pub fn push_photo(&mut self, media: MediaRef) {
        self.received_photos.push(media);
        self.touch();
    }

    /// Appends accepted photos and re-runs curation over the full set.
    pub fn add_processed_photos(
        &mut self,
        photos: impl IntoIterator<Item = ProcessedPhoto>,
        policy: &CurationPolicy,
    ) {
        self.processed_photos
            .extend(photos.into_iter().filter(|p| p.accepted));
        self.processed_photos = curate(std::mem::take(&mut self.processed_photos), policy);
        self.touch();
    }

    /// Attaches the publication outcome once publishing succeeded.
    pub fn attach_publication(&mut self, outcomes: Vec<PublicationOutcome>) {
        self.publication = outcomes;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
        self.expires_at = self.updated_at.plus_hours(CAPTURE_TTL_HOURS);
    }
}
