//! Capture domain: record model, merge engine, validation policy and the
//! conversation state machine.

mod fields;
mod message;
mod orchestrator;
mod photos;
mod record;
mod state;
mod validation;

pub use fields::{
    Address, Area, Coordinates, Currency, ListingFields, Merge, OperationKind, Price, PropertyKind,
};
pub use message::{InboundMessage, MessagePayload};
pub use orchestrator::{ApprovalError, CaptureOrchestrator, APOLOGY, CLARIFICATION_PROMPT};
pub use photos::{curate, CurationPolicy, PhotoCategory, ProcessedPhoto};
pub use record::{CaptureRecord, CAPTURE_TTL_HOURS};
pub use state::CaptureState;
pub use validation::{compute_missing, validate, RequiredField, ValidationReport, REQUIRED_FIELDS};
