//! ApproveCapture command handler.
//!
//! Approval is operator-triggered, out of band from the message stream.
//! Unlike message processing, a publication failure here is caller-visible:
//! the record is persisted in `Publishing` and the error propagates.

use std::sync::Arc;

use thiserror::Error;

use crate::application::address_locks::AddressLocks;
use crate::domain::capture::{ApprovalError, CaptureOrchestrator, CaptureState};
use crate::domain::foundation::ChannelAddress;
use crate::domain::listing::PublicationOutcome;
use crate::ports::{CaptureStore, ResponseTemplate, StoreError};

/// Command to approve and publish a capture.
#[derive(Debug, Clone)]
pub struct ApproveCaptureCommand {
    pub channel_address: ChannelAddress,
}

/// Errors that can occur during approval.
#[derive(Debug, Error)]
pub enum ApproveCaptureError {
    #[error("no capture in flight for address: {0}")]
    NotFound(ChannelAddress),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("approval failed: {0}")]
    Approval(#[from] ApprovalError),
}

/// Result of a successful approval.
#[derive(Debug, Clone)]
pub struct ApproveCaptureResult {
    /// One outcome per destination, in configuration order.
    pub outcomes: Vec<PublicationOutcome>,
    /// Confirmation text to send back to the broker.
    pub confirmation: String,
    pub state: CaptureState,
}

/// Handler for operator approvals.
pub struct ApproveCaptureHandler {
    store: Arc<dyn CaptureStore>,
    orchestrator: Arc<CaptureOrchestrator>,
    locks: AddressLocks,
}

impl ApproveCaptureHandler {
    pub fn new(
        store: Arc<dyn CaptureStore>,
        orchestrator: Arc<CaptureOrchestrator>,
        locks: AddressLocks,
    ) -> Self {
        Self {
            store,
            orchestrator,
            locks,
        }
    }

    pub async fn execute(
        &self,
        command: ApproveCaptureCommand,
    ) -> Result<ApproveCaptureResult, ApproveCaptureError> {
        let address = command.channel_address;
        let _guard = self.locks.acquire(&address).await;

        let mut record = self
            .store
            .get(&address)
            .await?
            .ok_or_else(|| ApproveCaptureError::NotFound(address.clone()))?;

        let approval = self.orchestrator.handle_approval(&mut record).await;

        // Persist whatever state the approval attempt left behind, so a
        // failed publication keeps the record in Publishing for a retry.
        let state = record.state();
        let confirmation = match &approval {
            Ok(_) => {
                self.orchestrator
                    .render(ResponseTemplate::PublishConfirmation, &record)
                    .await
            }
            Err(_) => String::new(),
        };
        self.store.put(record).await?;

        let outcomes = approval?;

        Ok(ApproveCaptureResult {
            outcomes,
            confirmation,
            state,
        })
    }
}
