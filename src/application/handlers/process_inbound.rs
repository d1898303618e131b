//! ProcessInbound command handler.
//!
//! The single entry point for normalized inbound messages from every
//! channel adapter. Owns lookup-or-create: the first message from an
//! unseen address starts a capture and answers with the deterministic
//! welcome instead of running the state machine.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::application::address_locks::AddressLocks;
use crate::domain::capture::{CaptureOrchestrator, CaptureRecord, CaptureState, InboundMessage};
use crate::domain::foundation::BrokerId;
use crate::ports::{CaptureStore, ResponseTemplate, StoreError};

/// Command to process one inbound message.
#[derive(Debug, Clone)]
pub struct ProcessInboundCommand {
    /// Broker driving this conversation, as identified by the channel.
    pub broker_id: BrokerId,
    pub message: InboundMessage,
}

/// Errors that can occur while processing an inbound message.
///
/// Collaborator failures never show up here; the orchestrator converts
/// them into a safe state plus apology text. Only store failures escape.
#[derive(Debug, Error)]
pub enum ProcessInboundError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
}

/// Result of processing one inbound message.
#[derive(Debug, Clone)]
pub struct ProcessInboundResult {
    /// Text to send back over the originating channel.
    pub reply: String,
    pub state: CaptureState,
    /// True when this message started a new capture.
    pub new_capture: bool,
}

/// Handler wiring the store, the per-address locks and the orchestrator.
pub struct ProcessInboundHandler {
    store: Arc<dyn CaptureStore>,
    orchestrator: Arc<CaptureOrchestrator>,
    locks: AddressLocks,
}

impl ProcessInboundHandler {
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
        command: ProcessInboundCommand,
    ) -> Result<ProcessInboundResult, ProcessInboundError> {
        let address = command.message.from.clone();
        let _guard = self.locks.acquire(&address).await;

        match self.store.get(&address).await? {
            None => {
                // First contact: the message is conversation-start, not data.
                let record = CaptureRecord::new(command.broker_id, address.clone());
                let reply = ResponseTemplate::Welcome.fallback(&record);
                let state = record.state();
                self.store.put(record).await?;

                info!(channel_address = %address, "new capture started");

                Ok(ProcessInboundResult {
                    reply,
                    state,
                    new_capture: true,
                })
            }
            Some(mut record) => {
                let reply = self
                    .orchestrator
                    .handle_message(&command.message, &mut record)
                    .await;
                let state = record.state();
                self.store.put(record).await?;

                Ok(ProcessInboundResult {
                    reply,
                    state,
                    new_capture: false,
                })
            }
        }
    }
}
